pub mod dynamic;
pub mod handmade;
pub mod html;
pub mod marketplace;
pub mod search_engine;

pub use dynamic::DynamicMarketplaceAdapter;
pub use handmade::HandmadeMarketplaceAdapter;
pub use marketplace::MarketplaceAdapter;
pub use search_engine::SearchEngineAdapter;
