pub mod config;
pub mod harvester;
pub mod models;
pub mod normalizer;
pub mod plugins;
pub mod sink;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::HunterConfig;
pub use harvester::{HarvestReport, HarvestState, Harvester};
pub use models::{HarvestQuery, Listing, Source};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
