pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoProvider;
