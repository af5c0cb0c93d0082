pub mod adapters;
pub mod manager;
pub mod providers;
pub mod traits;

pub use manager::AdapterRegistry;
pub use traits::{SearchProvider, SourceAdapter, SourceOutcome};
