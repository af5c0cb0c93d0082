pub mod adapter;
pub mod provider;

pub use adapter::{OutcomeKind, SourceAdapter, SourceOutcome};
pub use provider::{SearchHit, SearchProvider};
