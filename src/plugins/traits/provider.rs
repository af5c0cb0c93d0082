use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// One result from a general-purpose web search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// Text search against a web search engine.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns at most `max_results` hits. Rate limiting is reported as an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}
