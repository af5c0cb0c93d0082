use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::models::{Listing, RawListing, Source};
use crate::normalizer::normalize_all;
use crate::plugins::traits::{SearchProvider, SourceAdapter, SourceOutcome};
use crate::utils::error::Result;

/// Marketplaces excluded from the web search; they have dedicated adapters.
const EXCLUDED_SITES: [&str; 3] = ["amazon.com", "ebay.com", "etsy.com"];

/// Builds a query biased toward independent storefronts selling the brand.
pub fn build_query(brand: &str) -> String {
    let exclusions: Vec<String> = EXCLUDED_SITES
        .iter()
        .map(|site| format!("-site:{}", site))
        .collect();
    format!(
        r#"intitle:"{}" inurl:"shop" OR inurl:"store" {}"#,
        brand,
        exclusions.join(" ")
    )
}

/// General web search for standalone shops.
pub struct SearchEngineAdapter {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl SearchEngineAdapter {
    pub fn new(provider: Arc<dyn SearchProvider>, max_results: usize) -> Self {
        Self {
            provider,
            max_results,
        }
    }

    async fn collect(&self, brand: &str) -> Result<Vec<Listing>> {
        let hits = self
            .provider
            .search(&build_query(brand), self.max_results)
            .await?;

        let raw = hits
            .into_iter()
            .take(self.max_results)
            .filter(|hit| !hit.title.trim().is_empty() && !hit.url.trim().is_empty())
            .map(|hit| RawListing::new(hit.title, hit.url));

        Ok(normalize_all(Source::GeneralWeb, raw))
    }
}

#[async_trait]
impl SourceAdapter for SearchEngineAdapter {
    fn name(&self) -> &str {
        "General Web"
    }

    fn source(&self) -> Source {
        Source::GeneralWeb
    }

    async fn harvest(&self, brand: &str) -> SourceOutcome {
        info!("Hunting standalone shops for '{}' via {}...", brand, self.provider.name());
        let outcome = SourceOutcome::from_result(self.source(), self.collect(brand).await);
        if let SourceOutcome::Harvested(listings) = &outcome {
            info!("Found {} general sites.", listings.len());
        }
        outcome
    }
}
