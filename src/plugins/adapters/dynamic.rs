use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::models::Source;
use crate::plugins::traits::{SourceAdapter, SourceOutcome};
use crate::transport::Transport;
use crate::utils::error::Result;

pub const RENDERING_REQUIRED_NOTE: &str =
    "search results are rendered client-side; extraction requires JS rendering, skipped";

/// Marketplace whose results are built by JavaScript. Only connectivity is
/// checked; no listings are ever extracted.
pub struct DynamicMarketplaceAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl DynamicMarketplaceAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn search_url(&self, brand: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join("/wholesale")?;
        url.query_pairs_mut().append_pair("SearchText", brand);
        Ok(url)
    }

    async fn probe(&self, brand: &str) -> Result<u16> {
        let url = self.search_url(brand)?;
        self.transport.probe(url.as_str()).await
    }
}

#[async_trait]
impl SourceAdapter for DynamicMarketplaceAdapter {
    fn name(&self) -> &str {
        "AliExpress"
    }

    fn source(&self) -> Source {
        Source::DynamicMarketplace
    }

    async fn harvest(&self, brand: &str) -> SourceOutcome {
        info!("Hunting {} for '{}'...", self.name(), brand);

        match self.probe(brand).await {
            Ok(status) => debug!(status, "{} connectivity probe answered", self.name()),
            Err(e) => debug!(error = %e, "{} connectivity probe failed", self.name()),
        }

        info!("{} {}.", self.name(), RENDERING_REQUIRED_NOTE);
        SourceOutcome::CapabilityUnavailable {
            note: RENDERING_REQUIRED_NOTE.to_string(),
        }
    }
}
