use std::sync::Arc;

use super::adapters::{
    DynamicMarketplaceAdapter, HandmadeMarketplaceAdapter, MarketplaceAdapter, SearchEngineAdapter,
};
use super::providers::DuckDuckGoProvider;
use super::traits::SourceAdapter;
use crate::config::HunterConfig;
use crate::models::Source;
use crate::transport::Transport;

pub type SourceAdapterBox = Box<dyn SourceAdapter>;

/// Ordered set of adapters a harvest runs through.
pub struct AdapterRegistry {
    adapters: Vec<SourceAdapterBox>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// The fixed production line-up: web search, marketplace, handmade
    /// marketplace, dynamic marketplace.
    pub fn with_defaults(config: &HunterConfig, transport: Arc<dyn Transport>) -> Self {
        let max_items = config.harvest.max_items_per_source;
        let sources = &config.sources;
        let provider = Arc::new(DuckDuckGoProvider::new(
            transport.clone(),
            sources.search_url.clone(),
        ));

        let mut registry = Self::new();
        registry.register(Box::new(SearchEngineAdapter::new(provider, max_items)));
        registry.register(Box::new(MarketplaceAdapter::new(
            transport.clone(),
            sources.marketplace_url.clone(),
            max_items,
        )));
        registry.register(Box::new(HandmadeMarketplaceAdapter::new(
            transport.clone(),
            sources.handmade_url.clone(),
            max_items,
        )));
        registry.register(Box::new(DynamicMarketplaceAdapter::new(
            transport,
            sources.dynamic_url.clone(),
        )));
        registry
    }

    /// Appends an adapter; invocation order is registration order.
    pub fn register(&mut self, adapter: SourceAdapterBox) {
        self.adapters.push(adapter);
    }

    pub fn sources(&self) -> Vec<Source> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn into_adapters(self) -> Vec<SourceAdapterBox> {
        self.adapters
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
