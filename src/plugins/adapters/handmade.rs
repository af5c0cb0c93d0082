use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::info;
use url::Url;

use super::html::{ItemSelectors, resolve_link, select_attr, select_text};
use crate::models::{Listing, RawListing, Source};
use crate::normalizer::normalize_all;
use crate::plugins::traits::{SourceAdapter, SourceOutcome};
use crate::transport::Transport;
use crate::utils::error::Result;

// Card class names churn upstream; the outer card container is the most stable hook.
const CARD_SELECTOR: &str = ".v2-listing-card";
const TITLE_SELECTOR: &str = ".v2-listing-card__info h3";
const LINK_SELECTOR: &str = "a";
const PRICE_SELECTOR: &str = ".currency-value";
const IMAGE_SELECTOR: &str = "img";

/// Handmade-goods marketplace search sorted by ascending price.
pub struct HandmadeMarketplaceAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    max_items: usize,
}

impl HandmadeMarketplaceAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, max_items: usize) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            max_items,
        }
    }

    pub fn search_url(&self, brand: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join("/search")?;
        url.query_pairs_mut()
            .append_pair("q", brand)
            .append_pair("explicit", "1")
            .append_pair("order", "price_asc");
        Ok(url)
    }

    async fn collect(&self, brand: &str) -> Result<Vec<Listing>> {
        let url = self.search_url(brand)?;
        let page = self.transport.get(url.as_str()).await?;
        let base = Url::parse(&page.url).unwrap_or(url);

        let raw = parse_cards(&page.body, &base, self.max_items)?;
        Ok(normalize_all(Source::HandmadeMarketplace, raw))
    }
}

pub fn parse_cards(body: &str, base: &Url, max_items: usize) -> Result<Vec<RawListing>> {
    let selectors = ItemSelectors::new(
        CARD_SELECTOR,
        TITLE_SELECTOR,
        LINK_SELECTOR,
        PRICE_SELECTOR,
        IMAGE_SELECTOR,
    )?;
    let document = Html::parse_document(body);

    Ok(document
        .select(&selectors.container)
        .take(max_items)
        .filter_map(|card| extract_card(card, base, &selectors))
        .collect())
}

pub fn extract_card(card: ElementRef<'_>, base: &Url, selectors: &ItemSelectors) -> Option<RawListing> {
    let title = select_text(card, &selectors.title)?.trim().to_string();
    let href = select_attr(card, &selectors.link, "href")?;
    let link = resolve_link(base, &href)?;
    let price = select_text(card, &selectors.price)?.trim().to_string();
    let src = select_attr(card, &selectors.image, "src")?;
    let image = resolve_link(base, &src)?;

    Some(RawListing::new(title, link).with_price(price).with_image(image))
}

#[async_trait]
impl SourceAdapter for HandmadeMarketplaceAdapter {
    fn name(&self) -> &str {
        "Etsy"
    }

    fn source(&self) -> Source {
        Source::HandmadeMarketplace
    }

    async fn harvest(&self, brand: &str) -> SourceOutcome {
        info!("Hunting {} for '{}'...", self.name(), brand);
        let outcome = SourceOutcome::from_result(self.source(), self.collect(brand).await);
        if let SourceOutcome::Harvested(listings) = &outcome {
            info!("Found {} {} listings.", listings.len(), self.name());
        }
        outcome
    }
}
