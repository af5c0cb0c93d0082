use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::html::{ItemSelectors, resolve_link, select_attr, select_text};
use crate::models::{Listing, RawListing, Source};
use crate::normalizer::normalize_all;
use crate::plugins::traits::{SourceAdapter, SourceOutcome};
use crate::transport::Transport;
use crate::utils::error::Result;

const ITEM_SELECTOR: &str = ".s-item__wrapper";
const TITLE_SELECTOR: &str = ".s-item__title";
const LINK_SELECTOR: &str = ".s-item__link";
const PRICE_SELECTOR: &str = ".s-item__price";
const IMAGE_SELECTOR: &str = ".s-item__image-img";

/// The first grid entry is a promotional banner, not a listing.
pub const BANNER_TITLE: &str = "Shop on eBay";

/// Auction marketplace search, restricted to fixed-price offers sorted by
/// ascending price.
pub struct MarketplaceAdapter {
    transport: Arc<dyn Transport>,
    base_url: String,
    max_items: usize,
}

impl MarketplaceAdapter {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, max_items: usize) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            max_items,
        }
    }

    pub fn search_url(&self, brand: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join("/sch/i.html")?;
        url.query_pairs_mut()
            .append_pair("_nkw", brand)
            .append_pair("_sop", "15")
            .append_pair("rt", "nc")
            .append_pair("LH_BIN", "1");
        Ok(url)
    }

    async fn collect(&self, brand: &str) -> Result<Vec<Listing>> {
        let url = self.search_url(brand)?;
        let page = self.transport.get(url.as_str()).await?;
        let base = Url::parse(&page.url).unwrap_or(url);

        let raw = parse_results(&page.body, &base, self.max_items)?;
        Ok(normalize_all(Source::Marketplace, raw))
    }
}

/// Extracts up to `max_items` result containers from a search page,
/// dropping each item that cannot be fully read.
pub fn parse_results(body: &str, base: &Url, max_items: usize) -> Result<Vec<RawListing>> {
    let selectors = ItemSelectors::new(
        ITEM_SELECTOR,
        TITLE_SELECTOR,
        LINK_SELECTOR,
        PRICE_SELECTOR,
        IMAGE_SELECTOR,
    )?;
    let document = Html::parse_document(body);

    let items: Vec<RawListing> = document
        .select(&selectors.container)
        .take(max_items)
        .filter_map(|item| extract_item(item, base, &selectors))
        .collect();

    Ok(items)
}

pub fn extract_item(item: ElementRef<'_>, base: &Url, selectors: &ItemSelectors) -> Option<RawListing> {
    let title = select_text(item, &selectors.title)?;
    if title.contains(BANNER_TITLE) {
        debug!("Skipping marketplace banner entry");
        return None;
    }

    let href = select_attr(item, &selectors.link, "href")?;
    let link = resolve_link(base, &href)?;
    let price = select_text(item, &selectors.price)?;
    let src = select_attr(item, &selectors.image, "src")?;
    let image = resolve_link(base, &src)?;

    Some(RawListing::new(title, link).with_price(price).with_image(image))
}

#[async_trait]
impl SourceAdapter for MarketplaceAdapter {
    fn name(&self) -> &str {
        "eBay"
    }

    fn source(&self) -> Source {
        Source::Marketplace
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
