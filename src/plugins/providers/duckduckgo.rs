use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::plugins::adapters::html::{parse_selector, resolve_link};
use crate::plugins::traits::{SearchHit, SearchProvider};
use crate::transport::{Page, Transport};
use crate::utils::error::{AppError, Result};

const RESULT_LINK_SELECTOR: &str = "a.result__a";
/// Present on the challenge page served to scripted clients.
const ANOMALY_MARKERS: [&str; 2] = ["anomaly-modal", "anomaly.js"];
/// Sponsored results click through this path.
const AD_REDIRECT_PATH: &str = "/y.js";

/// DuckDuckGo's HTML endpoint. Rate limits aggressively; keep `max_results` small.
pub struct DuckDuckGoProvider {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl DuckDuckGoProvider {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join("/html/")?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }
}

/// Reads `{title, url}` pairs from a results page.
pub fn parse_hits(body: &str, base: &Url, max_results: usize) -> Result<Vec<SearchHit>> {
    let selector = parse_selector(RESULT_LINK_SELECTOR)?;
    let document = Html::parse_document(body);

    Ok(document
        .select(&selector)
        .filter_map(|anchor| {
            let title = anchor.text().collect::<String>().trim().to_string();
            let href = anchor.value().attr("href")?;
            let resolved = resolve_link(base, href)?;
            if is_ad_redirect(&resolved) {
                return None;
            }
            let url = unwrap_redirect(&resolved);
            if title.is_empty() {
                return None;
            }
            Some(SearchHit { title, url })
        })
        .take(max_results)
        .collect())
}

fn is_ad_redirect(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| url.path() == AD_REDIRECT_PATH)
}

/// Anything but a plain 200 results page means the query was refused;
/// the endpoint answers throttled clients with 202 and a challenge page.
fn is_rejected(page: &Page) -> bool {
    page.status != 200 || ANOMALY_MARKERS.iter().any(|marker| page.body.contains(marker))
}

/// Result links go through `/l/?uddg=<target>`; return the target.
fn unwrap_redirect(link: &str) -> String {
    let Ok(url) = Url::parse(link) else {
        return link.to_string();
    };
    if url.path() != "/l/" {
        return link.to_string();
    }
    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
        .unwrap_or_else(|| link.to_string())
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "DuckDuckGo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let url = self.search_url(query)?;
        let page = self.transport.get(url.as_str()).await?;
        if is_rejected(&page) {
            return Err(AppError::RateLimited {
                url: url.to_string(),
            });
        }
        let base = Url::parse(&page.url).unwrap_or(url);

        let hits = parse_hits(&page.body, &base, max_results)?;
        debug!(count = hits.len(), "DuckDuckGo returned hits");
        Ok(hits)
    }
}
