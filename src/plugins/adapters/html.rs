use scraper::{ElementRef, Selector};
use url::Url;

use crate::utils::error::{AppError, Result};

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| AppError::parse(format!("Invalid CSS selector '{}': {:?}", selector, e)))
}

/// CSS selectors describing one result grid: the repeated container and the
/// per-item fields inside it.
pub struct ItemSelectors {
    pub container: Selector,
    pub title: Selector,
    pub link: Selector,
    pub price: Selector,
    pub image: Selector,
}

impl ItemSelectors {
    pub fn new(container: &str, title: &str, link: &str, price: &str, image: &str) -> Result<Self> {
        Ok(Self {
            container: parse_selector(container)?,
            title: parse_selector(title)?,
            link: parse_selector(link)?,
            price: parse_selector(price)?,
            image: parse_selector(image)?,
        })
    }
}

/// Concatenated text of the first match, `None` when absent or blank.
pub fn select_text(item: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text: String = item.select(selector).next()?.text().collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

pub fn select_attr(item: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    item.select(selector)
        .next()?
        .value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolves `href` against the page it was found on; only http(s) survives.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
