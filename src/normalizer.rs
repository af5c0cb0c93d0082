//! Maps per-source extraction results onto the canonical [`Listing`].

use crate::models::{Listing, PLACEHOLDER_IMAGE, RawListing, Source, UNKNOWN_PRICE};

/// Fills `price`/`image` sentinels and the source's suspicion tag.
///
/// Callers are expected to have dropped items without a usable title or link.
pub fn normalize(source: Source, raw: RawListing) -> Listing {
    Listing {
        source,
        title: raw.title,
        price: non_blank(raw.price).unwrap_or_else(|| UNKNOWN_PRICE.to_string()),
        link: raw.link,
        image: non_blank(raw.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        suspicion_category: source.suspicion_category().to_string(),
    }
}

pub fn normalize_all(source: Source, raw: impl IntoIterator<Item = RawListing>) -> Vec<Listing> {
    raw.into_iter().map(|item| normalize(source, item)).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
