use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{AppError, Result};

/// Price value used when a source does not expose one.
pub const UNKNOWN_PRICE: &str = "unknown";

/// Thumbnail used when a source does not expose one.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/100x100?text=Web";

/// Which adapter produced a listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    #[serde(rename = "General Web")]
    GeneralWeb,
    #[serde(rename = "Marketplace")]
    Marketplace,
    #[serde(rename = "Handmade Marketplace")]
    HandmadeMarketplace,
    #[serde(rename = "Dynamic Marketplace")]
    DynamicMarketplace,
}

impl Source {
    /// Static triage hint attached to every listing from this source.
    pub fn suspicion_category(&self) -> &'static str {
        match self {
            Source::GeneralWeb => "Standalone Storefront",
            Source::Marketplace => "Marketplace Listing",
            Source::HandmadeMarketplace => "Handmade/Replica",
            Source::DynamicMarketplace => "Dynamic Marketplace Listing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Source::GeneralWeb => "General Web",
            Source::Marketplace => "Marketplace",
            Source::HandmadeMarketplace => "Handmade Marketplace",
            Source::DynamicMarketplace => "Dynamic Marketplace",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical record written to the output artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub source: Source,
    pub title: String,
    pub price: String,
    pub link: String,
    pub image: String,
    pub suspicion_category: String,
}

/// Fields pulled out of one result item before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub title: String,
    pub link: String,
    pub price: Option<String>,
    pub image: Option<String>,
}

impl RawListing {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// The brand being hunted for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestQuery {
    brand: String,
}

impl HarvestQuery {
    pub fn new(brand: impl Into<String>) -> Result<Self> {
        let brand = brand.into().trim().to_string();
        if brand.is_empty() {
            return Err(AppError::Config(ConfigError::Message(
                "Brand name must not be empty".into(),
            )));
        }
        Ok(Self { brand })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }
}
