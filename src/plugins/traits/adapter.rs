use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Listing, Source};
use crate::utils::error::Result;

/// What one adapter produced for one run.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Harvested(Vec<Listing>),
    /// Network or structure failure contained at the adapter boundary.
    SoftFailure { reason: String },
    /// The source cannot be extracted without capabilities this tool lacks.
    CapabilityUnavailable { note: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Harvested,
    SoftFailure,
    CapabilityUnavailable,
}

impl SourceOutcome {
    /// Converts the fallible internals of an adapter into an outcome,
    /// logging failures instead of propagating them.
    pub fn from_result(source: Source, result: Result<Vec<Listing>>) -> Self {
        match result {
            Ok(listings) => SourceOutcome::Harvested(listings),
            Err(e) => {
                warn!(source = %source, error = %e, "{} search failed", source);
                SourceOutcome::SoftFailure {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            SourceOutcome::Harvested(_) => OutcomeKind::Harvested,
            SourceOutcome::SoftFailure { .. } => OutcomeKind::SoftFailure,
            SourceOutcome::CapabilityUnavailable { .. } => OutcomeKind::CapabilityUnavailable,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        match self {
            SourceOutcome::Harvested(listings) => listings,
            _ => &[],
        }
    }

    pub fn into_listings(self) -> Vec<Listing> {
        match self {
            SourceOutcome::Harvested(listings) => listings,
            _ => Vec::new(),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            SourceOutcome::SoftFailure { reason } => Some(reason),
            SourceOutcome::CapabilityUnavailable { note } => Some(note),
            SourceOutcome::Harvested(_) => None,
        }
    }
}

/// One external origin of candidate listings.
///
/// `harvest` has no error path: implementations contain every network and
/// parse failure and report it through [`SourceOutcome`].
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;
    fn source(&self) -> Source;

    async fn harvest(&self, brand: &str) -> SourceOutcome;
}
