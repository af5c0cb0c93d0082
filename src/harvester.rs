use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info};

use crate::config::{ExecutionMode, HarvestConfig};
use crate::models::{HarvestQuery, Listing, Source};
use crate::plugins::manager::{AdapterRegistry, SourceAdapterBox};
use crate::plugins::traits::{OutcomeKind, SourceOutcome};
use crate::sink::ListingSink;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HarvestState {
    NotStarted,
    Running { adapter: usize },
    Aggregated,
    Persisted,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSummary {
    pub source: Source,
    pub adapter: String,
    pub outcome: OutcomeKind,
    pub listings: usize,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub brand: String,
    pub listings: Vec<Listing>,
    pub sources: Vec<SourceSummary>,
    pub state: HarvestState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    pub fn soft_failures(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.outcome == OutcomeKind::SoftFailure)
            .count()
    }

    pub fn count_for(&self, source: Source) -> usize {
        self.listings.iter().filter(|l| l.source == source).count()
    }
}

/// Minimum spacing between successive invocations of the same adapter.
struct Pacer {
    min_interval: Duration,
    last_started: Vec<Mutex<Option<Instant>>>,
}

impl Pacer {
    fn new(min_interval: Duration, adapters: usize) -> Self {
        Self {
            min_interval,
            last_started: (0..adapters).map(|_| Mutex::new(None)).collect(),
        }
    }

    async fn wait_turn(&self, adapter: usize) {
        let mut last = self.last_started[adapter].lock().await;
        if let Some(started) = *last {
            let remaining = self.min_interval.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Runs every registered adapter for a brand and merges their listings.
pub struct Harvester {
    adapters: Vec<SourceAdapterBox>,
    pacing_delay: Duration,
    execution: ExecutionMode,
    pacer: Pacer,
}

impl Harvester {
    pub fn new(registry: AdapterRegistry, config: &HarvestConfig) -> Self {
        let adapters = registry.into_adapters();
        let pacing_delay = Duration::from_millis(config.pacing_delay_ms);
        let pacer = Pacer::new(pacing_delay, adapters.len());

        Self {
            adapters,
            pacing_delay,
            execution: config.execution,
            pacer,
        }
    }

    pub fn sources(&self) -> Vec<Source> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    /// Collects listings from every adapter. Adapter failures are contained;
    /// this never fails.
    pub async fn run(&self, query: &HarvestQuery) -> HarvestReport {
        let brand = query.brand();
        let started_at = Utc::now();
        let mut state = HarvestState::NotStarted;
        debug!(?state, brand, "Harvest created");

        let outcomes = match self.execution {
            ExecutionMode::Sequential => self.run_sequential(brand, &mut state).await,
            ExecutionMode::Concurrent => {
                debug!(adapters = self.adapters.len(), "Invoking all sources concurrently");
                self.run_concurrent(brand).await
            }
        };

        let mut listings = Vec::new();
        let mut sources = Vec::with_capacity(outcomes.len());
        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            let summary = SourceSummary {
                source: adapter.source(),
                adapter: adapter.name().to_string(),
                outcome: outcome.kind(),
                listings: outcome.listings().len(),
                reason: outcome.reason().map(str::to_string),
            };
            info!(
                source = %summary.source,
                outcome = ?summary.outcome,
                "{}: {} listings",
                summary.adapter,
                summary.listings
            );
            sources.push(summary);
            listings.extend(outcome.into_listings());
        }

        state = HarvestState::Aggregated;
        debug!(?state, total = listings.len(), "Harvest aggregated");

        HarvestReport {
            brand: brand.to_string(),
            listings,
            sources,
            state,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn run_sequential(&self, brand: &str, state: &mut HarvestState) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::with_capacity(self.adapters.len());
        for (index, adapter) in self.adapters.iter().enumerate() {
            if index > 0 && !self.pacing_delay.is_zero() {
                debug!(delay_ms = self.pacing_delay.as_millis() as u64, "Pacing before next source");
                sleep(self.pacing_delay).await;
            }
            *state = HarvestState::Running { adapter: index };
            debug!(state = ?*state, adapter = adapter.name(), "Invoking source");
            outcomes.push(adapter.harvest(brand).await);
        }
        outcomes
    }

    async fn run_concurrent(&self, brand: &str) -> Vec<SourceOutcome> {
        let tasks = self.adapters.iter().enumerate().map(|(index, adapter)| async move {
            self.pacer.wait_turn(index).await;
            adapter.harvest(brand).await
        });
        // join_all yields results in input order.
        join_all(tasks).await
    }

    /// Runs the harvest and writes the aggregate. Only a persist failure is
    /// returned as an error.
    pub async fn run_and_persist(
        &self,
        query: &HarvestQuery,
        sink: &dyn ListingSink,
    ) -> Result<HarvestReport> {
        let mut report = self.run(query).await;

        match sink.persist(&report.listings) {
            Ok(path) => {
                report.state = HarvestState::Persisted;
                report.finished_at = Utc::now();
                info!(
                    "Saved {} potential fakes to {}",
                    report.listings.len(),
                    path.display()
                );
                Ok(report)
            }
            Err(e) => {
                report.state = HarvestState::Failed;
                error!(state = ?report.state, error = %e, "Failed to persist listings");
                Err(e)
            }
        }
    }
}
