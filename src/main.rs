use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use brand_hunter::config::ExecutionMode;
use brand_hunter::plugins::AdapterRegistry;
use brand_hunter::sink::JsonFileSink;
use brand_hunter::transport::HttpTransport;
use brand_hunter::{HarvestQuery, Harvester, HunterConfig};

/// Hunt independent shops and marketplaces for listings of a brand.
#[derive(Debug, Parser)]
#[command(name = "brand-hunter", version, about)]
struct Cli {
    /// Brand to hunt for (overrides BRAND_NAME)
    #[arg(short, long)]
    brand: Option<String>,

    /// Where to write the JSON listing file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to config/hunter.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Pause between sources, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Query all sources at once
    #[arg(long)]
    concurrent: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brand_hunter=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = HunterConfig::load(cli.config.as_deref())?;
    if let Some(brand) = cli.brand {
        config.brand = brand;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.harvest.pacing_delay_ms = delay_ms;
    }
    if cli.concurrent {
        config.harvest.execution = ExecutionMode::Concurrent;
    }
    config.validate()?;

    info!("Starting Counterfeit Hunter for '{}'...", config.brand);

    let query = HarvestQuery::new(config.brand.clone())?;
    let transport = Arc::new(HttpTransport::new(&config.transport)?);
    let registry = AdapterRegistry::with_defaults(&config, transport);
    let harvester = Harvester::new(registry, &config.harvest);
    let sink = JsonFileSink::new(config.output_path.clone());

    let report = harvester.run_and_persist(&query, &sink).await?;
    info!(
        soft_failures = report.soft_failures(),
        elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
        "Hunt finished"
    );

    Ok(())
}
