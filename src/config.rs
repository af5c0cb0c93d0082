use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BRAND: &str = "Rolex";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterConfig {
    pub brand: String,
    pub output_path: PathBuf,
    pub harvest: HarvestConfig,
    pub transport: TransportConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub pacing_delay_ms: u64,
    pub execution: ExecutionMode,
    pub max_items_per_source: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub request_timeout: u64,
    pub user_agents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub search_url: String,
    pub marketplace_url: String,
    pub handmade_url: String,
    pub dynamic_url: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 2000,
            execution: ExecutionMode::Sequential,
            max_items_per_source: 10,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: 10,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36".to_string(),
            ],
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            search_url: "https://html.duckduckgo.com".to_string(),
            marketplace_url: "https://www.ebay.com".to_string(),
            handmade_url: "https://www.etsy.com".to_string(),
            dynamic_url: "https://www.aliexpress.com".to_string(),
        }
    }
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            output_path: PathBuf::from("data.json"),
            harvest: HarvestConfig::default(),
            transport: TransportConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

impl HunterConfig {
    /// Layers built-in defaults, an optional config file, `HUNTER__*`
    /// variables and finally `BRAND_NAME`.
    /// Layers defaults, the config file, and the environment. Callers
    /// apply their own overrides and then call [`HunterConfig::validate`].
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = HunterConfig::default();
        let harvest = &defaults.harvest;
        let transport = &defaults.transport;
        let sources = &defaults.sources;

        let mut builder = Config::builder()
            .set_default("brand", defaults.brand.clone())?
            .set_default("output_path", defaults.output_path.to_string_lossy().to_string())?
            .set_default("harvest.pacing_delay_ms", harvest.pacing_delay_ms)?
            .set_default("harvest.execution", "sequential")?
            .set_default("harvest.max_items_per_source", harvest.max_items_per_source as u64)?
            .set_default("transport.request_timeout", transport.request_timeout)?
            .set_default("transport.user_agents", transport.user_agents.clone())?
            .set_default("sources.search_url", sources.search_url.clone())?
            .set_default("sources.marketplace_url", sources.marketplace_url.clone())?
            .set_default("sources.handmade_url", sources.handmade_url.clone())?
            .set_default("sources.dynamic_url", sources.dynamic_url.clone())?;

        builder = match config_file {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config/hunter").required(false)),
        };

        let s = builder
            // Add environment variables with prefix "HUNTER_"
            .add_source(Environment::with_prefix("HUNTER").separator("__"))
            .set_override_option("brand", env::var("BRAND_NAME").ok())?
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brand.trim().is_empty() {
            return Err(ConfigError::Message("Brand name must not be empty".into()));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Message("Output path must not be empty".into()));
        }

        if self.harvest.max_items_per_source == 0 {
            return Err(ConfigError::Message(
                "Harvest max_items_per_source must be greater than 0".into(),
            ));
        }

        if self.transport.request_timeout == 0 {
            return Err(ConfigError::Message(
                "Transport request_timeout must be greater than 0".into(),
            ));
        }

        if self.transport.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Message(
                "Transport user_agents must contain at least one entry".into(),
            ));
        }

        for (name, value) in [
            ("search_url", &self.sources.search_url),
            ("marketplace_url", &self.sources.marketplace_url),
            ("handmade_url", &self.sources.handmade_url),
            ("dynamic_url", &self.sources.dynamic_url),
        ] {
            if Url::parse(value).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid URL format for sources.{}",
                    name
                )));
            }
        }

        Ok(())
    }
}
