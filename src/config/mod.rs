use anyhow::{ Context, Result };
use serde::{ Deserialize, Serialize };
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{ Path, PathBuf };
use strum_macros::EnumString;
use tracing::Level;

use tri_arb::{ ArbitrageCycle, EngineConfig, FormatMapping, SourceRegistry };
use crate::utils::serde_helpers::{ serialize_level, deserialize_level };

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub debug: bool,
    pub transaction_cost_percent: f64,
    pub profit_threshold_percent: f64,
    pub profile: Option<PathBuf>,
    pub top_n: usize,

    #[serde(serialize_with = "serialize_level", deserialize_with = "deserialize_level")]
    pub log_level: Level,
    pub log_config: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub filename_prefix: String,
    pub rotation: LogRotation,
    pub max_files: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine; everything has a default
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any `TRA_*` variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let debug = var("TRA_DEBUG", "false")
            .parse::<bool>()
            .context("Failed to parse TRA_DEBUG environment variable")?;

        let transaction_cost_percent = var("TRA_TRANSACTION_COST_PERCENT", "0.1")
            .parse::<f64>()
            .context("Failed to parse TRA_TRANSACTION_COST_PERCENT environment variable")?;

        let profit_threshold_percent = var("TRA_PROFIT_THRESHOLD_PERCENT", "0")
            .parse::<f64>()
            .context("Failed to parse TRA_PROFIT_THRESHOLD_PERCENT environment variable")?;

        let profile = lookup("TRA_PROFILE").map(PathBuf::from);

        let top_n = var("TRA_TOP_N", "10")
            .parse::<usize>()
            .context("Failed to parse TRA_TOP_N environment variable")?;

        let log_level = var("TRA_LOG_LEVEL", "info").parse::<Level>().unwrap_or(Level::INFO);

        let log_config = LogConfig {
            directory: PathBuf::from(var("TRA_LOG_DIRECTORY", "logs")),
            filename_prefix: var("TRA_LOG_FILENAME_PREFIX", "triangular_arbitrage"),
            rotation: var("TRA_LOG_ROTATION", "daily").parse().unwrap_or(LogRotation::Daily),
            max_files: lookup("TRA_LOG_MAX_FILES").and_then(|s| s.parse::<usize>().ok()),
        };

        let config = Config {
            debug,
            transaction_cost_percent,
            profit_threshold_percent,
            profile,
            top_n,
            log_level,
            log_config,
        };
        config.engine_config()?;

        Ok(config)
    }

    /// Engine settings carried by this config, validated
    pub fn engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::new(self.transaction_cost_percent, self.profit_threshold_percent).context(
            "Invalid engine settings in TRA_TRANSACTION_COST_PERCENT / TRA_PROFIT_THRESHOLD_PERCENT"
        )
    }
}

/// Per-deployment description of sources and the cycles to watch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Source name → how to find each symbol's price in that source's payload
    pub sources: BTreeMap<String, FormatMapping>,
    pub cycles: Vec<ArbitrageCycle>,
    /// Overrides the environment's cost/threshold when present
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid profile {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let profile: Profile = serde_json::from_str(text).context("Failed to parse profile JSON")?;
        if let Some(engine) = &profile.engine {
            engine.validate().context("Invalid engine section")?;
        }
        Ok(profile)
    }

    pub fn registry(&self) -> SourceRegistry {
        let registry = SourceRegistry::new();
        for (source, mapping) in &self.sources {
            registry.register(source, mapping.clone());
        }
        registry
    }
}
