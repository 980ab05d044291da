use crate::eval::{Metric, MetricSpec, DEFAULT_METRICS};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "RANKEVAL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "rankeval.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rankeval: RankevalConfig,
    #[serde(default)]
    pub eval: EvalConfig,
}

/// Process-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct RankevalConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RankevalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Evaluation defaults, overridden by CLI flags
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Metric specifiers such as "ndcg@10"
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    /// Where to write the JSON report, if anywhere
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            output: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics() -> Vec<String> {
    DEFAULT_METRICS.iter().map(|m| m.to_string()).collect()
}

impl Config {
    /// Load configuration.
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for the config file in this order:
    /// 1. Path specified in RANKEVAL_CONFIG (must exist)
    /// 2. ./rankeval.toml in current directory (optional; defaults if absent)
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Like [`Config::load`], but falls back to defaults when the config cannot
    /// be read or validated. The load error is handed back so the caller can
    /// report it once logging is up.
    pub fn load_or_default() -> (Self, Option<anyhow::Error>) {
        match Self::load() {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load and validate a specific config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        for raw in &self.eval.metrics {
            let spec = MetricSpec::parse(raw)
                .with_context(|| format!("eval.metrics entry {:?} is invalid", raw))?;
            Metric::from_name(&spec.name)
                .with_context(|| format!("eval.metrics entry {:?} is invalid", raw))?;
        }

        if self.rankeval.log_level.trim().is_empty() {
            anyhow::bail!("rankeval.log_level must not be empty");
        }

        Ok(())
    }
}
