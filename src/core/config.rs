use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const DATASET_FILE: &str = "cryptos.csv";

fn default_coin() -> String {
    "ALL".to_string()
}

fn default_chart() -> String {
    "line".to_string()
}

fn default_currency_prefix() -> String {
    "US$".to_string()
}

/// Selector values used when the command line leaves them out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChartDefaults {
    #[serde(default = "default_coin")]
    pub coin: String,
    #[serde(default = "default_chart")]
    pub chart: String,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        ChartDefaults {
            coin: default_coin(),
            chart: default_chart(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub dataset: Option<String>,
    #[serde(default)]
    pub defaults: ChartDefaults,
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            dataset: None,
            defaults: ChartDefaults::default(),
            currency_prefix: default_currency_prefix(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "cryptodash", "cryptodash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Configured dataset, or `cryptos.csv` in the platform data directory.
    pub fn dataset_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.dataset {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "cryptodash", "cryptodash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join(DATASET_FILE))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
