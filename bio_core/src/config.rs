//! Configuration file support for the Bio-Dashboard.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bio/config.toml`.
//!
//! ```toml
//! [data]
//! data_dir = "/data/bio"
//!
//! [pharmacokinetics.elvanse]
//! ka = 0.78
//! ke = 0.088
//! reference_dose_mg = 40
//!
//! [timeline]
//! interval_minutes = 15
//! lookback_hours = 24
//! ```

use crate::substances::RateTable;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub pharmacokinetics: RateTable,

    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn intake_log_path(&self) -> PathBuf {
        self.data_dir.join("intakes.jsonl")
    }

    pub fn sleep_sample_path(&self) -> PathBuf {
        self.data_dir.join("sleep.json")
    }
}

/// Day-curve sampling configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,

    /// How far before the evaluated window intakes are still loaded
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("bio")
}

fn default_interval_minutes() -> u32 {
    crate::timeline::DEFAULT_INTERVAL_MINUTES
}

fn default_lookback_hours() -> u32 {
    24
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject rate constants the Bateman model cannot use and a zero interval
    pub fn validate(&self) -> Result<()> {
        self.pharmacokinetics.validate()?;
        if self.timeline.interval_minutes == 0 {
            return Err(Error::Config(
                "timeline.interval_minutes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("bio").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
