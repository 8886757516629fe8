//! Configuration file support for the marathon trainer.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/marathon/config.toml`.

use crate::state::validate_user_id;
use crate::{Error, IsoDate, Result, Settings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
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

/// Which user's record to work on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

/// Settings used when no stored state exists
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_base_weekly_km")]
    pub base_weekly_km: f64,

    #[serde(default = "default_peak_weekly_cap_km")]
    pub peak_weekly_cap_km: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            base_weekly_km: default_base_weekly_km(),
            peak_weekly_cap_km: default_peak_weekly_cap_km(),
        }
    }
}

impl DefaultsConfig {
    /// Default settings for a plan starting on `today`
    pub fn settings(&self, today: IsoDate) -> Settings {
        Settings {
            base_weekly_km: self.base_weekly_km,
            peak_weekly_cap_km: self.peak_weekly_cap_km,
            ..Settings::defaults(today)
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("marathon")
}

fn default_user_id() -> String {
    "local".into()
}

fn default_base_weekly_km() -> f64 {
    Settings::DEFAULT_BASE_WEEKLY_KM
}

fn default_peak_weekly_cap_km() -> f64 {
    Settings::DEFAULT_PEAK_WEEKLY_CAP_KM
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

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        validate_user_id(&self.profile.user_id)
            .map_err(|e| Error::Config(format!("profile.user_id: {}", e)))?;

        let base = self.defaults.base_weekly_km;
        let cap = self.defaults.peak_weekly_cap_km;
        if !base.is_finite() || base < 0.0 {
            return Err(Error::Config(format!(
                "defaults.base_weekly_km must be a non-negative number, got {}",
                base
            )));
        }
        if !cap.is_finite() || cap < base {
            return Err(Error::Config(format!(
                "defaults.peak_weekly_cap_km ({}) must be at least base_weekly_km ({})",
                cap, base
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("marathon").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
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
