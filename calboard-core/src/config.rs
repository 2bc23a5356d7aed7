//! Global calboard configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalboardError, CalboardResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/calboard";
static DEFAULT_HOLIDAY_ENDPOINT: &str = "https://calendarific.com/api/v2/holidays";
static DEFAULT_COUNTRY: &str = "IN";
const DEFAULT_YEAR: i32 = 2024;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 300;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_filter_debounce_ms() -> u64 {
    DEFAULT_FILTER_DEBOUNCE_MS
}

fn default_endpoint() -> String {
    DEFAULT_HOLIDAY_ENDPOINT.to_string()
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Holiday provider settings (`[holidays]` table).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HolidayConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_year")]
    pub year: i32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        HolidayConfig {
            endpoint: default_endpoint(),
            api_key: None,
            country: default_country(),
            year: default_year(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration at ~/.config/calboard/config.toml
///
/// Every key can be overridden from the environment, e.g.
/// `CALBOARD__HOLIDAYS__API_KEY=...`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalboardConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,

    #[serde(default)]
    pub holidays: HolidayConfig,
}

impl Default for CalboardConfig {
    fn default() -> Self {
        CalboardConfig {
            data_dir: default_data_dir(),
            filter_debounce_ms: default_filter_debounce_ms(),
            holidays: HolidayConfig::default(),
        }
    }
}

impl CalboardConfig {
    pub fn config_path() -> CalboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalboardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Save the current config to ~/.config/calboard/config.toml
    pub fn save(&self) -> CalboardResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> CalboardResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalboardError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Load from the default location, writing a commented template first
    /// if no config file exists yet.
    pub fn load() -> CalboardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalboardResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("CALBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CalboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalboardError::Config(e.to_string()))
    }

    /// Directory holding the persisted user events, with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalboardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# Where your own events are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Quiet period before the event filter applies what you typed:
# filter_debounce_ms = {DEFAULT_FILTER_DEBOUNCE_MS}

[holidays]
# endpoint = \"{DEFAULT_HOLIDAY_ENDPOINT}\"
# api_key = \"your-api-key\"
# country = \"{DEFAULT_COUNTRY}\"
# year = {DEFAULT_YEAR}
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
