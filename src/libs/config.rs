//! User configuration, stored as `config.json` in the tid directory.
//!
//! A missing file is not an error: every setting has a default.
//!
//! ```rust,no_run
//! use tid::libs::config::{Config, DurationFormat};
//!
//! let mut config = Config::read()?;
//! config.display.time_format = DurationFormat::Decimal;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// How durations are rendered.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DurationFormat {
    /// `1h2m3s`
    #[default]
    Text,
    /// Hours with two decimals, `1.03`
    Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub time_format: DurationFormat,
    /// The day weekly reports start on.
    pub first_weekday: Weekday,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: DurationFormat::Text,
            first_weekday: Weekday::Mon,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
}

impl Config {
    /// Reads the configuration from the tid directory, falling back to
    /// defaults when there is no file yet.
    pub fn read() -> Result<Config> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(Message::ConfigParseError(e.to_string())))
    }

    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }
}
