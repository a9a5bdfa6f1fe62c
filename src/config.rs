//! Application configuration
//!
//! Settings are layered: `config/default`, then `config/{NOAH_ENV}`, then
//! `NOAH__SECTION__KEY` environment variables. Every key has a default so
//! the dashboard runs without any file present.

use std::time::Duration;

use serde::Deserialize;

use crate::api::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub search: SearchSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub default_patient_id: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_patient_id: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub min_query_chars: usize,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
        }
    }
}

/// Cadence of the simulated upload progress bar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub progress_tick_ms: u64,
    pub progress_step: u8,
    pub progress_ceiling: u8,
}

impl UploadSettings {
    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            progress_tick_ms: 300,
            progress_step: 10,
            progress_ceiling: 90,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Load configuration from file
pub fn load_config() -> Result<Config, ::config::ConfigError> {
    let env = std::env::var("NOAH_ENV").unwrap_or_else(|_| "development".into());

    ::config::Config::builder()
        // Start with default settings
        .add_source(::config::File::with_name("config/default").required(false))
        // Override with environment-specific settings
        .add_source(::config::File::with_name(&format!("config/{}", env)).required(false))
        // Override with environment variables
        .add_source(::config::Environment::with_prefix("NOAH").separator("__"))
        .build()?
        .try_deserialize()
}
