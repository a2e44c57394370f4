//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to defaults suitable for the public exchange endpoints.
//!
//! # Example
//!
//! ```no_run
//! use alpha_tourney::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::projection::ProjectionConfig;
use super::schedule::ScheduleConfig;
use super::storage::StorageConfig;
use crate::adapter::outbound::alpha::settings::{AlphaConfig, SYMBOL_PLACEHOLDER};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Exchange endpoints and HTTP behaviour.
    #[serde(default)]
    pub exchange: AlphaConfig,

    /// Loop cadences and batch pacing.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Projection tunables.
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Archive, competition list, and dashboard locations.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let exchange = &self.exchange;
        validate_url("ticker_url", &exchange.ticker_url)?;
        if let Some(url) = &exchange.limit_ticker_url {
            validate_url("limit_ticker_url", url)?;
        }
        validate_history_url("history_url", &exchange.history_url)?;
        if let Some(url) = &exchange.limit_history_url {
            validate_history_url("limit_history_url", url)?;
        }
        if exchange.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "user_agent",
            }
            .into());
        }
        if exchange.timeout_ms == 0 {
            return Err(positive("timeout_ms"));
        }
        if exchange.connect_timeout_ms == 0 {
            return Err(positive("connect_timeout_ms"));
        }
        if exchange.history_page_limit == 0 {
            return Err(positive("history_page_limit"));
        }

        let schedule = &self.schedule;
        for (field, value) in [
            ("realtime_secs", schedule.realtime_secs),
            ("competition_refresh_secs", schedule.competition_refresh_secs),
            ("offset_refresh_secs", schedule.offset_refresh_secs),
            ("base_refresh_secs", schedule.base_refresh_secs),
            ("rollover_check_secs", schedule.rollover_check_secs),
            ("call_timeout_ms", schedule.call_timeout_ms),
        ] {
            if value == 0 {
                return Err(positive(field));
            }
        }

        if self.projection.base_factor <= Decimal::ZERO {
            return Err(positive("base_factor"));
        }
        if self.projection.velocity_window_secs == 0 {
            return Err(positive("velocity_window_secs"));
        }

        if self.storage.archive_dir.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "archive_dir",
            }
            .into());
        }
        if self.storage.competitions_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "competitions_file",
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn positive(field: &'static str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: "must be greater than 0".to_string(),
    }
    .into()
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

#[allow(clippy::result_large_err)]
fn validate_history_url(field: &'static str, value: &str) -> Result<()> {
    if !value.contains(SYMBOL_PLACEHOLDER) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("must contain the {SYMBOL_PLACEHOLDER} placeholder"),
        }
        .into());
    }
    validate_url(field, &value.replace(SYMBOL_PLACEHOLDER, "SYMBOL"))
}
