//! Concrete operator implementation handed to inbound adapters.

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::runtime::RunRequest;

/// Infrastructure-backed implementation of every operator port.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operator;

impl Operator {
    /// Parse the request's configuration and apply its CLI overrides.
    pub(super) fn load_run_config(request: &RunRequest) -> Result<Config> {
        let mut config = Config::parse_toml(&request.config_toml)?;
        if let Some(level) = &request.log_level {
            config.logging.level.clone_from(level);
        }
        if request.json_logs {
            config.logging.format = "json".to_string();
        }
        Ok(config)
    }
}
