//! Runtime control projection types for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Runtime configuration overrides from CLI flags, taking precedence over
/// the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,
    /// Override for log level (e.g., "debug", "info", "warn").
    pub log_level: Option<String>,
    /// Whether to output logs as JSON.
    pub json_logs: bool,
}

/// What the tracker is about to use, shown before logging takes over.
#[derive(Debug, Clone)]
pub struct RunStartupSnapshot {
    pub competitions_file: String,
    pub archive_dir: String,
    pub dashboard_file: Option<String>,
}

#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Validate the request without starting anything.
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot>;

    /// Track until interrupted.
    async fn execute_run(&self, request: RunRequest) -> Result<()>;
}
