//! Diagnostic projections for operator-facing adapters.

use rust_decimal::Decimal;

use crate::error::Result;

/// Summary output for `check`.
#[derive(Debug, Clone)]
pub struct ConfigCheckReport {
    pub ticker_url: String,
    pub limit_ticker_url: Option<String>,
    pub history_url: String,
    pub limit_history_url: Option<String>,
    pub realtime_secs: u64,
    pub competition_refresh_secs: u64,
    pub offset_refresh_secs: u64,
    pub base_refresh_secs: u64,
    pub rollover_check_secs: u64,
    pub base_factor: Decimal,
    pub freeze_lead_secs: u64,
    pub velocity_window_secs: u64,
    pub competitions_file: String,
    pub archive_dir: String,
    pub dashboard_file: Option<String>,
    pub roll_base_volume: bool,
}

impl ConfigCheckReport {
    /// True when limit-order history has to be derived from the observed
    /// limit share instead of being queried.
    #[must_use]
    pub const fn derives_limit_history(&self) -> bool {
        self.limit_history_url.is_none()
    }
}

pub trait DiagnosticOperator: Send + Sync {
    /// Parse and validate `config_toml`.
    fn check_config(&self, config_toml: &str) -> Result<ConfigCheckReport>;
}
