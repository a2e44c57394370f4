//! Projection tunables.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::projection::{ProjectionParams, DEFAULT_BASE_FACTOR};

/// `[projection]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    /// Empirical base factor `K` applied on top of the rule multiplier.
    #[serde(default = "default_base_factor")]
    pub base_factor: Decimal,
    /// Seconds before the end instant at which numbers freeze.
    #[serde(default = "default_freeze_lead_secs")]
    pub freeze_lead_secs: u64,
    /// Trailing window for the velocity estimate.
    #[serde(default = "default_velocity_window_secs")]
    pub velocity_window_secs: u64,
}

fn default_base_factor() -> Decimal {
    DEFAULT_BASE_FACTOR
}

const fn default_freeze_lead_secs() -> u64 {
    60
}

const fn default_velocity_window_secs() -> u64 {
    60
}

/// Cap for configured durations; far beyond any tournament length.
const MAX_SECS: u64 = 10 * 365 * 86_400;

fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_SECS) as i64)
}

impl ProjectionConfig {
    #[must_use]
    pub fn velocity_window(&self) -> chrono::Duration {
        seconds(self.velocity_window_secs)
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_factor: default_base_factor(),
            freeze_lead_secs: default_freeze_lead_secs(),
            velocity_window_secs: default_velocity_window_secs(),
        }
    }
}

impl From<&ProjectionConfig> for ProjectionParams {
    fn from(config: &ProjectionConfig) -> Self {
        Self {
            base_factor: config.base_factor,
            freeze_lead: seconds(config.freeze_lead_secs),
        }
    }
}
