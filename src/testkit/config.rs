//! Canonical test configurations.
//!
//! Single source of truth for settings used across tests, so no test module
//! defines its own slightly-different defaults.

use std::time::Duration;

use crate::application::tracker::TrackerSettings;

/// Tracker settings with zero pacing, so batch loops never sleep in tests.
pub fn settings() -> TrackerSettings {
    TrackerSettings {
        call_timeout: Duration::from_secs(2),
        batch_delay: Duration::ZERO,
        batch_jitter: Duration::ZERO,
        ..TrackerSettings::default()
    }
}
