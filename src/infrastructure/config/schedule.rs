//! Loop cadences.

use std::time::Duration;

use serde::Deserialize;

/// `[schedule]` section. Every loop runs on its own fixed interval.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Ticker poll, normalization, projection and finalization.
    #[serde(default = "default_realtime_secs")]
    pub realtime_secs: u64,
    /// Reload of the competition configuration store.
    #[serde(default = "default_competition_refresh_secs")]
    pub competition_refresh_secs: u64,
    /// Retry of uncomputed day-one start offsets.
    #[serde(default = "default_offset_refresh_secs")]
    pub offset_refresh_secs: u64,
    /// Reload of archived base volumes.
    #[serde(default = "default_base_refresh_secs")]
    pub base_refresh_secs: u64,
    /// How often to look for a UTC date change and missing tails.
    #[serde(default = "default_rollover_check_secs")]
    pub rollover_check_secs: u64,
    /// Pause between assets in batch history fetches.
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Random extra pause added to `batch_delay_ms`.
    #[serde(default = "default_batch_jitter_ms")]
    pub batch_jitter_ms: u64,
    /// Upper bound on any single port call, in milliseconds.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

const fn default_realtime_secs() -> u64 {
    3
}

const fn default_competition_refresh_secs() -> u64 {
    300
}

const fn default_offset_refresh_secs() -> u64 {
    600
}

const fn default_base_refresh_secs() -> u64 {
    1800
}

const fn default_rollover_check_secs() -> u64 {
    300
}

const fn default_batch_delay_ms() -> u64 {
    250
}

const fn default_batch_jitter_ms() -> u64 {
    100
}

const fn default_call_timeout_ms() -> u64 {
    10_000
}

impl ScheduleConfig {
    #[must_use]
    pub const fn realtime(&self) -> Duration {
        Duration::from_secs(self.realtime_secs)
    }

    #[must_use]
    pub const fn competition_refresh(&self) -> Duration {
        Duration::from_secs(self.competition_refresh_secs)
    }

    #[must_use]
    pub const fn offset_refresh(&self) -> Duration {
        Duration::from_secs(self.offset_refresh_secs)
    }

    #[must_use]
    pub const fn base_refresh(&self) -> Duration {
        Duration::from_secs(self.base_refresh_secs)
    }

    #[must_use]
    pub const fn rollover_check(&self) -> Duration {
        Duration::from_secs(self.rollover_check_secs)
    }

    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    #[must_use]
    pub const fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub const fn batch_jitter(&self) -> Duration {
        Duration::from_millis(self.batch_jitter_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            realtime_secs: default_realtime_secs(),
            competition_refresh_secs: default_competition_refresh_secs(),
            offset_refresh_secs: default_offset_refresh_secs(),
            base_refresh_secs: default_base_refresh_secs(),
            rollover_check_secs: default_rollover_check_secs(),
            batch_delay_ms: default_batch_delay_ms(),
            batch_jitter_ms: default_batch_jitter_ms(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}
