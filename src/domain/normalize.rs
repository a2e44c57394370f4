//! Rolling 24h counter to calendar-day volume.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tail::{AssetTails, MinuteTailTable};

/// Portion of the rolling counter `rolling` that belongs to today.
///
/// `rolling - tail[minute]`, clamped at zero when the tail is stale or the
/// counter was reset upstream.
#[must_use]
pub fn normalize_daily(rolling: Decimal, tail: &MinuteTailTable, minute: usize) -> Decimal {
    (rolling - tail.volume_at(minute)).max(Decimal::ZERO)
}

/// Trade-count counterpart of [`normalize_daily`].
#[must_use]
pub fn normalize_daily_trades(rolling: u64, tail: &MinuteTailTable, minute: usize) -> u64 {
    rolling.saturating_sub(tail.trades_at(minute))
}

/// Today's volume for both trade populations.
///
/// Invariant: `total >= limit >= 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub total: Decimal,
    pub limit: Decimal,
}

impl DailyVolume {
    /// Reconcile independently measured totals.
    ///
    /// The two upstream counters are noisy, so a total below the limit
    /// figure is raised to match it rather than trusted.
    #[must_use]
    pub fn reconcile(total: Decimal, limit: Decimal) -> Self {
        let limit = limit.max(Decimal::ZERO);
        Self {
            total: total.max(limit),
            limit,
        }
    }
}

/// Inputs for one asset at one instant.
#[derive(Debug, Clone, Copy)]
pub struct RollingCounters {
    pub total_volume: Decimal,
    pub limit_volume: Decimal,
    pub total_trades: u64,
}

/// Today's normalized figures for one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayVolume {
    pub volume: DailyVolume,
    pub tx_count: u64,
}

impl TodayVolume {
    /// Subtract yesterday's remaining tail from each rolling counter.
    ///
    /// With no applicable tails the raw counters pass through unchanged.
    #[must_use]
    pub fn from_rolling(counters: RollingCounters, tails: Option<&AssetTails>, minute: usize) -> Self {
        let empty = MinuteTailTable::empty();
        let (all, limit) = tails.map_or((&empty, &empty), |t| (&t.all, &t.limit));

        Self {
            volume: DailyVolume::reconcile(
                normalize_daily(counters.total_volume, all, minute),
                normalize_daily(counters.limit_volume, limit, minute),
            ),
            tx_count: normalize_daily_trades(counters.total_trades, all, minute),
        }
    }
}
