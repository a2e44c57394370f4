//! Realtime market data: rolling snapshots, ticker variants, and price trend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::id::AssetId;
use super::normalize::{DailyVolume, RollingCounters, TodayVolume};

/// Which trade population a rolling counter covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerVariant {
    /// Every trade, regardless of order type.
    All,
    /// Only trades where the aggressor was a limit order.
    LimitOnly,
}

impl TickerVariant {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::LimitOnly => "limit_only",
        }
    }
}

/// One row of the realtime ticker feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    pub asset_id: AssetId,
    pub price: Decimal,
    pub rolling_volume_24h: Decimal,
    pub rolling_tx_count_24h: u64,
}

/// Per-asset sample taken on each poll.
///
/// Replaced wholesale each cycle, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetRollingSnapshot {
    pub price: Decimal,
    /// Exchange-reported sum over the trailing 24h.
    pub rolling_volume_24h: Decimal,
    pub rolling_tx_count_24h: u64,
    pub timestamp_ms: i64,
}

impl AssetRollingSnapshot {
    #[must_use]
    pub fn from_ticker(ticker: &Ticker, at: DateTime<Utc>) -> Self {
        Self {
            price: ticker.price,
            rolling_volume_24h: ticker.rolling_volume_24h.max(Decimal::ZERO),
            rolling_tx_count_24h: ticker.rolling_tx_count_24h,
            timestamp_ms: at.timestamp_millis(),
        }
    }
}

/// Short-term price movement between two consecutive polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceTrend {
    #[default]
    Normal,
    Slippage,
    Dumping,
    Pumping,
}

const SLIPPAGE_THRESHOLD: Decimal = dec!(-0.005);
const DUMPING_THRESHOLD: Decimal = dec!(-0.015);
const PUMPING_THRESHOLD: Decimal = dec!(0.005);

impl PriceTrend {
    /// Classify a relative price change.
    #[must_use]
    pub fn classify(change: Decimal) -> Self {
        if change < DUMPING_THRESHOLD {
            Self::Dumping
        } else if change < SLIPPAGE_THRESHOLD {
            Self::Slippage
        } else if change > PUMPING_THRESHOLD {
            Self::Pumping
        } else {
            Self::Normal
        }
    }
}

/// Relative change from `previous` to `current`; zero when there is no usable
/// reference price.
#[must_use]
pub fn relative_change(previous: Option<Decimal>, current: Decimal) -> Decimal {
    match previous {
        Some(prev) if prev > Decimal::ZERO => (current - prev) / prev,
        _ => Decimal::ZERO,
    }
}

/// Published per-asset market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataEntry {
    pub asset_id: AssetId,
    pub all: AssetRollingSnapshot,
    /// Missing when the limit-order feed has never answered for this asset.
    pub limit: Option<AssetRollingSnapshot>,
    pub trend: PriceTrend,
    pub price_change: Decimal,
    /// Today's calendar-day volume (all trades), after tail subtraction.
    pub daily_volume: Decimal,
    pub daily_limit_volume: Decimal,
    pub daily_tx_count: u64,
    pub updated_at: DateTime<Utc>,
}

impl MarketDataEntry {
    /// Build a fresh entry, deriving the trend from the previously published one.
    #[must_use]
    pub fn observe(
        asset_id: AssetId,
        all: AssetRollingSnapshot,
        limit: Option<AssetRollingSnapshot>,
        previous: Option<&Self>,
        at: DateTime<Utc>,
    ) -> Self {
        let change = relative_change(previous.map(|p| p.all.price), all.price);
        Self {
            asset_id,
            all,
            limit,
            trend: PriceTrend::classify(change),
            price_change: change,
            daily_volume: Decimal::ZERO,
            daily_limit_volume: Decimal::ZERO,
            daily_tx_count: 0,
            updated_at: at,
        }
    }

    /// Rolling limit volume, or zero when unknown.
    #[must_use]
    pub fn rolling_limit_volume(&self) -> Decimal {
        self.limit
            .map_or(Decimal::ZERO, |snapshot| snapshot.rolling_volume_24h)
    }

    #[must_use]
    pub fn rolling_counters(&self) -> RollingCounters {
        RollingCounters {
            total_volume: self.all.rolling_volume_24h,
            limit_volume: self.rolling_limit_volume(),
            total_trades: self.all.rolling_tx_count_24h,
        }
    }

    /// Store today's normalized figures on the entry.
    pub fn apply_daily(&mut self, today: TodayVolume) {
        self.daily_volume = today.volume.total;
        self.daily_limit_volume = today.volume.limit;
        self.daily_tx_count = today.tx_count;
    }

    #[must_use]
    pub fn today_volume(&self) -> TodayVolume {
        TodayVolume {
            volume: DailyVolume::reconcile(self.daily_volume, self.daily_limit_volume),
            tx_count: self.daily_tx_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn classify_thresholds() {
        assert_eq!(PriceTrend::classify(dec!(0)), PriceTrend::Normal);
        assert_eq!(PriceTrend::classify(dec!(-0.005)), PriceTrend::Normal);
        assert_eq!(PriceTrend::classify(dec!(-0.006)), PriceTrend::Slippage);
        assert_eq!(PriceTrend::classify(dec!(-0.02)), PriceTrend::Dumping);
        assert_eq!(PriceTrend::classify(dec!(0.0051)), PriceTrend::Pumping);
    }

    #[test]
    fn relative_change_without_reference_is_zero() {
        assert_eq!(relative_change(None, dec!(5)), Decimal::ZERO);
        assert_eq!(relative_change(Some(Decimal::ZERO), dec!(5)), Decimal::ZERO);
        assert_eq!(relative_change(Some(dec!(100)), dec!(98)), dec!(-0.02));
    }

    #[test]
    fn observe_derives_trend_from_previous_price() {
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let snap = |price| AssetRollingSnapshot {
            price,
            rolling_volume_24h: dec!(10),
            rolling_tx_count_24h: 1,
            timestamp_ms: 0,
        };
        let first = MarketDataEntry::observe(AssetId::new("A"), snap(dec!(1.00)), None, None, at);
        assert_eq!(first.trend, PriceTrend::Normal);

        let second =
            MarketDataEntry::observe(AssetId::new("A"), snap(dec!(0.97)), None, Some(&first), at);
        assert_eq!(second.trend, PriceTrend::Dumping);
        assert_eq!(second.rolling_limit_volume(), Decimal::ZERO);
    }

    #[test]
    fn snapshot_clamps_negative_rolling_volume() {
        let ticker = Ticker {
            asset_id: AssetId::new("A"),
            price: dec!(1),
            rolling_volume_24h: dec!(-3),
            rolling_tx_count_24h: 0,
        };
        let snapshot = AssetRollingSnapshot::from_ticker(&ticker, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(snapshot.rolling_volume_24h, Decimal::ZERO);
    }
}
