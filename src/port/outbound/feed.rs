//! Exchange market data ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::id::AssetId;
use crate::domain::market::{Ticker, TickerVariant};
use crate::domain::tail::VolumeSample;
use crate::error::Result;

/// Realtime ticker list, queried once per variant per poll.
#[async_trait]
pub trait TickerFeed: Send + Sync {
    /// Fetch every listed asset's rolling 24h counters for `variant`.
    async fn fetch_tickers(&self, variant: TickerVariant) -> Result<Vec<Ticker>>;
}

/// Bucket width of historical samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryInterval {
    OneMinute,
    OneHour,
}

impl HistoryInterval {
    #[must_use]
    pub const fn millis(self) -> i64 {
        match self {
            Self::OneMinute => 60_000,
            Self::OneHour => 3_600_000,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::OneHour => "1h",
        }
    }
}

/// A bounded history query for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub asset_id: AssetId,
    pub variant: TickerVariant,
    pub interval: HistoryInterval,
    /// Inclusive lower bound.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound.
    pub to: DateTime<Utc>,
}

/// Historical per-interval volume.
#[async_trait]
pub trait HistoryFeed: Send + Sync {
    /// Samples whose bucket starts within `[query.from, query.to)`, ordered by time.
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<VolumeSample>>;

    /// Whether `variant` can be queried at all. When limit-order history is
    /// unavailable, callers derive it from the all-trades series instead.
    fn supports(&self, variant: TickerVariant) -> bool;
}
