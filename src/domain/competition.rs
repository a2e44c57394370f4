//! Tournament configuration and rule semantics.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::id::AssetId;

/// How trade volume counts toward a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Buys and sells both count.
    TradeAll,
    /// Only the buy side counts; assumed to be half of all volume.
    BuyOnly,
    /// Volume counts four times.
    TradeX4,
}

impl RuleType {
    /// Factor applied to projected volume.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::TradeAll => Decimal::ONE,
            Self::BuyOnly => dec!(0.5),
            Self::TradeX4 => dec!(4),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TradeAll => "All trades",
            Self::BuyOnly => "Buy volume only",
            Self::TradeX4 => "Trades count x4",
        }
    }
}

/// Which volume series drives a tournament's projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeBasis {
    #[default]
    All,
    /// Only limit-order volume qualifies.
    LimitOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionStatus {
    #[default]
    Live,
    Finalized,
}

impl CompetitionStatus {
    #[must_use]
    pub const fn is_finalized(self) -> bool {
        matches!(self, Self::Finalized)
    }
}

/// A previously published reward target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub date: NaiveDate,
    pub target: i64,
}

/// One tournament, as supplied by the configuration store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    pub asset_id: AssetId,
    pub start_date: NaiveDate,
    /// UTC start time on `start_date`; midnight when absent.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    pub end_date: NaiveDate,
    /// UTC end time on `end_date`; end of day when absent.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    pub rule_type: RuleType,
    pub winner_count: u32,
    #[serde(default)]
    pub admin_factor: Option<Decimal>,
    #[serde(default)]
    pub volume_basis: VolumeBasis,
    #[serde(default)]
    pub target_history: Vec<TargetPoint>,
    #[serde(default)]
    pub status: CompetitionStatus,
}

impl CompetitionConfig {
    #[must_use]
    pub fn start_instant(&self) -> DateTime<Utc> {
        let time = self.start_time.unwrap_or_default();
        Utc.from_utc_datetime(&self.start_date.and_time(time))
    }

    #[must_use]
    pub fn end_instant(&self) -> DateTime<Utc> {
        match self.end_time {
            Some(time) => Utc.from_utc_datetime(&self.end_date.and_time(time)),
            None => {
                Utc.from_utc_datetime(&self.end_date.and_time(NaiveTime::default()))
                    + Duration::days(1)
            }
        }
    }

    /// Instant after which numbers are frozen and the tournament finalizes.
    #[must_use]
    pub fn freeze_instant(&self, lead: Duration) -> DateTime<Utc> {
        self.end_instant() - lead
    }

    /// True when the tournament starts after midnight on its first day.
    #[must_use]
    pub fn has_mid_day_start(&self) -> bool {
        self.start_time.is_some_and(|t| t > NaiveTime::default())
    }

    #[must_use]
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_date == date
    }

    /// True when `date` is one of the tournament's calendar days.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    #[must_use]
    pub fn uses_limit_volume(&self) -> bool {
        self.volume_basis == VolumeBasis::LimitOnly
    }

    /// Product of rule multiplier, base factor `k` and the admin override.
    #[must_use]
    pub fn effective_multiplier(&self, k: Decimal) -> Decimal {
        self.rule_type.multiplier() * k * self.admin_factor.unwrap_or(Decimal::ONE)
    }

    /// Most recent strictly positive published target.
    #[must_use]
    pub fn latest_published_target(&self) -> Option<TargetPoint> {
        self.target_history
            .iter()
            .filter(|p| p.target > 0)
            .max_by_key(|p| p.date)
            .copied()
    }
}
