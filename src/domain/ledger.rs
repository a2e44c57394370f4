//! Accumulation of archived base volume with today's normalized volume.
//!
//! Recomputed from scratch on every cycle; nothing here is incremental.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalize::{DailyVolume, TodayVolume};
use super::tail::VolumeSample;

/// Volume for one calendar day of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub volume: Decimal,
}

fn upsert_history(history: &mut Vec<HistoryPoint>, date: NaiveDate, volume: Decimal) {
    match history.iter_mut().find(|p| p.date == date) {
        Some(point) => point.volume = volume,
        None => {
            history.push(HistoryPoint { date, volume });
            history.sort_by_key(|p| p.date);
        }
    }
}

/// Volume carried over from finished days of a multi-day tournament.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseVolume {
    pub volume: Decimal,
    pub limit_volume: Decimal,
    pub tx_count: u64,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    /// Last calendar day folded into this base.
    #[serde(default)]
    pub through: Option<NaiveDate>,
}

impl BaseVolume {
    /// True when this base can belong to a competition starting on `start`.
    ///
    /// A base whose last folded day precedes `start` was carried over from an
    /// earlier competition on the same asset. Bases without a marker were
    /// seeded by operators and are trusted.
    #[must_use]
    pub fn belongs_to(&self, start: NaiveDate) -> bool {
        self.through.map_or(true, |through| through >= start)
    }

    /// Fold a finished day into the base.
    ///
    /// Returns `false` without changes when `date` is already included.
    pub fn roll_day(&mut self, date: NaiveDate, day: TodayVolume) -> bool {
        if self.through.is_some_and(|through| through >= date) {
            return false;
        }
        self.volume += day.volume.total;
        self.limit_volume += day.volume.limit;
        self.tx_count = self.tx_count.saturating_add(day.tx_count);
        upsert_history(&mut self.history, date, day.volume.total);
        self.through = Some(date);
        true
    }
}

/// Volume traded between midnight and a tournament's start on day one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOffset {
    pub volume: Decimal,
    pub limit_volume: Decimal,
    pub tx_count: u64,
}

impl StartOffset {
    /// Sum the samples whose whole interval lies in `[day_start, start)`.
    ///
    /// A bucket straddling the start instant is left out entirely, so coarse
    /// intervals undercount the offset rather than eat into counted volume.
    #[must_use]
    pub fn from_samples(
        all: &[VolumeSample],
        limit: &[VolumeSample],
        day_start: DateTime<Utc>,
        start: DateTime<Utc>,
        interval_ms: i64,
    ) -> Self {
        let lower = day_start.timestamp_millis();
        let upper = start.timestamp_millis();
        let in_window =
            |s: &&VolumeSample| s.timestamp_ms >= lower && s.timestamp_ms + interval_ms <= upper;

        let (volume, tx_count) = all
            .iter()
            .filter(in_window)
            .fold((Decimal::ZERO, 0_u64), |(v, t), s| {
                (v + s.volume.max(Decimal::ZERO), t.saturating_add(s.trades))
            });
        let limit_volume = limit
            .iter()
            .filter(in_window)
            .map(|s| s.volume.max(Decimal::ZERO))
            .sum();

        Self {
            volume,
            limit_volume,
            tx_count,
        }
    }
}

/// Availability of the day-one start offset for a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetState {
    /// Not day one, or the tournament starts at midnight.
    NotApplicable,
    /// Day one, but the historical query has not succeeded yet. Today's
    /// volume is reported unsubtracted until it does.
    Pending,
    Ready(StartOffset),
}

/// Base plus today, for both trade populations and transaction counts.
///
/// Invariant: `total_volume >= limit_volume >= 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatedVolume {
    pub base_volume: Decimal,
    pub today_volume: Decimal,
    pub total_volume: Decimal,
    pub base_limit_volume: Decimal,
    pub today_limit_volume: Decimal,
    pub limit_volume: Decimal,
    pub base_tx_count: u64,
    pub today_tx_count: u64,
    pub tx_count: u64,
    /// True while today's figure still includes pre-start volume.
    pub offset_pending: bool,
    pub history: Vec<HistoryPoint>,
}

impl AccumulatedVolume {
    /// Merge `base` with today's normalized volume for `date`.
    #[must_use]
    pub fn merge(
        base: Option<&BaseVolume>,
        today: TodayVolume,
        offset: OffsetState,
        date: NaiveDate,
    ) -> Self {
        let today = apply_offset(today, offset);
        let empty = BaseVolume::default();
        let base = base.unwrap_or(&empty);

        let mut history = base.history.clone();
        upsert_history(&mut history, date, today.volume.total);

        let limit_volume = (base.limit_volume + today.volume.limit).max(Decimal::ZERO);
        let total_volume = (base.volume + today.volume.total).max(limit_volume);

        Self {
            base_volume: base.volume,
            today_volume: today.volume.total,
            total_volume,
            base_limit_volume: base.limit_volume,
            today_limit_volume: today.volume.limit,
            limit_volume,
            base_tx_count: base.tx_count,
            today_tx_count: today.tx_count,
            tx_count: base.tx_count.saturating_add(today.tx_count),
            offset_pending: offset == OffsetState::Pending,
            history,
        }
    }

    /// Totals of a finished tournament: the base alone, nothing for today.
    #[must_use]
    pub fn from_base(base: Option<&BaseVolume>) -> Self {
        let Some(base) = base else {
            return Self::default();
        };
        let limit_volume = base.limit_volume.max(Decimal::ZERO);
        Self {
            base_volume: base.volume,
            total_volume: base.volume.max(limit_volume),
            base_limit_volume: base.limit_volume,
            limit_volume,
            base_tx_count: base.tx_count,
            tx_count: base.tx_count,
            history: base.history.clone(),
            ..Self::default()
        }
    }

    /// Average trade size, when any transactions were counted.
    #[must_use]
    pub fn ticket_size(&self) -> Option<Decimal> {
        (self.tx_count > 0).then(|| self.total_volume / Decimal::from(self.tx_count))
    }
}

/// Today's volume less the pre-start offset, clamped and reconciled.
#[must_use]
pub fn apply_offset(today: TodayVolume, offset: OffsetState) -> TodayVolume {
    let OffsetState::Ready(offset) = offset else {
        return today;
    };
    TodayVolume {
        volume: DailyVolume::reconcile(
            (today.volume.total - offset.volume).max(Decimal::ZERO),
            (today.volume.limit - offset.limit_volume).max(Decimal::ZERO),
        ),
        tx_count: today.tx_count.saturating_sub(offset.tx_count),
    }
}
