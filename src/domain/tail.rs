//! Minute-of-day suffix sums of the previous calendar day's volume.
//!
//! The exchange's rolling 24h counter at minute `m` of today still contains
//! every trade from yesterday at minute `>= m`. [`MinuteTailTable`] stores
//! exactly that quantity for each of the 1440 minutes so the rolling counter
//! can be turned into a calendar-day figure with one subtraction.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of minute slots in a UTC day.
pub const MINUTES_PER_DAY: usize = 1440;

/// Volume traded during one interval starting at `timestamp_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSample {
    pub timestamp_ms: i64,
    pub volume: Decimal,
    pub trades: u64,
}

impl VolumeSample {
    #[must_use]
    pub const fn new(timestamp_ms: i64, volume: Decimal, trades: u64) -> Self {
        Self {
            timestamp_ms,
            volume,
            trades,
        }
    }
}

/// UTC minute-of-day (0..1440) for an instant.
#[must_use]
pub fn minute_of_day(at: DateTime<Utc>) -> usize {
    (at.hour() * 60 + at.minute()) as usize
}

/// UTC midnight at the start of `day`.
#[must_use]
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::default()))
}

fn minute_on_day(timestamp_ms: i64, day: NaiveDate) -> Option<usize> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .filter(|at| at.date_naive() == day)
        .map(minute_of_day)
}

/// Suffix sums of yesterday's per-minute volume and trade counts.
///
/// Invariant: both series are non-increasing in the minute index. Immutable
/// once built; a new table replaces the old one on rollover.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteTailTable {
    day: Option<NaiveDate>,
    volume: Vec<Decimal>,
    trades: Vec<u64>,
}

impl MinuteTailTable {
    /// An all-zero table. Subtracting it is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            day: None,
            volume: vec![Decimal::ZERO; MINUTES_PER_DAY],
            trades: vec![0; MINUTES_PER_DAY],
        }
    }

    /// Build the table for `day` from per-minute samples.
    ///
    /// Samples may be sparse or unordered. Each is placed in its UTC
    /// minute-of-day slot; a later sample for the same slot replaces an
    /// earlier one. Negative volumes are treated as zero and samples from
    /// other days are ignored.
    #[must_use]
    pub fn build(day: NaiveDate, samples: &[VolumeSample]) -> Self {
        let mut volume = vec![Decimal::ZERO; MINUTES_PER_DAY];
        let mut trades = vec![0_u64; MINUTES_PER_DAY];

        for sample in samples {
            let Some(minute) = minute_on_day(sample.timestamp_ms, day) else {
                continue;
            };
            volume[minute] = sample.volume.max(Decimal::ZERO);
            trades[minute] = sample.trades;
        }

        let mut running_volume = Decimal::ZERO;
        let mut running_trades = 0_u64;
        for minute in (0..MINUTES_PER_DAY).rev() {
            running_volume += volume[minute];
            running_trades = running_trades.saturating_add(trades[minute]);
            volume[minute] = running_volume;
            trades[minute] = running_trades;
        }

        Self {
            day: Some(day),
            volume,
            trades,
        }
    }

    /// Derive a table by scaling every volume slot by `ratio` (clamped to
    /// `[0, 1]`). Trade counts are scaled the same way and rounded down.
    #[must_use]
    pub fn scaled(&self, ratio: Decimal) -> Self {
        let ratio = ratio.clamp(Decimal::ZERO, Decimal::ONE);
        Self {
            day: self.day,
            volume: self.volume.iter().map(|v| *v * ratio).collect(),
            trades: self
                .trades
                .iter()
                .map(|t| {
                    (Decimal::from(*t) * ratio)
                        .floor()
                        .to_u64()
                        .unwrap_or_default()
                })
                .collect(),
        }
    }

    /// The calendar day this table describes, if built from data.
    #[must_use]
    pub const fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    /// True when this table describes the day before `today`.
    #[must_use]
    pub fn is_for_day_before(&self, today: NaiveDate) -> bool {
        self.day.is_some() && self.day == today.pred_opt()
    }

    /// Yesterday's volume at or after `minute`.
    #[must_use]
    pub fn volume_at(&self, minute: usize) -> Decimal {
        self.volume
            .get(minute)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Yesterday's trade count at or after `minute`.
    #[must_use]
    pub fn trades_at(&self, minute: usize) -> u64 {
        self.trades.get(minute).copied().unwrap_or_default()
    }

    /// Whole-day volume (`tail[0]`).
    #[must_use]
    pub fn total_volume(&self) -> Decimal {
        self.volume_at(0)
    }

    /// Whole-day trade count.
    #[must_use]
    pub fn total_trades(&self) -> u64 {
        self.trades_at(0)
    }
}

impl Default for MinuteTailTable {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tail tables for both ticker variants of one asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetTails {
    pub all: MinuteTailTable,
    pub limit: MinuteTailTable,
}

impl AssetTails {
    /// Tails only apply on the day after the one they were built for; any
    /// other table is treated as absent.
    #[must_use]
    pub fn effective_for(&self, today: NaiveDate) -> Option<&Self> {
        self.all.is_for_day_before(today).then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn at_minute(minute: u32) -> i64 {
        Utc.with_ymd_and_hms(2025, 6, 1, minute / 60, minute % 60, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn empty_input_yields_zero_table() {
        let table = MinuteTailTable::build(day(), &[]);
        assert!((0..MINUTES_PER_DAY).all(|m| table.volume_at(m) == Decimal::ZERO));
        assert_eq!(table.day(), Some(day()));
    }

    #[test]
    fn suffix_sum_bounds() {
        let samples = [
            VolumeSample::new(at_minute(1439), dec!(7), 1),
            VolumeSample::new(at_minute(0), dec!(10), 2),
            VolumeSample::new(at_minute(600), dec!(3), 3),
        ];
        let table = MinuteTailTable::build(day(), &samples);

        assert_eq!(table.volume_at(0), dec!(20));
        assert_eq!(table.volume_at(1), dec!(10));
        assert_eq!(table.volume_at(600), dec!(10));
        assert_eq!(table.volume_at(601), dec!(7));
        assert_eq!(table.volume_at(1439), dec!(7));
        assert_eq!(table.total_trades(), 6);
        assert_eq!(table.trades_at(1439), 1);
    }

    #[test]
    fn table_is_non_increasing() {
        let samples: Vec<_> = (0..MINUTES_PER_DAY as u32)
            .step_by(7)
            .map(|m| VolumeSample::new(at_minute(m), Decimal::from(m % 13), 1))
            .collect();
        let table = MinuteTailTable::build(day(), &samples);

        for m in 1..MINUTES_PER_DAY {
            assert!(table.volume_at(m) <= table.volume_at(m - 1));
            assert!(table.trades_at(m) <= table.trades_at(m - 1));
        }
    }

    #[test]
    fn duplicate_minute_last_write_wins() {
        let samples = [
            VolumeSample::new(at_minute(5), dec!(100), 1),
            VolumeSample::new(at_minute(5) + 30_000, dec!(40), 1),
        ];
        let table = MinuteTailTable::build(day(), &samples);
        assert_eq!(table.total_volume(), dec!(40));
    }

    #[test]
    fn out_of_range_index_reads_zero() {
        let table = MinuteTailTable::build(day(), &[VolumeSample::new(at_minute(0), dec!(5), 1)]);
        assert_eq!(table.volume_at(MINUTES_PER_DAY), Decimal::ZERO);
    }

    #[test]
    fn scaled_table_clamps_ratio() {
        let table = MinuteTailTable::build(day(), &[VolumeSample::new(at_minute(0), dec!(10), 9)]);
        assert_eq!(table.scaled(dec!(0.5)).total_volume(), dec!(5.0));
        assert_eq!(table.scaled(dec!(0.5)).total_trades(), 4);
        assert_eq!(table.scaled(dec!(3)).total_volume(), dec!(10));
        assert_eq!(table.scaled(dec!(-1)).total_volume(), Decimal::ZERO);
    }

    #[test]
    fn tails_only_apply_to_following_day() {
        let tails = AssetTails {
            all: MinuteTailTable::build(day(), &[]),
            limit: MinuteTailTable::empty(),
        };
        let next = day().succ_opt().unwrap();
        assert!(tails.effective_for(next).is_some());
        assert!(tails.effective_for(day()).is_none());
        assert!(tails.effective_for(next.succ_opt().unwrap()).is_none());
        assert!(AssetTails::default().effective_for(next).is_none());
    }

    #[test]
    fn samples_from_other_days_are_ignored() {
        let next_day = at_minute(10) + 86_400_000;
        let table = MinuteTailTable::build(
            day(),
            &[
                VolumeSample::new(at_minute(10), dec!(5), 1),
                VolumeSample::new(next_day, dec!(500), 50),
            ],
        );
        assert_eq!(table.total_volume(), dec!(5));
    }
}
