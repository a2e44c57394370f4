//! Realtime market ingest: ticker rows to normalized per-asset entries.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::tracker::Tracker;
use crate::domain::id::AssetId;
use crate::domain::market::{AssetRollingSnapshot, MarketDataEntry, Ticker};
use crate::domain::normalize::TodayVolume;
use crate::domain::tail::minute_of_day;

impl Tracker {
    /// Replace the market entry of every asset in `all`.
    ///
    /// `limit` is `None` when the limit-order poll failed or is not
    /// configured; each asset then keeps its previous limit snapshot.
    /// Returns the number of entries written.
    pub fn ingest_tickers(
        &self,
        all: &[Ticker],
        limit: Option<&[Ticker]>,
        now: DateTime<Utc>,
    ) -> usize {
        let today = now.date_naive();
        let minute = minute_of_day(now);
        let limit_by_asset: Option<HashMap<&AssetId, &Ticker>> =
            limit.map(|rows| rows.iter().map(|t| (&t.asset_id, t)).collect());

        let mut seen = HashSet::new();
        for ticker in all {
            if !seen.insert(&ticker.asset_id) {
                continue;
            }
            let previous = self.state.market(&ticker.asset_id);
            let limit_snapshot = match &limit_by_asset {
                Some(rows) => rows
                    .get(&ticker.asset_id)
                    .map(|row| AssetRollingSnapshot::from_ticker(row, now)),
                None => previous.as_ref().and_then(|p| p.limit),
            };

            let mut entry = MarketDataEntry::observe(
                ticker.asset_id.clone(),
                AssetRollingSnapshot::from_ticker(ticker, now),
                limit_snapshot,
                previous.as_ref(),
                now,
            );

            let tails = self.state.tails(&ticker.asset_id);
            entry.apply_daily(TodayVolume::from_rolling(
                entry.rolling_counters(),
                tails.as_deref().and_then(|t| t.effective_for(today)),
                minute,
            ));
            self.state.replace_market(entry);
        }
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::PriceTrend;
    use crate::domain::tail::{AssetTails, MinuteTailTable, VolumeSample};
    use crate::testkit::domain::ticker;
    use crate::testkit::ports::FakePorts;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn subtracts_yesterdays_tail() {
        let fakes = FakePorts::new();
        let tracker = fakes.tracker();
        let yesterday = now().date_naive().pred_opt().unwrap();
        let minute_ts = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap().timestamp_millis();
        tracker.state().set_tails(
            AssetId::new("KOGE"),
            AssetTails {
                all: MinuteTailTable::build(yesterday, &[VolumeSample::new(minute_ts, dec!(300000), 0)]),
                limit: MinuteTailTable::empty(),
            },
        );

        tracker.ingest_tickers(&[ticker("KOGE", dec!(1), dec!(1000000))], None, now());

        let entry = tracker.state().market(&AssetId::new("KOGE")).unwrap();
        assert_eq!(entry.daily_volume, dec!(700000));
    }

    #[test]
    fn failed_limit_poll_keeps_previous_limit_snapshot() {
        let fakes = FakePorts::new();
        let tracker = fakes.tracker();
        let all = [ticker("KOGE", dec!(1), dec!(1000))];

        tracker.ingest_tickers(&all, Some(&[ticker("KOGE", dec!(1), dec!(400))]), now());
        tracker.ingest_tickers(&all, None, now());

        let entry = tracker.state().market(&AssetId::new("KOGE")).unwrap();
        assert_eq!(entry.rolling_limit_volume(), dec!(400));
        assert_eq!(entry.daily_limit_volume, dec!(400));
    }

    #[test]
    fn trend_uses_previous_poll() {
        let fakes = FakePorts::new();
        let tracker = fakes.tracker();

        tracker.ingest_tickers(&[ticker("KOGE", dec!(100), dec!(1))], None, now());
        tracker.ingest_tickers(&[ticker("KOGE", dec!(101), dec!(1))], None, now());

        let entry = tracker.state().market(&AssetId::new("KOGE")).unwrap();
        assert_eq!(entry.trend, PriceTrend::Pumping);
        assert_eq!(entry.price_change, dec!(0.01));
    }

    #[test]
    fn duplicate_rows_count_once() {
        let fakes = FakePorts::new();
        let tracker = fakes.tracker();
        let rows = [
            ticker("koge", dec!(1), dec!(1)),
            ticker("KOGE ", dec!(2), dec!(2)),
        ];
        assert_eq!(tracker.ingest_tickers(&rows, None, now()), 1);
        assert_eq!(tracker.state().markets().len(), 1);
    }
}
