//! Day-one start offsets for competitions that open after midnight.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::tracker::Tracker;
use crate::domain::competition::CompetitionConfig;
use crate::domain::ledger::StartOffset;
use crate::domain::market::TickerVariant;
use crate::domain::tail::day_start;
use crate::error::Result;
use crate::port::outbound::feed::{HistoryInterval, HistoryQuery};

const OFFSET_INTERVAL: HistoryInterval = HistoryInterval::OneMinute;

impl Tracker {
    /// Compute missing start offsets for competitions on their first day.
    ///
    /// An offset is fetched once per asset and day, and only after the
    /// competition has started. Failures leave it uncomputed so the next
    /// tick retries. Returns the number of offsets computed.
    pub async fn run_offsets(&self, now: DateTime<Utc>) -> usize {
        let today = now.date_naive();
        let due: Vec<CompetitionConfig> = self
            .state
            .active_competitions()
            .into_iter()
            .filter(|c| c.starts_on(today) && c.has_mid_day_start())
            .filter(|c| now >= c.start_instant())
            .filter(|c| self.state.offset(&c.asset_id, today).is_none())
            .collect();

        let mut computed = 0;
        for (index, config) in due.iter().enumerate() {
            if index > 0 {
                self.pace().await;
            }
            match self.compute_offset(config).await {
                Ok(offset) => {
                    info!(
                        asset = %config.asset_id,
                        volume = %offset.volume,
                        limit_volume = %offset.limit_volume,
                        tx_count = offset.tx_count,
                        "Start offset computed"
                    );
                    self.state.set_offset(config.asset_id.clone(), today, offset);
                    computed += 1;
                }
                Err(e) => warn!(
                    asset = %config.asset_id,
                    error = %e,
                    "Start offset unavailable, day-one volume stays unsubtracted"
                ),
            }
        }
        computed
    }

    async fn compute_offset(&self, config: &CompetitionConfig) -> Result<StartOffset> {
        let from = day_start(config.start_date);
        let start = config.start_instant();
        let query = |variant| HistoryQuery {
            asset_id: config.asset_id.clone(),
            variant,
            interval: OFFSET_INTERVAL,
            from,
            to: start,
        };

        let all = self.fetch_history(query(TickerVariant::All)).await?;
        let limit_supported = self.ports.history.supports(TickerVariant::LimitOnly);
        let limit = if limit_supported {
            self.fetch_history(query(TickerVariant::LimitOnly)).await?
        } else {
            Vec::new()
        };

        let mut offset = StartOffset::from_samples(&all, &limit, from, start, OFFSET_INTERVAL.millis());
        if !limit_supported {
            offset.limit_volume = offset.volume * self.state.limit_share(&config.asset_id);
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::id::AssetId;
    use crate::testkit::domain::{at, competition, date, minute_samples, ticker};
    use crate::testkit::ports::FakePorts;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn day_one(fakes: &FakePorts) -> Tracker {
        let mut config = competition("KOGE");
        config.start_date = date(3);
        config.start_time = NaiveTime::from_hms_opt(8, 0, 0);
        fakes.history.set(
            "KOGE",
            TickerVariant::All,
            minute_samples(at(3, 0, 0), 600, dec!(10)),
        );
        let tracker = fakes.tracker();
        tracker
            .state()
            .replace_active(BTreeMap::from([(config.asset_id.clone(), config)]));
        tracker
    }

    #[tokio::test]
    async fn sums_volume_before_start() {
        let fakes = FakePorts::new();
        let tracker = day_one(&fakes);

        assert_eq!(tracker.run_offsets(at(3, 10, 0)).await, 1);

        let offset = tracker.state().offset(&AssetId::new("KOGE"), date(3)).unwrap();
        assert_eq!(offset.volume, dec!(4800));
        assert_eq!(offset.tx_count, 480);
        assert_eq!(offset.limit_volume, dec!(0));
    }

    #[tokio::test]
    async fn offset_is_fetched_once() {
        let fakes = FakePorts::new();
        let tracker = day_one(&fakes);

        tracker.run_offsets(at(3, 10, 0)).await;
        assert_eq!(tracker.run_offsets(at(3, 10, 5)).await, 0);
        assert_eq!(fakes.history.queries().len(), 1);
    }

    #[tokio::test]
    async fn waits_for_the_start_instant() {
        let fakes = FakePorts::new();
        let tracker = day_one(&fakes);

        assert_eq!(tracker.run_offsets(at(3, 7, 59)).await, 0);
        assert!(fakes.history.queries().is_empty());
    }

    #[tokio::test]
    async fn limit_offset_uses_limit_history_when_available() {
        let fakes = FakePorts::new();
        fakes.history.set(
            "KOGE",
            TickerVariant::LimitOnly,
            minute_samples(at(3, 0, 0), 600, dec!(4)),
        );
        let tracker = day_one(&fakes);

        tracker.run_offsets(at(3, 10, 0)).await;

        let offset = tracker.state().offset(&AssetId::new("KOGE"), date(3)).unwrap();
        assert_eq!(offset.limit_volume, dec!(1920));
    }

    #[tokio::test]
    async fn limit_offset_falls_back_to_observed_share() {
        let fakes = FakePorts::new();
        let tracker = day_one(&fakes);
        tracker.ingest_tickers(
            &[ticker("KOGE", dec!(1), dec!(1000))],
            Some(&[ticker("KOGE", dec!(1), dec!(250))]),
            at(3, 10, 0),
        );

        tracker.run_offsets(at(3, 10, 0)).await;

        let offset = tracker.state().offset(&AssetId::new("KOGE"), date(3)).unwrap();
        assert_eq!(offset.limit_volume, dec!(1200));
    }

    #[tokio::test]
    async fn failure_leaves_offset_pending() {
        let fakes = FakePorts::new();
        let tracker = day_one(&fakes);
        fakes.history.fail(true);

        assert_eq!(tracker.run_offsets(at(3, 10, 0)).await, 0);
        assert!(tracker.state().offset(&AssetId::new("KOGE"), date(3)).is_none());

        fakes.history.fail(false);
        assert_eq!(tracker.run_offsets(at(3, 10, 1)).await, 1);
    }
}
