//! The realtime cycle: poll, normalize, accumulate, project, finalize.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use super::tracker::Tracker;
use crate::domain::competition::CompetitionConfig;
use crate::domain::ledger::{AccumulatedVolume, OffsetState};
use crate::domain::market::TickerVariant;
use crate::domain::normalize::TodayVolume;
use crate::domain::projection::project;
use crate::domain::velocity::Velocity;
use crate::domain::view::CompetitionView;
use crate::error::{Error, FeedError};

/// Outcome of one tracking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingSummary {
    pub tracked: usize,
    pub finalized: usize,
    /// Competitions skipped because their asset had no market data.
    pub missing_market: usize,
    /// Past-end competitions waiting for the rollover to fold their last day.
    pub awaiting_base: usize,
}

impl Tracker {
    /// One realtime tick.
    pub async fn run_realtime(&self, now: DateTime<Utc>) {
        let (all, limit) = tokio::join!(
            self.call(self.ports.tickers.fetch_tickers(TickerVariant::All)),
            self.call(self.ports.tickers.fetch_tickers(TickerVariant::LimitOnly)),
        );

        let all = match all {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Ticker poll failed, settling frozen competitions from cached data");
                let summary = self.track_frozen(now);
                self.flush_pending().await;
                if summary.finalized > 0 {
                    self.publish_dashboard(now).await;
                }
                return;
            }
        };
        let limit = match limit {
            Ok(rows) => Some(rows),
            Err(Error::Feed(FeedError::Unsupported(_))) => None,
            Err(e) => {
                warn!(error = %e, "Limit ticker poll failed, keeping previous limit data");
                None
            }
        };

        let assets = self.ingest_tickers(&all, limit.as_deref(), now);
        let summary = self.track_competitions(now);
        self.flush_pending().await;
        self.publish_dashboard(now).await;

        debug!(
            assets,
            tracked = summary.tracked,
            finalized = summary.finalized,
            missing_market = summary.missing_market,
            awaiting_base = summary.awaiting_base,
            "Realtime cycle complete"
        );
    }

    /// Recompute every active competition from the current market data and
    /// finalize those past their freeze instant.
    pub fn track_competitions(&self, now: DateTime<Utc>) -> TrackingSummary {
        self.track(self.state.active_competitions(), now)
    }

    /// Finalize competitions at or past their freeze instant from whatever
    /// market data is cached. Live competitions are left alone.
    pub fn track_frozen(&self, now: DateTime<Utc>) -> TrackingSummary {
        let lead = self.settings.projection.freeze_lead;
        let frozen = self
            .state
            .active_competitions()
            .into_iter()
            .filter(|config| now >= config.freeze_instant(lead))
            .collect();
        self.track(frozen, now)
    }

    fn track(&self, competitions: Vec<CompetitionConfig>, now: DateTime<Utc>) -> TrackingSummary {
        let mut summary = TrackingSummary::default();

        for config in competitions {
            let view = if now.date_naive() > config.end_date {
                let Some(view) = self.settled_view(&config, now) else {
                    summary.awaiting_base += 1;
                    continue;
                };
                view
            } else {
                let Some(view) = self.compute_view(&config, now) else {
                    summary.missing_market += 1;
                    debug!(asset = %config.asset_id, "No market data for competition asset");
                    continue;
                };
                view
            };
            summary.tracked += 1;

            if view.prediction.is_finalized {
                if self.finalize(view, now) {
                    summary.finalized += 1;
                }
            } else {
                self.state.set_view(view);
            }
        }

        summary
    }

    /// Totals of a competition whose last day has passed, from its base alone.
    ///
    /// Today's market data belongs to a later day and is ignored. `None`
    /// while the rollover can still fold the last day into the base.
    fn settled_view(&self, config: &CompetitionConfig, now: DateTime<Utc>) -> Option<CompetitionView> {
        let base = self
            .state
            .base_volume(&config.asset_id)
            .filter(|base| base.belongs_to(config.start_date));
        let complete = base
            .as_ref()
            .and_then(|base| base.through)
            .is_some_and(|through| through >= config.end_date);

        if !complete && self.settings.roll_base_volume {
            if config.end_date.succ_opt() == Some(now.date_naive()) {
                return None;
            }
            warn!(
                asset = %config.asset_id,
                end = %config.end_date,
                "Base volume misses the last day, settling with what is archived"
            );
        }

        let accumulated = AccumulatedVolume::from_base(base.as_ref());
        let velocity = Velocity::default();
        let prediction = project(config, &accumulated, velocity, now, self.settings.projection);
        Some(CompetitionView {
            config: config.clone(),
            accumulated,
            velocity,
            prediction,
        })
    }

    /// Accumulate and project one competition. `None` without market data.
    fn compute_view(&self, config: &CompetitionConfig, now: DateTime<Utc>) -> Option<CompetitionView> {
        let market = self.state.market(&config.asset_id)?;
        let today = now.date_naive();

        let (today_volume, offset) = if now < config.start_instant() {
            (TodayVolume::default(), OffsetState::NotApplicable)
        } else {
            (market.today_volume(), self.offset_state(config, today))
        };

        let base = if today > config.start_date {
            self.state
                .base_volume(&config.asset_id)
                .filter(|base| base.belongs_to(config.start_date))
        } else {
            None
        };

        let accumulated = AccumulatedVolume::merge(base.as_ref(), today_volume, offset, today);
        let velocity = self.state.record_velocity(
            &config.asset_id,
            now,
            accumulated.today_volume,
            accumulated.today_tx_count,
            self.settings.velocity_window,
        );
        let prediction = project(config, &accumulated, velocity, now, self.settings.projection);

        Some(CompetitionView {
            config: config.clone(),
            accumulated,
            velocity,
            prediction,
        })
    }

    fn offset_state(&self, config: &CompetitionConfig, today: NaiveDate) -> OffsetState {
        if !config.starts_on(today) || !config.has_mid_day_start() {
            return OffsetState::NotApplicable;
        }
        self.state
            .offset(&config.asset_id, today)
            .map_or(OffsetState::Pending, OffsetState::Ready)
    }
}
