//! UTC day rollover: rebuild yesterday's tails and fold yesterday into the
//! archived base of every running competition.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use super::tracker::Tracker;
use crate::domain::competition::CompetitionConfig;
use crate::domain::id::AssetId;
use crate::domain::ledger::BaseVolume;
use crate::domain::market::TickerVariant;
use crate::domain::normalize::{DailyVolume, TodayVolume};
use crate::domain::tail::{day_start, minute_of_day, AssetTails, MinuteTailTable};
use crate::error::Result;
use crate::port::outbound::feed::{HistoryInterval, HistoryQuery};

/// What one rollover check did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RolloverSummary {
    pub built: usize,
    pub failed: usize,
    pub rolled: usize,
}

impl Tracker {
    /// Build tails for every competing asset that lacks them for yesterday,
    /// then roll base volumes forward.
    ///
    /// Safe to call repeatedly: assets with current tails are skipped and a
    /// day is folded into a base at most once.
    pub async fn run_rollover(&self, now: DateTime<Utc>) -> RolloverSummary {
        let today = now.date_naive();
        let Some(yesterday) = today.pred_opt() else {
            return RolloverSummary::default();
        };
        self.state.prune_offsets(today);

        let missing: BTreeSet<AssetId> = self
            .state
            .active_competitions()
            .into_iter()
            .map(|c| c.asset_id)
            .filter(|asset_id| !self.state.has_tails_for(asset_id, today))
            .collect();

        let mut summary = RolloverSummary::default();
        for (index, asset_id) in missing.iter().enumerate() {
            if index > 0 {
                self.pace().await;
            }
            match self.build_tails(asset_id, yesterday).await {
                Ok(tails) => {
                    info!(
                        asset = %asset_id,
                        day = %yesterday,
                        volume = %tails.all.total_volume(),
                        limit_volume = %tails.limit.total_volume(),
                        "Tails rebuilt"
                    );
                    self.state.set_tails(asset_id.clone(), tails);
                    summary.built += 1;
                }
                Err(e) => {
                    warn!(asset = %asset_id, day = %yesterday, error = %e, "Tail rebuild failed, will retry");
                    summary.failed += 1;
                }
            }
        }

        if self.settings.roll_base_volume {
            summary.rolled = self.roll_base_volumes(yesterday, today);
            if summary.rolled > 0 {
                self.flush_pending().await;
            }
        }

        if summary != RolloverSummary::default() {
            info!(
                built = summary.built,
                failed = summary.failed,
                rolled = summary.rolled,
                "Rollover check complete"
            );
        }
        summary
    }

    async fn build_tails(&self, asset_id: &AssetId, day: NaiveDate) -> Result<AssetTails> {
        let from = day_start(day);
        let query = |variant| HistoryQuery {
            asset_id: asset_id.clone(),
            variant,
            interval: HistoryInterval::OneMinute,
            from,
            to: from + Duration::days(1),
        };

        let all = MinuteTailTable::build(day, &self.fetch_history(query(TickerVariant::All)).await?);
        let limit = if self.ports.history.supports(TickerVariant::LimitOnly) {
            MinuteTailTable::build(
                day,
                &self.fetch_history(query(TickerVariant::LimitOnly)).await?,
            )
        } else {
            all.scaled(self.state.limit_share(asset_id))
        };
        Ok(AssetTails { all, limit })
    }

    /// Fold `day` into the base of every active competition that ran on it.
    fn roll_base_volumes(&self, day: NaiveDate, today: NaiveDate) -> usize {
        let due: Vec<(CompetitionConfig, Arc<AssetTails>)> = self
            .state
            .active_competitions()
            .into_iter()
            .filter(|c| c.covers(day))
            .filter_map(|c| {
                let tails = self.state.tails(&c.asset_id)?;
                tails.effective_for(today)?;
                Some((c, tails))
            })
            .collect();
        if due.is_empty() {
            return 0;
        }

        let mut rolled = 0;
        self.state.update_base_volumes(|bases| {
            for (config, tails) in &due {
                let base = bases.entry(config.asset_id.clone()).or_default();
                if !base.belongs_to(config.start_date) {
                    *base = BaseVolume::default();
                }
                if let Some(through) = base.through {
                    if through < day && through.succ_opt() != Some(day) {
                        warn!(asset = %config.asset_id, through = %through, day = %day, "Base volume is missing days");
                    }
                }
                if base.roll_day(day, day_volume(config, tails, day)) {
                    info!(asset = %config.asset_id, day = %day, base = %base.volume, "Base volume rolled forward");
                    rolled += 1;
                }
            }
            rolled > 0
        });
        rolled
    }
}

/// Competition volume on `day`, read from that day's tails. On the first
/// day only volume from the start minute onwards counts.
fn day_volume(config: &CompetitionConfig, tails: &AssetTails, day: NaiveDate) -> TodayVolume {
    let from_minute = if config.starts_on(day) {
        minute_of_day(config.start_instant())
    } else {
        0
    };
    TodayVolume {
        volume: DailyVolume::reconcile(
            tails.all.volume_at(from_minute),
            tails.limit.volume_at(from_minute),
        ),
        tx_count: tails.all.trades_at(from_minute),
    }
}
