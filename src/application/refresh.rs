//! Slow loops: competition configuration and archived base volumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::state::BaseVolumes;
use super::tracker::Tracker;
use crate::domain::competition::CompetitionConfig;
use crate::domain::finalized::FinalizedArchive;
use crate::domain::id::AssetId;
use crate::port::outbound::store::{BASE_VOLUME_KEY, FINALIZED_KEY};

impl Tracker {
    /// Reload the competition store and replace the active set.
    ///
    /// Finalized and already archived competitions are left out. Past-end
    /// competitions stay until they are settled. When an asset is listed more than once the earliest start wins.
    /// Returns the new active count, or `None` when the store was unreachable
    /// and the previous set stays in place.
    pub async fn run_competition_refresh(&self, now: DateTime<Utc>) -> Option<usize> {
        let configs = match self.call(self.ports.competitions.load()).await {
            Ok(configs) => configs,
            Err(e) => {
                warn!(error = %e, "Competition refresh failed, keeping previous set");
                return None;
            }
        };
        let listed = configs.len();

        let active = select_active(configs, |asset_id| self.state.is_finalized(asset_id));
        let count = active.len();
        let ended = active.values().filter(|c| c.end_instant() <= now).count();
        self.state.replace_active(active);
        self.flush_pending().await;

        info!(listed, active = count, ended, "Competitions refreshed");
        Some(count)
    }

    /// Re-read archived base volumes. Local changes are written first so the
    /// reload never discards an unwritten roll-forward.
    pub async fn run_base_refresh(&self) -> bool {
        self.flush_pending().await;
        match self.archive_get::<BaseVolumes>(BASE_VOLUME_KEY).await {
            Ok(archived) => {
                let archived = archived.unwrap_or_default();
                let assets = archived.len();
                let applied = self.state.load_base_volumes(archived);
                debug!(assets, applied, "Base volumes refreshed");
                applied
            }
            Err(e) => {
                warn!(error = %e, "Base volume refresh failed, keeping in-memory copy");
                false
            }
        }
    }

    /// Load everything persisted by a previous run.
    pub async fn restore(&self) {
        match self.archive_get::<FinalizedArchive>(FINALIZED_KEY).await {
            Ok(archived) => {
                let restored = self.state.restore_finalized(archived.unwrap_or_default());
                info!(restored, "Finalized competitions restored");
            }
            Err(e) => warn!(error = %e, "Could not read finalized archive"),
        }
        self.run_base_refresh().await;
    }
}

fn select_active<F>(configs: Vec<CompetitionConfig>, is_finalized: F) -> BTreeMap<AssetId, CompetitionConfig>
where
    F: Fn(&AssetId) -> bool,
{
    let mut active: BTreeMap<AssetId, CompetitionConfig> = BTreeMap::new();
    for config in configs {
        if config.status.is_finalized() || is_finalized(&config.asset_id) {
            continue;
        }
        match active.get(&config.asset_id) {
            Some(existing) if existing.start_instant() <= config.start_instant() => {
                warn!(asset = %config.asset_id, "Duplicate competition ignored");
            }
            _ => {
                active.insert(config.asset_id.clone(), config);
            }
        }
    }
    active
}
