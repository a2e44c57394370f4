//! LIVE to FINALIZED transition and the writes that follow it.
//!
//! The in-memory transition happens first and exactly once; the archive and
//! competition-store writes are queued and retried on later cycles until
//! they succeed.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::tracker::Tracker;
use crate::domain::finalized::{FinalizedArchive, FinalizedRecord};
use crate::domain::view::CompetitionView;
use crate::error::{Error, Result};
use crate::port::outbound::store::{BASE_VOLUME_KEY, FINALIZED_KEY};

impl Tracker {
    /// Snapshot `view` as the competition's final record. Returns `false`
    /// when the asset was already finalized, in which case nothing happens.
    pub(super) fn finalize(&self, view: CompetitionView, now: DateTime<Utc>) -> bool {
        let CompetitionView {
            config,
            accumulated,
            prediction,
            ..
        } = view;
        let asset_id = config.asset_id.clone();
        let target = prediction.target;
        let volume = accumulated.total_volume;

        if !self
            .state
            .finalize(FinalizedRecord::new(config, accumulated, prediction, now))
        {
            return false;
        }

        info!(asset = %asset_id, target, volume = %volume, "Competition finalized");
        true
    }

    /// Retry every queued write: finalized archive, base volumes, and
    /// competition-store status flags.
    pub async fn flush_pending(&self) {
        if self.state.take_finalized_write() {
            match self.write_finalized_archive().await {
                Ok(count) => debug!(records = count, "Finalized archive written"),
                Err(e) => {
                    warn!(error = %e, "Finalized archive write failed, will retry");
                    self.state.requeue_finalized_write();
                }
            }
        }

        if self.state.take_base_write() {
            match self
                .archive_put(BASE_VOLUME_KEY, &self.state.base_volumes())
                .await
            {
                Ok(()) => debug!("Base volumes written"),
                Err(e) => {
                    warn!(error = %e, "Base volume write failed, will retry");
                    self.state.requeue_base_write();
                }
            }
        }

        for asset_id in self.state.take_store_marks() {
            if let Err(e) = self
                .call(self.ports.competitions.mark_finalized(&asset_id))
                .await
            {
                warn!(asset = %asset_id, error = %e, "Failed to mark competition finalized, will retry");
                self.state.requeue_store_mark(asset_id);
            }
        }
    }

    /// Merge the archived records into memory, then write the union back.
    /// An archived document that no longer decodes is replaced by memory.
    async fn write_finalized_archive(&self) -> Result<usize> {
        match self.archive_get::<FinalizedArchive>(FINALIZED_KEY).await {
            Ok(archived) => {
                self.state.restore_finalized(archived.unwrap_or_default());
            }
            Err(Error::Json(e)) => {
                warn!(error = %e, "Finalized archive is unreadable, overwriting with in-memory records");
            }
            Err(e) => return Err(e),
        }
        let merged = self.state.finalized_archive();
        self.archive_put(FINALIZED_KEY, &merged).await?;
        Ok(merged.len())
    }
}
