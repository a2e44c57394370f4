//! Competition configs kept in a single JSON array file.
//!
//! The file is maintained by operators; the tracker only rewrites it to flip
//! a competition's status to finalized.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};

use super::atomic::{blocking, read_json, write_json};
use crate::domain::competition::{CompetitionConfig, CompetitionStatus};
use crate::domain::id::AssetId;
use crate::error::Result;
use crate::port::outbound::store::CompetitionStore;

pub struct JsonCompetitionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    write_lock: Arc<Mutex<()>>,
}

impl JsonCompetitionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl CompetitionStore for JsonCompetitionStore {
    async fn load(&self) -> Result<Vec<CompetitionConfig>> {
        let path = self.path.clone();
        let configs: Option<Vec<CompetitionConfig>> = blocking(move || read_json(&path)).await?;
        if configs.is_none() {
            warn!(path = %self.path.display(), "Competition file not found");
        }
        Ok(configs.unwrap_or_default())
    }

    async fn mark_finalized(&self, asset_id: &AssetId) -> Result<()> {
        let path = self.path.clone();
        let lock = Arc::clone(&self.write_lock);
        let asset = asset_id.clone();

        let changed = blocking(move || {
            let _guard = lock.lock();
            let mut configs: Vec<CompetitionConfig> = read_json(&path)?.unwrap_or_default();
            let mut changed = false;
            for config in configs.iter_mut().filter(|c| c.asset_id == asset) {
                if !config.status.is_finalized() {
                    config.status = CompetitionStatus::Finalized;
                    changed = true;
                }
            }
            if changed {
                write_json(&path, &configs)?;
            }
            Ok(changed)
        })
        .await?;

        if changed {
            info!(asset = %asset_id, "Competition marked finalized in store");
        }
        Ok(())
    }
}
