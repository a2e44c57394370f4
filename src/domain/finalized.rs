//! Immutable final answer for a closed tournament.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::competition::CompetitionConfig;
use super::id::AssetId;
use super::ledger::AccumulatedVolume;
use super::projection::PredictionResult;

/// Snapshot taken at the freeze instant. Never recomputed once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedRecord {
    pub config: CompetitionConfig,
    pub accumulated: AccumulatedVolume,
    pub prediction: PredictionResult,
    pub finalized_at: DateTime<Utc>,
}

impl FinalizedRecord {
    #[must_use]
    pub fn new(
        config: CompetitionConfig,
        accumulated: AccumulatedVolume,
        prediction: PredictionResult,
        finalized_at: DateTime<Utc>,
    ) -> Self {
        Self {
            config,
            accumulated,
            prediction: prediction.into_finalized(),
            finalized_at,
        }
    }

    #[must_use]
    pub fn asset_id(&self) -> &AssetId {
        &self.config.asset_id
    }
}

/// Archived form of all finalized tournaments, keyed by asset.
pub type FinalizedArchive = BTreeMap<AssetId, FinalizedRecord>;
