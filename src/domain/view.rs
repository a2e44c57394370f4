//! Read models handed to consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::competition::CompetitionConfig;
use super::finalized::FinalizedRecord;
use super::ledger::AccumulatedVolume;
use super::market::MarketDataEntry;
use super::projection::PredictionResult;
use super::velocity::Velocity;

/// Live state of one active competition, rebuilt every realtime cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionView {
    pub config: CompetitionConfig,
    pub accumulated: AccumulatedVolume,
    pub velocity: Velocity,
    pub prediction: PredictionResult,
}

/// Everything a dashboard needs in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub markets: Vec<MarketDataEntry>,
    pub competitions: Vec<CompetitionView>,
    pub finalized: Vec<FinalizedRecord>,
}
