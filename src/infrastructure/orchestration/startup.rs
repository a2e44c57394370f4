//! Startup sequence run once before the periodic loops.

use chrono::Utc;
use tracing::info;

use crate::application::tracker::Tracker;

/// Restore persisted state and bring every derived figure up to date, in
/// dependency order: archive, competitions, market data, tails, offsets.
///
/// Each step logs and tolerates its own failures; the loops retry later.
pub(crate) async fn warm_up(tracker: &Tracker) {
    tracker.restore().await;

    let active = tracker.run_competition_refresh(Utc::now()).await.unwrap_or(0);
    tracker.run_realtime(Utc::now()).await;
    let rollover = tracker.run_rollover(Utc::now()).await;
    let offsets = tracker.run_offsets(Utc::now()).await;

    // Recompute with the fresh tails and offsets instead of waiting a tick.
    tracker.run_realtime(Utc::now()).await;

    info!(
        active,
        finalized = tracker.state().finalized_records().len(),
        tails_built = rollover.built,
        offsets,
        "Startup complete"
    );
}
