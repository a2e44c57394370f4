//! Dashboard read model.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::tracker::Tracker;
use crate::domain::view::DashboardSnapshot;

impl Tracker {
    #[must_use]
    pub fn dashboard_snapshot(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        DashboardSnapshot {
            generated_at: now,
            markets: self.state.markets(),
            competitions: self.state.views(),
            finalized: self.state.finalized_records(),
        }
    }

    /// Hand the current snapshot to the dashboard sink, if one is configured.
    pub async fn publish_dashboard(&self, now: DateTime<Utc>) {
        let Some(sink) = self.ports.dashboard.clone() else {
            return;
        };
        let snapshot = self.dashboard_snapshot(now);
        if let Err(e) = self.call(sink.publish(&snapshot)).await {
            warn!(error = %e, "Dashboard publish failed");
        }
    }
}
