//! The tracking service: ports, settings, and shared state in one place.
//!
//! Each scheduled loop calls one `run_*` method per tick. Those methods never
//! return errors; a failed step is logged and the previous in-memory state
//! stays in place until the next tick.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::state::AppState;
use crate::domain::projection::ProjectionParams;
use crate::domain::tail::VolumeSample;
use crate::error::{Error, Result};
use crate::port::outbound::dashboard::DashboardSink;
use crate::port::outbound::feed::{HistoryFeed, HistoryQuery, TickerFeed};
use crate::port::outbound::store::{ArchiveStore, CompetitionStore};

/// Outbound collaborators.
#[derive(Clone)]
pub struct Ports {
    pub tickers: Arc<dyn TickerFeed>,
    pub history: Arc<dyn HistoryFeed>,
    pub competitions: Arc<dyn CompetitionStore>,
    pub archive: Arc<dyn ArchiveStore>,
    pub dashboard: Option<Arc<dyn DashboardSink>>,
}

/// Runtime tunables, resolved from configuration.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub projection: ProjectionParams,
    pub velocity_window: chrono::Duration,
    pub roll_base_volume: bool,
    pub call_timeout: Duration,
    pub batch_delay: Duration,
    pub batch_jitter: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            projection: ProjectionParams::default(),
            velocity_window: chrono::Duration::seconds(60),
            roll_base_volume: true,
            call_timeout: Duration::from_secs(10),
            batch_delay: Duration::from_millis(250),
            batch_jitter: Duration::from_millis(100),
        }
    }
}

pub struct Tracker {
    pub(super) state: Arc<AppState>,
    pub(super) ports: Ports,
    pub(super) settings: TrackerSettings,
}

impl Tracker {
    #[must_use]
    pub fn new(ports: Ports, settings: TrackerSettings) -> Self {
        Self::with_state(Arc::new(AppState::new()), ports, settings)
    }

    #[must_use]
    pub fn with_state(state: Arc<AppState>, ports: Ports, settings: TrackerSettings) -> Self {
        Self {
            state,
            ports,
            settings,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Await `fut`, failing with [`Error::Timeout`] once the call budget runs out.
    pub(super) async fn call<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let budget = self.settings.call_timeout;
        tokio::time::timeout(budget, fut)
            .await
            .map_err(|_| Error::Timeout(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)))?
    }

    /// Read and decode an archived document.
    pub(super) async fn archive_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value = self.call(self.ports.archive.get(key)).await?;
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(Error::from)
    }

    /// Encode and replace an archived document.
    pub(super) async fn archive_put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.call(self.ports.archive.put(key, &value)).await
    }

    pub(super) async fn fetch_history(&self, query: HistoryQuery) -> Result<Vec<VolumeSample>> {
        self.call(self.ports.history.fetch_history(&query)).await
    }

    /// Pause between items of a batch of upstream calls.
    pub(super) async fn pace(&self) {
        let pause = self.settings.batch_delay + jitter(self.settings.batch_jitter);
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

fn jitter(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
