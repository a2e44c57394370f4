//! In-memory fakes for the outbound ports.
//!
//! Each fake records what it was asked to do and can be switched into a
//! failing mode, which is how tests exercise the retry and keep-previous
//! paths of the tracker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::application::tracker::{Ports, Tracker};
use crate::domain::competition::{CompetitionConfig, CompetitionStatus};
use crate::domain::id::AssetId;
use crate::domain::market::{Ticker, TickerVariant};
use crate::domain::tail::VolumeSample;
use crate::domain::view::DashboardSnapshot;
use crate::error::{Error, FeedError, Result};
use crate::port::outbound::dashboard::DashboardSink;
use crate::port::outbound::feed::{HistoryFeed, HistoryQuery, TickerFeed};
use crate::port::outbound::store::{ArchiveStore, CompetitionStore};

fn unavailable(what: &str) -> Error {
    Error::Store(format!("{what} unavailable"))
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

/// Ticker feed serving whatever rows were last set. The limit-only variant
/// is unsupported until rows are set for it.
#[derive(Default)]
pub struct FakeTickerFeed {
    rows: Mutex<HashMap<TickerVariant, Vec<Ticker>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FakeTickerFeed {
    pub fn set(&self, variant: TickerVariant, rows: Vec<Ticker>) {
        self.rows.lock().insert(variant, rows);
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TickerFeed for FakeTickerFeed {
    async fn fetch_tickers(&self, variant: TickerVariant) -> Result<Vec<Ticker>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::Rejected("scripted failure".into()).into());
        }
        match (self.rows.lock().get(&variant), variant) {
            (Some(rows), _) => Ok(rows.clone()),
            (None, TickerVariant::LimitOnly) => Err(FeedError::Unsupported("limit_ticker_url").into()),
            (None, TickerVariant::All) => Ok(Vec::new()),
        }
    }
}

/// History feed backed by per-asset sample lists, filtered to the queried
/// window.
#[derive(Default)]
pub struct FakeHistoryFeed {
    samples: Mutex<HashMap<(AssetId, TickerVariant), Vec<VolumeSample>>>,
    limit_supported: AtomicBool,
    failing: AtomicBool,
    queries: Mutex<Vec<HistoryQuery>>,
}

impl FakeHistoryFeed {
    pub fn set(&self, asset: &str, variant: TickerVariant, samples: Vec<VolumeSample>) {
        if variant == TickerVariant::LimitOnly {
            self.limit_supported.store(true, Ordering::SeqCst);
        }
        self.samples.lock().insert((AssetId::new(asset), variant), samples);
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn queries(&self) -> Vec<HistoryQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl HistoryFeed for FakeHistoryFeed {
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<VolumeSample>> {
        self.queries.lock().push(query.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::Rejected("scripted failure".into()).into());
        }
        let from = query.from.timestamp_millis();
        let to = query.to.timestamp_millis();
        Ok(self
            .samples
            .lock()
            .get(&(query.asset_id.clone(), query.variant))
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| s.timestamp_ms >= from && s.timestamp_ms < to)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn supports(&self, variant: TickerVariant) -> bool {
        match variant {
            TickerVariant::All => true,
            TickerVariant::LimitOnly => self.limit_supported.load(Ordering::SeqCst),
        }
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCompetitionStore {
    configs: Mutex<Vec<CompetitionConfig>>,
    marked: Mutex<Vec<AssetId>>,
    failing: AtomicBool,
}

impl FakeCompetitionStore {
    pub fn set(&self, configs: Vec<CompetitionConfig>) {
        *self.configs.lock() = configs;
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every successful `mark_finalized` call, in order.
    pub fn marked(&self) -> Vec<AssetId> {
        self.marked.lock().clone()
    }

    pub fn configs(&self) -> Vec<CompetitionConfig> {
        self.configs.lock().clone()
    }
}

#[async_trait]
impl CompetitionStore for FakeCompetitionStore {
    async fn load(&self) -> Result<Vec<CompetitionConfig>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("competition store"));
        }
        Ok(self.configs())
    }

    async fn mark_finalized(&self, asset_id: &AssetId) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("competition store"));
        }
        for config in self.configs.lock().iter_mut() {
            if &config.asset_id == asset_id {
                config.status = CompetitionStatus::Finalized;
            }
        }
        self.marked.lock().push(asset_id.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeArchive {
    docs: Mutex<HashMap<String, Value>>,
    puts: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeArchive {
    /// Seed `key` as if a previous run had written `value`.
    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        let value = serde_json::to_value(value).unwrap();
        self.docs.lock().insert(key.to_string(), value);
    }

    /// Decode the document at `key`, if any.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.docs
            .lock()
            .get(key)
            .map(|value| serde_json::from_value(value.clone()).unwrap())
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes to `key`.
    pub fn puts(&self, key: &str) -> usize {
        self.puts.lock().iter().filter(|k| *k == key).count()
    }
}

#[async_trait]
impl ArchiveStore for FakeArchive {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("archive"));
        }
        Ok(self.docs.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &Value) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("archive"));
        }
        self.docs.lock().insert(key.to_string(), value.clone());
        self.puts.lock().push(key.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDashboard {
    published: Mutex<Vec<DashboardSnapshot>>,
}

impl FakeDashboard {
    pub fn count(&self) -> usize {
        self.published.lock().len()
    }

    pub fn last(&self) -> Option<DashboardSnapshot> {
        self.published.lock().last().cloned()
    }
}

#[async_trait]
impl DashboardSink for FakeDashboard {
    async fn publish(&self, snapshot: &DashboardSnapshot) -> Result<()> {
        self.published.lock().push(snapshot.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FakePorts
// ---------------------------------------------------------------------------

/// One fake per port, shared with the tracker built from it so tests can
/// script inputs and inspect writes.
#[derive(Default, Clone)]
pub struct FakePorts {
    pub tickers: Arc<FakeTickerFeed>,
    pub history: Arc<FakeHistoryFeed>,
    pub competitions: Arc<FakeCompetitionStore>,
    pub archive: Arc<FakeArchive>,
    pub dashboard: Arc<FakeDashboard>,
}

impl FakePorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ports(&self) -> Ports {
        Ports {
            tickers: self.tickers.clone(),
            history: self.history.clone(),
            competitions: self.competitions.clone(),
            archive: self.archive.clone(),
            dashboard: Some(self.dashboard.clone()),
        }
    }

    /// A tracker wired to these fakes with [`settings`](super::config::settings).
    pub fn tracker(&self) -> Tracker {
        Tracker::new(self.ports(), super::config::settings())
    }
}
