//! Shared application state.
//!
//! Every loop reads and writes through [`AppState`]. Per-asset records are
//! replaced whole, so a reader sees either the previous record or the new
//! one. Lock order, where more than one lock is held: `finalized`, then
//! `active`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;

use crate::domain::competition::CompetitionConfig;
use crate::domain::finalized::{FinalizedArchive, FinalizedRecord};
use crate::domain::id::AssetId;
use crate::domain::ledger::{BaseVolume, StartOffset};
use crate::domain::market::MarketDataEntry;
use crate::domain::tail::AssetTails;
use crate::domain::velocity::{Velocity, VelocityTracker};
use crate::domain::view::CompetitionView;

/// Base volume of every asset, as archived.
pub type BaseVolumes = BTreeMap<AssetId, BaseVolume>;

#[derive(Debug, Clone, Copy)]
struct DayOffset {
    date: NaiveDate,
    offset: StartOffset,
}

/// Shared application state accessible by all loops.
#[derive(Default)]
pub struct AppState {
    /// Latest market data per listed asset.
    markets: DashMap<AssetId, MarketDataEntry>,
    /// Yesterday's tails per competing asset.
    tails: DashMap<AssetId, Arc<AssetTails>>,
    /// Day-one start offsets, valid for their date only.
    offsets: DashMap<AssetId, DayOffset>,
    base_volumes: RwLock<BaseVolumes>,
    /// Competitions being tracked.
    active: RwLock<BTreeMap<AssetId, CompetitionConfig>>,
    finalized: RwLock<FinalizedArchive>,
    views: RwLock<BTreeMap<AssetId, CompetitionView>>,
    velocity: Mutex<HashMap<AssetId, VelocityTracker>>,
    /// Finalized records not yet confirmed written to the archive.
    finalized_dirty: AtomicBool,
    /// In-memory base volumes ahead of the archive.
    base_dirty: AtomicBool,
    /// Finalized assets not yet confirmed in the competition store.
    pending_store_marks: Mutex<BTreeSet<AssetId>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Market data

    #[must_use]
    pub fn market(&self, asset_id: &AssetId) -> Option<MarketDataEntry> {
        self.markets.get(asset_id).map(|entry| entry.value().clone())
    }

    pub fn replace_market(&self, entry: MarketDataEntry) {
        self.markets.insert(entry.asset_id.clone(), entry);
    }

    /// All market entries ordered by asset.
    #[must_use]
    pub fn markets(&self) -> Vec<MarketDataEntry> {
        let mut entries: Vec<_> = self
            .markets
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        entries
    }

    /// Observed `rolling limit / rolling total` share for an asset, clamped
    /// to `[0, 1]`. Zero when unknown.
    #[must_use]
    pub fn limit_share(&self, asset_id: &AssetId) -> Decimal {
        self.markets
            .get(asset_id)
            .map_or(Decimal::ZERO, |entry| {
                let total = entry.all.rolling_volume_24h;
                if total <= Decimal::ZERO {
                    return Decimal::ZERO;
                }
                (entry.rolling_limit_volume() / total).clamp(Decimal::ZERO, Decimal::ONE)
            })
    }

    // Tails

    #[must_use]
    pub fn tails(&self, asset_id: &AssetId) -> Option<Arc<AssetTails>> {
        self.tails.get(asset_id).map(|t| Arc::clone(t.value()))
    }

    pub fn set_tails(&self, asset_id: AssetId, tails: AssetTails) {
        self.tails.insert(asset_id, Arc::new(tails));
    }

    /// True when `asset_id` has tails built for the day before `today`.
    #[must_use]
    pub fn has_tails_for(&self, asset_id: &AssetId, today: NaiveDate) -> bool {
        self.tails
            .get(asset_id)
            .is_some_and(|t| t.effective_for(today).is_some())
    }

    // Start offsets

    #[must_use]
    pub fn offset(&self, asset_id: &AssetId, date: NaiveDate) -> Option<StartOffset> {
        self.offsets
            .get(asset_id)
            .filter(|o| o.date == date)
            .map(|o| o.offset)
    }

    pub fn set_offset(&self, asset_id: AssetId, date: NaiveDate, offset: StartOffset) {
        self.offsets.insert(asset_id, DayOffset { date, offset });
    }

    /// Drop offsets cached for days before `today`.
    pub fn prune_offsets(&self, today: NaiveDate) {
        self.offsets.retain(|_, o| o.date >= today);
    }

    // Base volumes

    #[must_use]
    pub fn base_volume(&self, asset_id: &AssetId) -> Option<BaseVolume> {
        self.base_volumes.read().get(asset_id).cloned()
    }

    #[must_use]
    pub fn base_volumes(&self) -> BaseVolumes {
        self.base_volumes.read().clone()
    }

    /// Replace the base volumes with the archived copy, unless local changes
    /// have not been written back yet. Returns whether the copy was applied.
    ///
    /// The dirty flag is only read or set while the write lock is held.
    pub fn load_base_volumes(&self, archived: BaseVolumes) -> bool {
        let mut bases = self.base_volumes.write();
        if self.base_dirty.load(Ordering::SeqCst) {
            return false;
        }
        *bases = archived;
        true
    }

    /// Mutate the base volumes in place; marks them dirty when `f` reports a change.
    pub fn update_base_volumes<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut BaseVolumes) -> bool,
    {
        let mut bases = self.base_volumes.write();
        let changed = f(&mut bases);
        if changed {
            self.base_dirty.store(true, Ordering::SeqCst);
        }
        changed
    }

    // Active competitions

    /// Active competitions ordered by asset.
    #[must_use]
    pub fn active_competitions(&self) -> Vec<CompetitionConfig> {
        self.active.read().values().cloned().collect()
    }

    #[must_use]
    pub fn is_active(&self, asset_id: &AssetId) -> bool {
        self.active.read().contains_key(asset_id)
    }

    /// Replace the active set, dropping anything finalized in the meantime.
    pub fn replace_active(&self, competitions: BTreeMap<AssetId, CompetitionConfig>) {
        let finalized = self.finalized.read();
        let mut active = self.active.write();
        *active = competitions
            .into_iter()
            .filter(|(asset_id, _)| !finalized.contains_key(asset_id))
            .collect();
        drop(active);
        drop(finalized);

        let active = self.active.read();
        self.views.write().retain(|asset_id, _| active.contains_key(asset_id));
        self.velocity.lock().retain(|asset_id, _| active.contains_key(asset_id));
    }

    // Finalization

    #[must_use]
    pub fn is_finalized(&self, asset_id: &AssetId) -> bool {
        self.finalized.read().contains_key(asset_id)
    }

    /// Record `record` and drop its competition from the active set in one
    /// step. Returns `false` without side effects when the asset already has
    /// a finalized record.
    pub fn finalize(&self, record: FinalizedRecord) -> bool {
        let asset_id = record.asset_id().clone();
        let mut finalized = self.finalized.write();
        if finalized.contains_key(&asset_id) {
            return false;
        }
        let mut active = self.active.write();
        finalized.insert(asset_id.clone(), record);
        active.remove(&asset_id);
        drop(active);
        drop(finalized);

        self.views.write().remove(&asset_id);
        self.velocity.lock().remove(&asset_id);
        self.finalized_dirty.store(true, Ordering::SeqCst);
        self.pending_store_marks.lock().insert(asset_id);
        true
    }

    /// Merge archived records; records already held in memory are kept.
    /// Returns the number of records added.
    pub fn restore_finalized(&self, archived: FinalizedArchive) -> usize {
        let mut finalized = self.finalized.write();
        let mut active = self.active.write();
        let mut added = 0;
        for (asset_id, record) in archived {
            if finalized.contains_key(&asset_id) {
                continue;
            }
            active.remove(&asset_id);
            finalized.insert(asset_id, record);
            added += 1;
        }
        added
    }

    #[must_use]
    pub fn finalized_archive(&self) -> FinalizedArchive {
        self.finalized.read().clone()
    }

    #[must_use]
    pub fn finalized_records(&self) -> Vec<FinalizedRecord> {
        self.finalized.read().values().cloned().collect()
    }

    // Pending writes

    /// Claim the pending finalized-archive write. Call [`Self::requeue_finalized_write`]
    /// if the write fails.
    pub fn take_finalized_write(&self) -> bool {
        self.finalized_dirty.swap(false, Ordering::SeqCst)
    }

    pub fn requeue_finalized_write(&self) {
        self.finalized_dirty.store(true, Ordering::SeqCst);
    }

    pub fn take_base_write(&self) -> bool {
        self.base_dirty.swap(false, Ordering::SeqCst)
    }

    pub fn requeue_base_write(&self) {
        self.base_dirty.store(true, Ordering::SeqCst);
    }

    pub fn take_store_marks(&self) -> BTreeSet<AssetId> {
        std::mem::take(&mut *self.pending_store_marks.lock())
    }

    pub fn requeue_store_mark(&self, asset_id: AssetId) {
        self.pending_store_marks.lock().insert(asset_id);
    }

    // Views and velocity

    pub fn set_view(&self, view: CompetitionView) {
        let asset_id = view.config.asset_id.clone();
        if self.is_active(&asset_id) {
            self.views.write().insert(asset_id, view);
        }
    }

    /// Current competition views ordered by asset.
    #[must_use]
    pub fn views(&self) -> Vec<CompetitionView> {
        self.views.read().values().cloned().collect()
    }

    /// Record today's cumulative volume and return the velocity over `window`.
    pub fn record_velocity(
        &self,
        asset_id: &AssetId,
        at: DateTime<Utc>,
        volume: Decimal,
        tx_count: u64,
        window: Duration,
    ) -> Velocity {
        let mut trackers = self.velocity.lock();
        let tracker = trackers
            .entry(asset_id.clone())
            .or_insert_with(|| VelocityTracker::new(window));
        tracker.record(at, volume, tx_count);
        tracker.velocity()
    }
}
