//! Persistence ports for competition configs and archived blobs.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::competition::CompetitionConfig;
use crate::domain::id::AssetId;
use crate::error::Result;

/// Archive key holding every finalized record, keyed by asset.
pub const FINALIZED_KEY: &str = "finalized_competitions";

/// Archive key holding the carried-over base volume of each asset.
pub const BASE_VOLUME_KEY: &str = "base_volumes";

/// Operator-maintained tournament configuration.
#[async_trait]
pub trait CompetitionStore: Send + Sync {
    /// Every configured competition, live or finalized.
    async fn load(&self) -> Result<Vec<CompetitionConfig>>;

    /// Flag the competition for `asset_id` as finalized.
    async fn mark_finalized(&self, asset_id: &AssetId) -> Result<()>;
}

/// Key/value store for whole JSON documents.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Fetch the object at `key`; `None` when it was never written.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the object at `key`.
    async fn put(&self, key: &str, value: &Value) -> Result<()>;
}
