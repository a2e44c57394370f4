//! Publication of the consumer-facing snapshot.

use async_trait::async_trait;

use crate::domain::view::DashboardSnapshot;
use crate::error::Result;

#[async_trait]
pub trait DashboardSink: Send + Sync {
    async fn publish(&self, snapshot: &DashboardSnapshot) -> Result<()>;
}
