//! Dashboard snapshot written to a JSON file for external consumers.

use std::path::PathBuf;

use async_trait::async_trait;

use super::atomic::{blocking, write_json};
use crate::domain::view::DashboardSnapshot;
use crate::error::Result;
use crate::port::outbound::dashboard::DashboardSink;

/// Current dashboard format version.
const DASHBOARD_VERSION: u32 = 1;

#[derive(serde::Serialize)]
struct Document<'a> {
    version: u32,
    #[serde(flatten)]
    snapshot: &'a DashboardSnapshot,
}

pub struct DashboardFile {
    path: PathBuf,
}

impl DashboardFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DashboardSink for DashboardFile {
    async fn publish(&self, snapshot: &DashboardSnapshot) -> Result<()> {
        let json = serde_json::to_value(Document {
            version: DASHBOARD_VERSION,
            snapshot,
        })?;
        let path = self.path.clone();
        blocking(move || write_json(&path, &json)).await
    }
}
