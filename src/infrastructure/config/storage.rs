//! Storage locations.

use serde::Deserialize;

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory of the JSON archive (finalized records, base volumes).
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    /// Operator-maintained competition list.
    #[serde(default = "default_competitions_file")]
    pub competitions_file: String,
    /// Where to publish the dashboard snapshot; disabled when absent.
    #[serde(default)]
    pub dashboard_file: Option<String>,
    /// Fold each finished day into the archived base volume on rollover.
    #[serde(default = "default_roll_base_volume")]
    pub roll_base_volume: bool,
}

fn default_archive_dir() -> String {
    "data/archive".into()
}

fn default_competitions_file() -> String {
    "data/competitions.json".into()
}

const fn default_roll_base_volume() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            archive_dir: default_archive_dir(),
            competitions_file: default_competitions_file(),
            dashboard_file: None,
            roll_base_volume: default_roll_base_volume(),
        }
    }
}
