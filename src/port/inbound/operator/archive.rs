//! Read access to archived results for operator-facing adapters.

use crate::domain::finalized::FinalizedRecord;
use crate::error::Result;

pub trait ArchiveOperator: Send + Sync {
    /// Every finalized record in the archive named by `config_toml`,
    /// ordered by asset.
    fn finalized_records(&self, config_toml: &str) -> Result<Vec<FinalizedRecord>>;
}
