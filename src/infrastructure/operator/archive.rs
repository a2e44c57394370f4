//! Archive operator implementation.

use crate::adapter::outbound::file::archive::FileArchive;
use crate::domain::finalized::{FinalizedArchive, FinalizedRecord};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::archive::ArchiveOperator;
use crate::port::outbound::store::FINALIZED_KEY;

use super::entry::Operator;

impl ArchiveOperator for Operator {
    fn finalized_records(&self, config_toml: &str) -> Result<Vec<FinalizedRecord>> {
        let config = Config::parse_toml(config_toml)?;
        let archive = FileArchive::new(&config.storage.archive_dir);
        let records: FinalizedArchive = archive.read(FINALIZED_KEY)?.unwrap_or_default();
        Ok(records.into_values().collect())
    }
}
