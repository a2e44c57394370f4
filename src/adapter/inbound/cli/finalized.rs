//! Handler for the `finalized` command.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::FinalizedArgs;
use super::{operator, output};
use crate::domain::finalized::FinalizedRecord;
use crate::domain::id::AssetId;
use crate::error::Result;

#[derive(Tabled)]
struct FinalizedRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Ended")]
    ended: String,
    #[tabled(rename = "Rule")]
    rule: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Target")]
    target: i64,
    #[tabled(rename = "Delta")]
    delta: i64,
    #[tabled(rename = "Finalized At")]
    finalized_at: String,
}

impl From<&FinalizedRecord> for FinalizedRow {
    fn from(record: &FinalizedRecord) -> Self {
        Self {
            asset: record.asset_id().to_string(),
            ended: record.config.end_date.to_string(),
            rule: record.config.rule_type.label().to_string(),
            volume: record.prediction.projected_volume.round_dp(2).to_string(),
            target: record.prediction.target,
            delta: record.prediction.delta,
            finalized_at: record.finalized_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Print the archived finalized records, newest first.
pub fn execute(config_path: &Path, args: &FinalizedArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let records = operator::operator()?.finalized_records(&config_toml)?;
    let records = select(records, args.asset.as_deref());

    if output::is_json() {
        output::json_output(json!({
            "command": "finalized",
            "records": records,
        }));
        return Ok(());
    }

    output::header();
    output::section("Finalized competitions");
    if records.is_empty() {
        output::warning("No finalized competitions in the archive");
        return Ok(());
    }
    let rows: Vec<FinalizedRow> = records.iter().map(FinalizedRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn select(records: Vec<FinalizedRecord>, asset: Option<&str>) -> Vec<FinalizedRecord> {
    let asset = asset.map(AssetId::new);
    let mut records: Vec<FinalizedRecord> = records
        .into_iter()
        .filter(|r| asset.as_ref().map_or(true, |asset| r.asset_id() == asset))
        .collect();
    records.sort_by(|a, b| b.finalized_at.cmp(&a.finalized_at));
    records
}
