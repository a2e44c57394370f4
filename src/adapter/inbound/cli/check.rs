//! Handler for the `check` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::diagnostic::ConfigCheckReport;

/// Validate the configuration without starting any loop.
pub fn execute(config_path: &Path) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let report = operator::operator()?.check_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check",
            "valid": true,
            "config": config_path.display().to_string(),
            "derives_limit_history": report.derives_limit_history(),
        }));
        return Ok(());
    }

    print_report(config_path, &report);
    Ok(())
}

fn print_report(config_path: &Path, report: &ConfigCheckReport) {
    output::header();
    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Exchange");
    output::field("Ticker", &report.ticker_url);
    output::field(
        "Limit ticker",
        report.limit_ticker_url.as_deref().unwrap_or("not polled"),
    );
    output::field("History", &report.history_url);
    output::field(
        "Limit history",
        report.limit_history_url.as_deref().unwrap_or("derived"),
    );

    output::section("Schedule");
    output::field("Realtime", format!("{}s", report.realtime_secs));
    output::field("Competitions", format!("{}s", report.competition_refresh_secs));
    output::field("Offsets", format!("{}s", report.offset_refresh_secs));
    output::field("Base volumes", format!("{}s", report.base_refresh_secs));
    output::field("Rollover", format!("{}s", report.rollover_check_secs));

    output::section("Projection");
    output::field("Base factor", report.base_factor);
    output::field("Freeze lead", format!("{}s", report.freeze_lead_secs));
    output::field("Velocity window", format!("{}s", report.velocity_window_secs));

    output::section("Storage");
    output::field("Competitions", &report.competitions_file);
    output::field("Archive", &report.archive_dir);
    output::field(
        "Dashboard",
        report.dashboard_file.as_deref().unwrap_or("disabled"),
    );
    output::field("Roll base volume", report.roll_base_volume);

    if report.derives_limit_history() {
        output::warning("Limit-order history is derived from the observed limit share");
    }
}
