//! Configuration loading through the public API.

mod support;

use alpha_tourney::error::{ConfigError, Error};
use alpha_tourney::infrastructure::config::settings::Config;
use rust_decimal_macros::dec;
use support::files::Workspace;

#[test]
fn example_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
    let example = Config::load(path).expect("example config loads");
    let defaults = Config::parse_toml("").expect("empty config loads");

    assert_eq!(example.exchange.ticker_url, defaults.exchange.ticker_url);
    assert_eq!(example.exchange.history_url, defaults.exchange.history_url);
    assert_eq!(example.schedule.realtime_secs, defaults.schedule.realtime_secs);
    assert_eq!(
        example.schedule.competition_refresh_secs,
        defaults.schedule.competition_refresh_secs
    );
    assert_eq!(example.schedule.call_timeout_ms, defaults.schedule.call_timeout_ms);
    assert_eq!(example.projection.base_factor, dec!(0.97));
    assert_eq!(example.projection.freeze_lead_secs, defaults.projection.freeze_lead_secs);
    assert_eq!(example.storage.archive_dir, defaults.storage.archive_dir);
    assert!(example.exchange.limit_ticker_url.is_none());
    assert!(example.storage.dashboard_file.is_none());
}

#[test]
fn load_reads_storage_paths_from_file() {
    let workspace = Workspace::new();
    let path = workspace.write_config("[schedule]\nrealtime_secs = 5\n");

    let config = Config::load(&path).expect("config loads");

    assert_eq!(config.schedule.realtime_secs, 5);
    assert!(config.storage.archive_dir.ends_with("archive"));
    assert!(config.storage.competitions_file.ends_with("competitions.json"));
}

#[test]
fn missing_file_is_a_read_error() {
    let workspace = Workspace::new();
    match Config::load(workspace.path("absent.toml")) {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn history_url_without_symbol_placeholder_is_rejected() {
    let toml = "[exchange]\nhistory_url = \"https://example.com/klines\"\n";
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "history_url",
            ..
        })) => {}
        other => panic!("expected invalid history_url, got {other:?}"),
    }
}

#[test]
fn zero_call_timeout_is_rejected() {
    let toml = "[schedule]\ncall_timeout_ms = 0\n";
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "call_timeout_ms",
            ..
        })) => {}
        other => panic!("expected invalid call_timeout_ms, got {other:?}"),
    }
}

#[test]
fn non_positive_base_factor_is_rejected() {
    let toml = "[projection]\nbase_factor = 0\n";
    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "base_factor",
            ..
        }))
    ));
}

#[test]
fn unknown_log_format_falls_back_without_failing_validation() {
    let config = Config::parse_toml("[logging]\nformat = \"xml\"\n").expect("config loads");
    assert_eq!(config.logging.format, "xml");
}

#[test]
fn example_competitions_file_decodes() {
    use alpha_tourney::domain::competition::{CompetitionConfig, CompetitionStatus, VolumeBasis};

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/competitions.example.json");
    let raw = std::fs::read_to_string(path).expect("example competitions present");
    let configs: Vec<CompetitionConfig> = serde_json::from_str(&raw).expect("example decodes");

    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].target_history.len(), 2);
    assert!(configs[1].has_mid_day_start());
    assert_eq!(configs[1].volume_basis, VolumeBasis::LimitOnly);
    assert_eq!(configs[1].status, CompetitionStatus::Live);
}
