//! Diagnostic operator implementation.

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::diagnostic::{ConfigCheckReport, DiagnosticOperator};

use super::entry::Operator;

impl DiagnosticOperator for Operator {
    fn check_config(&self, config_toml: &str) -> Result<ConfigCheckReport> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigCheckReport {
            ticker_url: config.exchange.ticker_url,
            limit_ticker_url: config.exchange.limit_ticker_url,
            history_url: config.exchange.history_url,
            limit_history_url: config.exchange.limit_history_url,
            realtime_secs: config.schedule.realtime_secs,
            competition_refresh_secs: config.schedule.competition_refresh_secs,
            offset_refresh_secs: config.schedule.offset_refresh_secs,
            base_refresh_secs: config.schedule.base_refresh_secs,
            rollover_check_secs: config.schedule.rollover_check_secs,
            base_factor: config.projection.base_factor,
            freeze_lead_secs: config.projection.freeze_lead_secs,
            velocity_window_secs: config.projection.velocity_window_secs,
            competitions_file: config.storage.competitions_file,
            archive_dir: config.storage.archive_dir,
            dashboard_file: config.storage.dashboard_file,
            roll_base_volume: config.storage.roll_base_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    #[test]
    fn empty_config_reports_defaults() {
        let report = Operator.check_config("").unwrap();

        assert_eq!(report.realtime_secs, 3);
        assert!(report.derives_limit_history());
        assert!(report.dashboard_file.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Operator
            .check_config("[schedule]\nrealtime_secs = 0\n")
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "realtime_secs",
                ..
            })
        ));
    }
}
