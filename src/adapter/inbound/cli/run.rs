//! Handler for the `run` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot};

/// Load configuration, start logging, and track until Ctrl-C.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let request = build_run_request(args, config_toml, output::is_json());
    let service = operator::operator()?;

    let startup = service.prepare_run(&request)?;
    print_startup(config_path, &startup);

    service.execute_run(request).await
}

fn build_run_request(args: &RunArgs, config_toml: String, force_json_logs: bool) -> RunRequest {
    RunRequest {
        config_toml,
        log_level: args.log_level.clone(),
        json_logs: args.json_logs || force_json_logs,
    }
}

fn print_startup(config_path: &Path, snapshot: &RunStartupSnapshot) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "config": config_path.display().to_string(),
            "competitions_file": snapshot.competitions_file,
            "archive_dir": snapshot.archive_dir,
            "dashboard_file": snapshot.dashboard_file,
        }));
        return;
    }

    output::header();
    output::field("Config", config_path.display());
    output::field("Competitions", &snapshot.competitions_file);
    output::field("Archive", &snapshot.archive_dir);
    output::field(
        "Dashboard",
        snapshot.dashboard_file.as_deref().unwrap_or("disabled"),
    );
    output::lines("");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_forces_json_logs() {
        let args = RunArgs {
            log_level: Some("debug".into()),
            json_logs: false,
        };

        let request = build_run_request(&args, String::new(), true);

        assert!(request.json_logs);
        assert_eq!(request.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn flags_pass_through_unchanged() {
        let request = build_run_request(&RunArgs::default(), "x = 1".into(), false);
        assert!(!request.json_logs);
        assert_eq!(request.log_level, None);
        assert_eq!(request.config_toml, "x = 1");
    }
}
