//! Runtime operator implementation.

use async_trait::async_trait;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::infrastructure::orchestration::orchestrator::Orchestrator;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot, RuntimeOperator};

use super::entry::Operator;

#[async_trait]
impl RuntimeOperator for Operator {
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot> {
        let config = Self::load_run_config(request)?;
        Ok(RunStartupSnapshot {
            competitions_file: config.storage.competitions_file,
            archive_dir: config.storage.archive_dir,
            dashboard_file: config.storage.dashboard_file,
        })
    }

    async fn execute_run(&self, request: RunRequest) -> Result<()> {
        let config = Self::load_run_config(&request)?;
        config.init_logging();
        info!(version = env!("CARGO_PKG_VERSION"), "alpha-tourney starting");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut app_handle =
            tokio::spawn(async move { Orchestrator::run_with_shutdown(config, shutdown_rx).await });

        tokio::select! {
            result = &mut app_handle => {
                map_app_result(result)?;
                info!("alpha-tourney stopped");
                return Ok(());
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received (Ctrl+C)");
                let _ = shutdown_tx.send(true);
            }
        }

        map_app_result(app_handle.await)?;
        info!("alpha-tourney stopped");
        Ok(())
    }
}

fn map_app_result(result: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "Application exited with error");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, "Application task join failed");
            Err(Error::Runtime(e.to_string()))
        }
    }
}
