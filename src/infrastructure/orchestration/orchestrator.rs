//! Infrastructure orchestration façade.

use tokio::sync::watch;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Main application orchestrator.
pub struct Orchestrator;

impl Orchestrator {
    /// Run until the process receives Ctrl-C.
    pub async fn run(config: Config) -> Result<()> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(true);
            }
        });
        super::runtime::run_with_shutdown(config, shutdown_rx).await
    }

    /// Run with externally controlled shutdown signal.
    pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
        super::runtime::run_with_shutdown(config, shutdown).await
    }
}
