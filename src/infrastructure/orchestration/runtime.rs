//! Orchestrator runtime lifecycle.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, warn};

use super::loops::{join_loops, spawn_loop};
use super::startup;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_tracker;
use crate::infrastructure::config::settings::Config;

/// Runtime loop entrypoint used by
/// [`Orchestrator`](super::orchestrator::Orchestrator).
pub async fn run_with_shutdown(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(
        ticker_url = %config.exchange.ticker_url,
        competitions = %config.storage.competitions_file,
        archive = %config.storage.archive_dir,
        "Starting alpha-tourney"
    );

    let tracker = Arc::new(build_tracker(&config));
    startup::warm_up(&tracker).await;

    let schedule = &config.schedule;
    let handles = vec![
        spawn_loop("realtime", schedule.realtime(), shutdown.clone(), {
            let tracker = Arc::clone(&tracker);
            move || {
                let tracker = Arc::clone(&tracker);
                async move { tracker.run_realtime(Utc::now()).await }
            }
        }),
        spawn_loop("competitions", schedule.competition_refresh(), shutdown.clone(), {
            let tracker = Arc::clone(&tracker);
            move || {
                let tracker = Arc::clone(&tracker);
                async move {
                    tracker.run_competition_refresh(Utc::now()).await;
                }
            }
        }),
        spawn_loop("offsets", schedule.offset_refresh(), shutdown.clone(), {
            let tracker = Arc::clone(&tracker);
            move || {
                let tracker = Arc::clone(&tracker);
                async move {
                    tracker.run_offsets(Utc::now()).await;
                }
            }
        }),
        spawn_loop("base_volumes", schedule.base_refresh(), shutdown.clone(), {
            let tracker = Arc::clone(&tracker);
            move || {
                let tracker = Arc::clone(&tracker);
                async move {
                    tracker.run_base_refresh().await;
                }
            }
        }),
        spawn_loop("rollover", schedule.rollover_check(), shutdown.clone(), {
            let tracker = Arc::clone(&tracker);
            move || {
                let tracker = Arc::clone(&tracker);
                async move {
                    tracker.run_rollover(Utc::now()).await;
                }
            }
        }),
    ];
    info!(loops = handles.len(), "Tracking");

    while shutdown.changed().await.is_ok() {
        if *shutdown.borrow() {
            break;
        }
    }
    info!("Shutdown signal received");

    let failed = join_loops(handles).await;
    if failed > 0 {
        warn!(failed, "Some loops ended abnormally");
    }
    tracker.flush_pending().await;
    info!("Pending writes flushed, exiting");
    Ok(())
}
