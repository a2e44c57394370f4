//! Periodic loop driver.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// A spawned loop and the name it logs under.
pub(crate) struct LoopHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Spawn a task that awaits `tick()` every `period` until `shutdown` flips.
///
/// The first tick fires after one full period. Ticks missed while a slow
/// run was in progress are skipped, so runs never overlap or burst.
pub(crate) fn spawn_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut tick: F,
) -> LoopHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            task = name,
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "Loop started"
        );

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    debug!(task = name, "Tick");
                    tick().await;
                }
            }
        }
        info!(task = name, "Loop stopped");
    });
    LoopHandle { name, handle }
}

/// Wait for every loop to stop. Returns how many ended in a panic.
pub(crate) async fn join_loops(loops: Vec<LoopHandle>) -> usize {
    let mut failed = 0;
    for LoopHandle { name, handle } in loops {
        if let Err(e) = handle.await {
            error!(task = name, error = %e, "Loop task failed");
            failed += 1;
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let handle = spawn_loop("test", Duration::from_secs(1), rx, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        tx.send(true).unwrap();
        assert_eq!(join_loops(vec![handle]).await, 0);

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn panicked_loop_is_counted_on_join() {
        let (tx, rx) = watch::channel(false);
        let quiet = spawn_loop("quiet", Duration::from_secs(1), rx.clone(), || std::future::ready(()));
        let broken = spawn_loop("broken", Duration::from_secs(1), rx, || -> std::future::Ready<()> {
            panic!("tick failed")
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        tx.send(true).unwrap();

        assert_eq!(join_loops(vec![quiet, broken]).await, 1);
    }
}
