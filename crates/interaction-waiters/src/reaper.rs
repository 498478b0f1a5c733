//! Background sweep that drops registry entries whose waiter already
//! completed but whose removal never ran.
//!
//! Pending waiters are never touched, even when nobody awaits them anymore.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::registry::WaiterRegistry;

/// Handle to a running reaper task. Dropping it aborts the task.
pub struct ReaperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Shortest sweep period; a zero interval is raised to this.
pub const MIN_REAPER_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the reaper, sweeping `registry` every `interval`.
/// The first sweep happens one interval after the call.
pub fn spawn_reaper<E>(registry: Arc<WaiterRegistry<E>>, interval: Duration) -> ReaperHandle
where
    E: Send + 'static,
{
    let interval = if interval.is_zero() {
        warn!(
            "Reaper interval of zero is invalid, using {:?}",
            MIN_REAPER_INTERVAL
        );
        MIN_REAPER_INTERVAL
    } else {
        interval
    };
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Waiter reaper started (interval {:?})", interval);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let swept = registry.sweep_completed();
                    if swept > 0 {
                        debug!(swept, remaining = registry.len(), "Reaped completed waiter entries");
                    }
                }
            }
        }

        info!("Waiter reaper stopped");
    });

    ReaperHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

impl ReaperHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
