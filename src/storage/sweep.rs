//! Background Expiration Sweep
//!
//! A Tokio task that wakes on a fixed cadence and drains every due entry
//! from the expiration index, deleting the corresponding keys from the
//! mapping. Each pass stops as soon as the earliest deadline is in the
//! future, so a pass costs O(k log n) for k due keys and touches nothing
//! else.
//!
//! The task is owned by the [`Store`](crate::storage::Store) that spawned
//! it: the [`Sweeper`] handle signals shutdown over a watch channel, and
//! dropping the handle signals it too, so no sweep work outlives the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::storage::engine::Shared;

/// Configuration for the background sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Fixed interval between sweep passes.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

/// Handle to the running sweep task.
///
/// Stopping is idempotent; the task is also stopped when the handle is
/// dropped.
#[derive(Debug)]
pub struct Sweeper {
    shutdown_tx: watch::Sender<bool>,
}

impl Sweeper {
    /// Spawns the sweep task against the store's shared state.
    pub(crate) fn start(shared: Arc<Shared>, config: SweepConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweep_loop(shared, config, shutdown_rx));
        debug!("background expiration sweep started");

        Self { shutdown_tx }
    }

    /// Signals the sweep task to stop. No pass begins after this returns;
    /// a pass already holding the lock finishes normally.
    pub fn stop(&self) {
        let was_stopped = self.shutdown_tx.send_replace(true);
        if !was_stopped {
            debug!("background expiration sweep stopped");
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The sweep loop: sleep one interval, drain due entries, repeat.
async fn sweep_loop(shared: Arc<Shared>, config: SweepConfig, mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    trace!("expiration sweep received shutdown signal");
                    return;
                }
            }
        }

        let removed = shared.sweep_due(Instant::now());
        if removed > 0 {
            debug!(removed, "expired keys removed");
        }
    }
}
