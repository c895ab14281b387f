//! Background scheduler for periodic sync.

use crate::remote::RemoteSource;
use crate::state::SyncEngine;
use quotebook_storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Runs [`SyncEngine::sync`] on a fixed interval until stopped.
///
/// The first sync happens one interval after start. Ticks missed while a
/// sync is running are skipped, not queued. Dropping the scheduler signals
/// shutdown without waiting; use [`SyncScheduler::stop`] to wait for the
/// task to finish.
#[derive(Debug)]
pub struct SyncScheduler {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawns the scheduler task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero, or if called outside a tokio runtime.
    pub fn start<R, S>(engine: Arc<SyncEngine<R, S>>, period: Duration) -> Self
    where
        R: RemoteSource + 'static,
        S: KeyValueStore + 'static,
    {
        assert!(!period.is_zero(), "sync interval must be non-zero");

        let (shutdown, mut stop) = watch::channel(false);
        let handle = tokio::spawn(async move {
            info!(?period, "sync scheduler started");

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    _ = ticker.tick() => {}
                }

                // Runs outside the select so shutdown never cancels a fetch.
                let outcome = engine.sync().await;
                debug!(?outcome, "scheduled sync finished");
            }

            info!("sync scheduler stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Returns true until the scheduler task has exited.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signals shutdown and waits for the task to exit.
    ///
    /// A sync already in flight is allowed to finish; no sync starts after
    /// this returns.
    pub async fn stop(mut self) {
        self.shutdown.send_replace(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "sync scheduler task ended abnormally");
            }
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}
