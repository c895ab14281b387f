//! Sync engine state machine.

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::remote::{snapshot_from, RemoteRecord, RemoteSource};
use parking_lot::RwLock;
use quotebook_core::SharedRepository;
use quotebook_storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Status published when a sync starts.
pub const STATUS_SYNCING: &str = "Syncing with server...";

/// Status published when the remote had nothing to apply.
pub const STATUS_NO_CHANGE: &str = "No updates from server.";

/// Status published when the remote snapshot replaced local state.
pub const STATUS_APPLIED: &str = "Data synced. Server updates applied.";

/// The current state of the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Engine is idle, not syncing.
    Idle,
    /// Engine is fetching from the remote.
    Syncing,
    /// The remote snapshot replaced the local collection.
    Applied,
    /// The remote returned nothing to apply.
    NoChange,
    /// The fetch or the replace failed.
    Failed,
}

impl SyncState {
    /// Returns true if the engine is in an active sync state.
    pub fn is_active(&self) -> bool {
        matches!(self, SyncState::Syncing)
    }

    /// Returns true for the states a sync ends in before returning to idle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncState::Applied | SyncState::NoChange | SyncState::Failed
        )
    }
}

/// Result of one sync trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The local collection was replaced by `count` remote quotes.
    Applied {
        /// Number of quotes now in the collection.
        count: usize,
    },
    /// The remote returned no usable records; nothing changed.
    NoChange,
    /// The sync failed; nothing changed.
    Failed {
        /// Why the sync failed.
        reason: String,
    },
    /// Another sync was already in flight; this trigger did nothing.
    Skipped,
}

impl SyncOutcome {
    /// Returns the status text for this outcome.
    ///
    /// `Skipped` publishes nothing and returns `None`.
    pub fn status_text(&self) -> Option<String> {
        match self {
            SyncOutcome::Applied { .. } => Some(STATUS_APPLIED.to_string()),
            SyncOutcome::NoChange => Some(STATUS_NO_CHANGE.to_string()),
            SyncOutcome::Failed { reason } => Some(format!("Sync failed: {reason}")),
            SyncOutcome::Skipped => None,
        }
    }

    /// Returns the terminal state for this outcome, if it ran.
    pub fn state(&self) -> Option<SyncState> {
        match self {
            SyncOutcome::Applied { .. } => Some(SyncState::Applied),
            SyncOutcome::NoChange => Some(SyncState::NoChange),
            SyncOutcome::Failed { .. } => Some(SyncState::Failed),
            SyncOutcome::Skipped => None,
        }
    }

    /// Returns true if the local collection was replaced.
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied { .. })
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total number of sync cycles that ran to an outcome.
    pub cycles_completed: u64,
    /// Cycles that replaced the local collection.
    pub applied: u64,
    /// Cycles that found nothing to apply.
    pub no_change: u64,
    /// Cycles that failed.
    pub failed: u64,
    /// Triggers dropped because a sync was in flight.
    pub skipped: u64,
    /// Last sync time.
    pub last_sync_time: Option<Instant>,
    /// Duration of the last completed cycle.
    pub last_duration: Option<Duration>,
    /// Last error message.
    pub last_error: Option<String>,
}

/// The sync engine reconciles a shared repository against a remote source.
///
/// The remote wins: a successful, non-empty fetch replaces the collection.
/// Status text for each step is published on a watch channel; see
/// [`SyncEngine::subscribe`].
pub struct SyncEngine<R: RemoteSource, S: KeyValueStore> {
    config: SyncConfig,
    remote: Arc<R>,
    repository: SharedRepository<S>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
    last_outcome: RwLock<Option<SyncOutcome>>,
    in_flight: AtomicBool,
    status: watch::Sender<String>,
}

impl<R: RemoteSource, S: KeyValueStore> SyncEngine<R, S> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, remote: R, repository: SharedRepository<S>) -> Self {
        let (status, _) = watch::channel(String::new());
        Self {
            config,
            remote: Arc::new(remote),
            repository,
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
            last_outcome: RwLock::new(None),
            in_flight: AtomicBool::new(false),
            status,
        }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Gets the remote source.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Gets the repository this engine writes to.
    pub fn repository(&self) -> &SharedRepository<S> {
        &self.repository
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Gets the outcome of the most recent sync that ran.
    pub fn last_outcome(&self) -> Option<SyncOutcome> {
        self.last_outcome.read().clone()
    }

    /// Returns the most recently published status text.
    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    /// Subscribes to status text updates.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    /// Returns true while a sync is in flight.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs one sync cycle.
    ///
    /// Returns `Skipped` without fetching if another sync is in flight.
    /// Errors never escape; they are reported as `Failed` and leave the
    /// repository untouched.
    pub async fn sync(&self) -> SyncOutcome {
        let Some(_guard) = InFlight::claim(self) else {
            debug!("sync already in flight, skipping trigger");
            self.stats.write().skipped += 1;
            return SyncOutcome::Skipped;
        };

        let start = Instant::now();
        self.set_state(SyncState::Syncing);
        self.publish(STATUS_SYNCING.to_string());
        debug!(endpoint = %self.config.endpoint, limit = self.config.fetch_limit, "sync started");

        let outcome = match self.remote.fetch_records(self.config.fetch_limit).await {
            Ok(records) => self.apply(records),
            Err(e) => SyncOutcome::Failed {
                reason: e.to_string(),
            },
        };

        self.finish(&outcome, start.elapsed());
        outcome
    }

    /// Replaces the collection with the snapshot built from `records`.
    fn apply(&self, records: Vec<RemoteRecord>) -> SyncOutcome {
        let snapshot = snapshot_from(records);
        if snapshot.is_empty() {
            return SyncOutcome::NoChange;
        }

        let count = snapshot.len();
        match self.repository.lock().replace_all(snapshot) {
            Ok(()) => SyncOutcome::Applied { count },
            Err(e) => SyncOutcome::Failed {
                reason: SyncError::from(e).to_string(),
            },
        }
    }

    fn finish(&self, outcome: &SyncOutcome, duration: Duration) {
        if let Some(state) = outcome.state() {
            self.set_state(state);
        }
        if let Some(text) = outcome.status_text() {
            self.publish(text);
        }

        {
            let mut stats = self.stats.write();
            stats.cycles_completed += 1;
            stats.last_sync_time = Some(Instant::now());
            stats.last_duration = Some(duration);
            match outcome {
                SyncOutcome::Applied { .. } => {
                    stats.applied += 1;
                    stats.last_error = None;
                }
                SyncOutcome::NoChange => {
                    stats.no_change += 1;
                    stats.last_error = None;
                }
                SyncOutcome::Failed { reason } => {
                    stats.failed += 1;
                    stats.last_error = Some(reason.clone());
                }
                SyncOutcome::Skipped => {}
            }
        }

        match outcome {
            SyncOutcome::Applied { count } => info!(count, ?duration, "server updates applied"),
            SyncOutcome::NoChange => info!(?duration, "no updates from server"),
            SyncOutcome::Failed { reason } => warn!(%reason, "sync failed"),
            SyncOutcome::Skipped => {}
        }

        *self.last_outcome.write() = Some(outcome.clone());
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    fn publish(&self, text: String) {
        self.status.send_replace(text);
    }
}

/// Holds the in-flight flag for one sync; returns the engine to idle on drop.
///
/// Dropping covers cancellation too: a sync future dropped mid-fetch still
/// releases the flag.
struct InFlight<'a, R: RemoteSource, S: KeyValueStore> {
    engine: &'a SyncEngine<R, S>,
}

impl<'a, R: RemoteSource, S: KeyValueStore> InFlight<'a, R, S> {
    fn claim(engine: &'a SyncEngine<R, S>) -> Option<Self> {
        engine
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { engine })
    }
}

impl<R: RemoteSource, S: KeyValueStore> Drop for InFlight<'_, R, S> {
    fn drop(&mut self) {
        self.engine.set_state(SyncState::Idle);
        self.engine.in_flight.store(false, Ordering::Release);
    }
}
