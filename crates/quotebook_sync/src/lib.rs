//! # Quotebook Sync
//!
//! Reconciles the local quote collection against a remote source.
//!
//! This crate provides:
//! - Sync state machine (idle → syncing → applied / no change / failed → idle)
//! - Remote source abstraction with an HTTP implementation and a mock
//! - Periodic scheduler with cancellable teardown
//!
//! ## Policy
//!
//! The remote is authoritative. A successful, non-empty fetch replaces the
//! local collection wholesale; quotes that exist only locally are
//! discarded. An empty fetch or a failed fetch leaves local state alone.
//!
//! ## Key Invariants
//!
//! - At most one sync is in flight; overlapping triggers are skipped
//! - The repository is only locked after the fetch completes
//! - Failures never escape `sync()`; they become status text

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod remote;
mod scheduler;
mod state;

pub use config::{SyncConfig, DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpRemoteSource, HttpResponse, ReqwestClient};
pub use remote::{snapshot_from, MockRemoteSource, RemoteRecord, RemoteSource, SERVER_CATEGORY};
pub use scheduler::SyncScheduler;
pub use state::{
    SyncEngine, SyncOutcome, SyncState, SyncStats, STATUS_APPLIED, STATUS_NO_CHANGE,
    STATUS_SYNCING,
};
