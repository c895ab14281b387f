//! Sync commands.

use super::CliWidget;
use crate::widget::Reply;
use quotebook_sync::{SyncOutcome, SyncScheduler};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs one sync and prints its status.
///
/// A failed sync is reported and returned as an error so the exit code
/// reflects it.
pub async fn run(widget: &CliWidget) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = widget.trigger_sync().await;
    println!("{}", Reply::Synced(outcome.clone()));

    match outcome {
        SyncOutcome::Failed { reason } => Err(reason.into()),
        _ => Ok(()),
    }
}

/// Syncs every `interval` until interrupted, printing each status change.
pub async fn watch(
    widget: &CliWidget,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::clone(widget.engine());
    let mut status = engine.subscribe();
    let scheduler = SyncScheduler::start(engine, interval);
    info!(?interval, "watching for server updates, press Ctrl-C to stop");

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", *status.borrow_and_update());
            }
        }
    }

    scheduler.stop().await;
    Ok(())
}
