//! Interactive session.
//!
//! Reads one action per line while the scheduler syncs in the background.
//! Status changes are printed as they happen.

use super::CliWidget;
use crate::widget::{Action, Reply};
use quotebook_sync::SyncScheduler;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Runs the shell until `quit` or end of input.
pub async fn run(
    mut widget: CliWidget,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = Arc::clone(widget.engine());
    let mut status = engine.subscribe();
    let scheduler = SyncScheduler::start(engine, interval);

    println!("Quotebook shell. Type 'help' for commands.");
    if let Some(quote) = widget.last_viewed() {
        println!("Last viewed: {quote}");
    }
    println!("Category: {}", widget.selected_filter());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            changed = status.changed() => {
                if changed.is_ok() {
                    println!();
                    println!("[sync] {}", *status.borrow_and_update());
                }
                continue;
            }
        };
        let Some(line) = line else { break };

        let action = match Action::parse(&line) {
            Ok(action) => action,
            Err(crate::widget::ParseActionError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let is_sync = action == Action::Sync;

        match widget.dispatch(action).await {
            Ok(Reply::Quit) => break,
            Ok(reply) => println!("{reply}"),
            Err(e) => println!("Error: {e}"),
        }

        if is_sync {
            let _ = status.borrow_and_update();
        }
    }

    scheduler.stop().await;
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
