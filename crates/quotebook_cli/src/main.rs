//! Quotebook CLI
//!
//! Command-line front end for the Quotebook quote manager.
//!
//! # Commands
//!
//! - `random` - Show a random quote
//! - `add` - Add a quote
//! - `list` / `categories` / `filter` - Browse by category
//! - `export` / `import` - Move quotes in and out as JSON
//! - `sync` / `watch` - Pull server updates once or periodically
//! - `shell` - Interactive session with background sync

mod commands;
mod widget;

use clap::{Parser, Subcommand};
use quotebook_core::CoreConfig;
use quotebook_sync::{SyncConfig, DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Local-first quote manager with server sync.
#[derive(Parser)]
#[command(name = "quotebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the quote store
    #[arg(global = true, short, long, env = "QUOTEBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Server endpoint to sync from
    #[arg(global = true, long, env = "QUOTEBOOK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Random,

    /// Add a quote
    Add {
        /// Quote text
        text: String,

        /// Quote category
        category: String,
    },

    /// List quotes
    List {
        /// Only this category (`all` for every category); defaults to the
        /// selected filter
        #[arg(short, long)]
        category: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List categories
    Categories {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Select the category filter (`all` for every category)
    Filter {
        /// Category name
        category: String,
    },

    /// Export quotes as JSON
    Export {
        /// Output file (`-` for stdout); defaults to quotes.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import quotes from a JSON file
    Import {
        /// File to import (`-` for stdin)
        file: PathBuf,
    },

    /// Sync with the server once
    Sync {
        /// Maximum number of server records to take
        #[arg(short, long, default_value_t = DEFAULT_FETCH_LIMIT)]
        limit: usize,
    },

    /// Sync with the server periodically until interrupted
    Watch {
        /// Seconds between syncs
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Maximum number of server records to take
        #[arg(short, long, default_value_t = DEFAULT_FETCH_LIMIT)]
        limit: usize,
    },

    /// Start an interactive session
    Shell {
        /// Seconds between background syncs
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut core = CoreConfig::new();
    if let Some(dir) = cli.data_dir {
        core = core.data_dir(dir);
    }
    let sync = SyncConfig::new(cli.endpoint);

    match cli.command {
        Commands::Random => {
            let widget = commands::open_widget(&core, sync)?;
            commands::quotes::random(&widget)?;
        }
        Commands::Add { text, category } => {
            let widget = commands::open_widget(&core, sync)?;
            commands::quotes::add(&widget, &text, &category)?;
        }
        Commands::List { category, format } => {
            let widget = commands::open_widget(&core, sync)?;
            commands::quotes::list(&widget, category.as_deref(), &format)?;
        }
        Commands::Categories { format } => {
            let widget = commands::open_widget(&core, sync)?;
            commands::quotes::categories(&widget, &format)?;
        }
        Commands::Filter { category } => {
            let mut widget = commands::open_widget(&core, sync)?;
            commands::quotes::filter(&mut widget, &category)?;
        }
        Commands::Export { output } => {
            let widget = commands::open_widget(&core, sync)?;
            let output = output.unwrap_or_else(|| core.default_export_path());
            commands::transfer::export(&widget, &output)?;
        }
        Commands::Import { file } => {
            let widget = commands::open_widget(&core, sync)?;
            commands::transfer::import(&widget, &file)?;
        }
        Commands::Sync { limit } => {
            let widget = commands::open_widget(&core, sync.with_fetch_limit(limit))?;
            commands::sync::run(&widget).await?;
        }
        Commands::Watch { interval, limit } => {
            let interval = Duration::from_secs(interval);
            let sync = sync.with_fetch_limit(limit).with_interval(interval);
            let widget = commands::open_widget(&core, sync)?;
            commands::sync::watch(&widget, interval).await?;
        }
        Commands::Shell { interval } => {
            let interval = Duration::from_secs(interval);
            let widget = commands::open_widget(&core, sync.with_interval(interval))?;
            commands::shell::run(widget, interval).await?;
        }
        Commands::Version => {
            println!("Quotebook CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Quotebook Core v{}", quotebook_core::VERSION);
        }
    }

    Ok(())
}
