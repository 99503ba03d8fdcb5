//! MiniMOTD operator binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   data dir ──▶ config::loader ──┐
//!                                 ├──▶ motd::coordinator ──▶ ArcSwap<MotdSnapshot>
//!   icons/   ──▶ icon::manager ───┘          ▲                       │
//!                    │                       │                       ▼
//!                    ▼                  reload trigger          motd::compose
//!               icon::codec        (SIGHUP / watcher / command)  (status probe)
//! ```
//!
//! # Subcommands
//! - `check`: load the data directory once and report what was found
//! - `status`: print the composed status response as JSON
//! - `run`: stay in the foreground, reloading on SIGHUP and file changes

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use minimotd::command::OperatorCommand;
use minimotd::lifecycle::{runner, startup};
use minimotd::motd::compose;
use minimotd::observability::logging;

#[derive(Parser)]
#[command(name = "minimotd")]
#[command(about = "Server list MOTD and icon manager", long_about = None)]
struct Cli {
    /// Data directory holding settings, configs and icons.
    #[arg(short, long, default_value = "config/MiniMOTD")]
    data_dir: PathBuf,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the data directory and list loaded entries and icons
    Check,
    /// Print the status response a client would receive
    Status {
        /// Host the client connected through
        #[arg(long)]
        host: Option<String>,
        /// Real online player count
        #[arg(long, default_value_t = 0)]
        online: u32,
        /// Real maximum player count
        #[arg(long, default_value_t = 20)]
        max: u32,
    },
    /// Run in the foreground and reload on SIGHUP or file changes
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.json_logs)?;

    tracing::info!("minimotd v{} starting", env!("CARGO_PKG_VERSION"));

    // Startup failures are fatal.
    let coordinator = startup::start(&cli.data_dir)?;

    match cli.command {
        Commands::Check => {
            let snapshot = coordinator.current();
            println!("data dir: {}", cli.data_dir.display());
            println!("generation: {}", snapshot.generation());
            println!(
                "configs: {}",
                snapshot.configs().keys().cloned().collect::<Vec<_>>().join(", ")
            );
            println!("icons: {}", snapshot.icons().names().join(", "));
        }
        Commands::Status { host, online, max } => {
            let snapshot = coordinator.current();
            let response = compose(&snapshot, host.as_deref(), online, max);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Run => {
            let watch = startup::watch_if_enabled(&coordinator)?;
            let (_watcher, changes) = match watch {
                Some((watcher, changes)) => (Some(watcher), Some(changes)),
                None => (None, None),
            };

            for line in OperatorCommand::About.execute(&coordinator).lines {
                tracing::info!("{line}");
            }

            runner::run(coordinator, changes).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
