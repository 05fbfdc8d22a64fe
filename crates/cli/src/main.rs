//! Motorpool CLI - demo runner and data tools.
//!
//! # Usage
//!
//! ```bash
//! # Run a live engine against the simulated remote, drift enabled
//! mp-cli run
//!
//! # Deterministic 30-second run with fast drift
//! mp-cli run --drift-seed 42 --drift-interval-ms 500 --duration-secs 30
//!
//! # Print the seed snapshot as JSON
//! mp-cli seed
//! ```
//!
//! # Commands
//!
//! - `run` - Spawn the engine over a seeded in-memory remote and stream
//!   roster/pool/error transitions to stdout until interrupted
//! - `seed` - Dump the deterministic seed snapshot as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mp-cli")]
#[command(author, version, about = "Motorpool CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live demo engine against the simulated remote
    Run(commands::run::RunArgs),
    /// Print the seed snapshot as JSON
    Seed,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "motorpool_engine=info,motorpool_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let result: Result<(), commands::CommandError> = match cli.command {
        Commands::Run(args) => commands::run::run(args).await.map_err(Into::into),
        Commands::Seed => commands::seed::seed().map_err(Into::into),
    };

    if let Err(error) = result {
        tracing::error!(%error, "command failed");
        std::process::exit(1);
    }
}
