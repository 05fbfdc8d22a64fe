//! CLI subcommand implementations.

pub mod run;
pub mod seed;

/// Any subcommand failure.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The demo runner failed.
    #[error(transparent)]
    Run(#[from] run::RunError),

    /// The seed dumper failed.
    #[error(transparent)]
    Seed(#[from] seed::SeedError),
}
