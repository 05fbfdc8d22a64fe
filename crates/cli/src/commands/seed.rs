//! Dump the deterministic seed snapshot as JSON.

use thiserror::Error;

use motorpool_engine::fixtures;

/// Errors the seed dumper can produce.
#[derive(Debug, Error)]
pub enum SeedError {
    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print the seed snapshot.
#[allow(clippy::print_stdout)]
pub fn seed() -> Result<(), SeedError> {
    let snapshot = fixtures::seed_snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
