//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional, with defaults:
//! - `MOTORPOOL_CHANNEL_CAPACITY` - Command/result queue capacity (default: 64)
//! - `MOTORPOOL_AUTO_RESYNC` - Refresh automatically on stale results
//!   (default: true; set to false to require an explicit refresh command)
//! - `MOTORPOOL_REMOTE_LATENCY_MS` - Simulated remote latency (default: 500)
//! - `MOTORPOOL_DRIFT_INTERVAL_MS` - Drift generator period (default: 5000)
//! - `MOTORPOOL_DRIFT_SEED` - Fixed drift RNG seed (default: random)

use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but unparseable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Behavior of the engine itself.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Capacity of the command queue and of the completion queue.
    pub channel_capacity: usize,
    /// Whether a stale result triggers a refresh immediately, or waits for
    /// an explicit refresh command.
    pub auto_resync: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            auto_resync: true,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            channel_capacity: parse_or("MOTORPOOL_CHANNEL_CAPACITY", 64)?,
            auto_resync: parse_or("MOTORPOOL_AUTO_RESYNC", true)?,
        })
    }
}

/// Shape of the simulated remote and its background drift.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Per-operation remote latency.
    pub remote_latency: Duration,
    /// Drift generator period.
    pub drift_interval: Duration,
    /// Fixed drift RNG seed for reproducible runs.
    pub drift_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            remote_latency: Duration::from_millis(500),
            drift_interval: Duration::from_secs(5),
            drift_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let latency_ms: u64 = parse_or("MOTORPOOL_REMOTE_LATENCY_MS", 500)?;
        let drift_ms: u64 = parse_or("MOTORPOOL_DRIFT_INTERVAL_MS", 5000)?;
        let drift_seed = match std::env::var("MOTORPOOL_DRIFT_SEED") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("MOTORPOOL_DRIFT_SEED".to_owned(), e.to_string())
            })?),
            Err(_) => None,
        };

        Ok(Self {
            remote_latency: Duration::from_millis(latency_ms),
            drift_interval: Duration::from_millis(drift_ms),
            drift_seed,
        })
    }
}

/// Parse an environment variable, with a default when unset.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.channel_capacity, 64);
        assert!(engine.auto_resync);

        let sim = SimulationConfig::default();
        assert_eq!(sim.remote_latency, Duration::from_millis(500));
        assert_eq!(sim.drift_interval, Duration::from_secs(5));
        assert!(sim.drift_seed.is_none());
    }

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let value: u64 = parse_or("MOTORPOOL_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
