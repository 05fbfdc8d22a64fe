//! Motorpool Engine - reactive synchronization of derived fleet views.
//!
//! Keeps two denormalized views - the client roster ("which cars belong to
//! which user") and the free-car pool - consistent with a remote entity
//! store that is mutated both by this engine's own commands and by
//! uncoordinated external writers.
//!
//! # Architecture
//!
//! - One worker task owns the normalized mirror ([`EntityStore`]), both
//!   views, and the selection; every state transition is serialized on it
//! - Commands run against the [`RemoteStore`] in independent spawned tasks;
//!   each re-enters the worker as exactly one typed completion
//! - Successful completions patch the views incrementally; classified
//!   failures go to the error channel, and stale-state failures trigger a
//!   full resynchronization from a fresh snapshot
//! - Completions are generation-fenced: results that were in flight when a
//!   resynchronization happened are dropped, never reapplied
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use motorpool_engine::{
//!     Command, Engine, EngineConfig, MemoryRemote, fixtures,
//! };
//!
//! # async fn demo() -> Result<(), motorpool_engine::EngineStopped> {
//! let remote = MemoryRemote::seeded(fixtures::seed_snapshot(), Duration::from_millis(500));
//! let engine = Engine::spawn(remote, EngineConfig::default());
//!
//! let mut roster = engine.roster();
//! engine.submit(Command::Refresh).await?;
//! roster.changed().await.ok();
//! println!("{} clients", roster.borrow().entries().len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod command;
mod config;
mod engine;
mod error;
mod event;
mod pipeline;
mod remote;
mod selection;
mod store;
mod views;

pub use command::Command;
pub use config::{ConfigError, EngineConfig, SimulationConfig};
pub use engine::{Engine, EngineHandle, EngineStopped};
pub use error::{CommandFailure, RemoteError, SyncError};
pub use event::ChangeEvent;
pub use remote::{DriftConfig, DriftGenerator, MemoryRemote, RemoteStore, fixtures};
pub use selection::{SelectionCoordinator, SelectionState};
pub use store::EntityStore;
pub use views::{ClientEntry, ClientRoster, FreePool};
