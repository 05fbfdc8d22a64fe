//! Motorpool Core - Shared types library.
//!
//! This crate provides the common types used across all Motorpool components:
//! - `engine` - The reactive synchronization engine
//! - `cli` - Command-line demo and tooling
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no async
//! runtime, no channels. This keeps it lightweight and allows it to be used
//! anywhere, including inside reducer code that must stay side-effect free.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated emails, entities, drafts, and the
//!   full-state snapshot with its join helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
