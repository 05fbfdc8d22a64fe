//! Core type definitions.
//!
//! Every entity that has been persisted carries a typed id; entities that
//! have not yet been persisted are represented by separate draft types, so
//! "does this thing have an id" is a compile-time question, never an
//! `Option` check at runtime.

mod binding;
mod car;
mod email;
mod id;
mod snapshot;
mod user;

pub use binding::Binding;
pub use car::{Car, CarDraft};
pub use email::{Email, EmailError};
pub use id::{BindingId, CarId, UserId};
pub use snapshot::Snapshot;
pub use user::{User, UserDraft};
