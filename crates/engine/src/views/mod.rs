//! Derived, denormalized views over the entity store.
//!
//! Each view is a pure left-fold: seeded by [`rebuild`](ClientRoster::rebuild)
//! from a full snapshot, then advanced one committed event at a time by
//! [`apply`](ClientRoster::apply). Both `apply` implementations are total
//! functions from one fully-consistent view value to the next - never a
//! partial in-place mutation - so any intermediate state is replayable.
//!
//! Invariant across the pair, after any fully-applied event sequence: the
//! free pool and the union of all roster car lists partition the full car
//! set.

mod pool;
mod roster;

pub use pool::FreePool;
pub use roster::{ClientEntry, ClientRoster};
