//! Remote store contract and its simulated implementations.
//!
//! The engine never touches entity storage directly; every mutation and
//! lookup goes through [`RemoteStore`], completes asynchronously with
//! bounded latency, and can fail with a [`RemoteError`](crate::RemoteError).
//! The store may also be mutated from outside the engine (see
//! [`drift::DriftGenerator`]); the engine only learns of such drift
//! indirectly, through inconsistent results of its own later operations.

mod drift;
pub mod fixtures;
mod memory;

pub use drift::{DriftConfig, DriftGenerator};
pub use memory::MemoryRemote;

use core::future::Future;

use motorpool_core::{
    BindingId, Car, CarDraft, CarId, Snapshot, User, UserDraft, UserId,
};

use crate::error::RemoteError;

/// The asynchronous entity-store contract.
///
/// Implementations must have bounded latency: every call eventually
/// resolves, or the refresh protocol cannot recover.
pub trait RemoteStore: Send + Sync + 'static {
    /// Create a user; the store assigns the id. Fails with
    /// [`RemoteError::DuplicateEmail`] if the email is taken.
    fn create_user(
        &self,
        draft: UserDraft,
    ) -> impl Future<Output = Result<UserId, RemoteError>> + Send;

    /// Overwrite an existing user's fields.
    fn update_user(&self, user: User) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete a user and cascade-remove all their bindings. Deleting an
    /// unknown user is a no-op.
    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Look up one user.
    fn get_user(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, RemoteError>> + Send;

    /// Create a car; the store assigns the id.
    fn create_car(
        &self,
        draft: CarDraft,
    ) -> impl Future<Output = Result<CarId, RemoteError>> + Send;

    /// Overwrite an existing car's fields.
    fn update_car(&self, car: Car) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete a car and cascade-remove any binding referencing it.
    /// Deleting an unknown car is a no-op.
    fn delete_car(&self, id: CarId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Look up one car.
    fn get_car(&self, id: CarId) -> impl Future<Output = Result<Option<Car>, RemoteError>> + Send;

    /// All cars currently bound to the given user.
    fn cars_for_user(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Vec<Car>, RemoteError>> + Send;

    /// Bind a car to a user. Fails if the car is already held, or if
    /// either endpoint does not exist.
    fn assign(
        &self,
        user_id: UserId,
        car_id: CarId,
    ) -> impl Future<Output = Result<BindingId, RemoteError>> + Send;

    /// Remove the binding between a user and a car.
    fn unassign(
        &self,
        user_id: UserId,
        car_id: CarId,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Read the complete current state.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, RemoteError>> + Send;
}
