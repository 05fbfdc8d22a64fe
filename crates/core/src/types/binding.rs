//! The join record assigning a car to a user.

use serde::{Deserialize, Serialize};

use super::id::{BindingId, CarId, UserId};

/// An active car-to-user assignment.
///
/// Invariant (enforced by the remote store): a car appears in at most one
/// binding at a time. A user may hold any number of bindings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Binding {
    /// Store-assigned identifier.
    pub id: BindingId,
    /// The user holding the car.
    pub user_id: UserId,
    /// The assigned car.
    pub car_id: CarId,
}
