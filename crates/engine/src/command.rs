//! Typed intents flowing from the UI into the engine.

use motorpool_core::{Car, CarDraft, CarId, User, UserDraft, UserId};

/// A user-issued intent.
///
/// Data commands (everything except the selection commands and
/// [`Command::Refresh`]) are dispatched to the remote store as independent
/// in-flight operations; each produces exactly one terminal completion.
/// Selection commands and refresh are handled synchronously by the engine
/// loop itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new user.
    AddUser(UserDraft),
    /// Overwrite an existing user's fields.
    UpdateUser(User),
    /// Delete a user; their cars return to the free pool.
    RemoveUser(UserId),
    /// Create a new car.
    AddCar(CarDraft),
    /// Overwrite an existing car's fields.
    UpdateCar(Car),
    /// Delete a car wherever it currently is.
    RemoveCar(CarId),
    /// Assign a free car to a user.
    Assign {
        /// Receiving user.
        user_id: UserId,
        /// Car to assign; must be free.
        car_id: CarId,
    },
    /// Release a car back to the free pool.
    Unassign {
        /// User currently holding the car.
        user_id: UserId,
        /// Car to release.
        car_id: CarId,
    },
    /// Mark a car as the selection's car half.
    SelectCar(CarId),
    /// Mark a user as the selection's user half.
    SelectUser(UserId),
    /// Clear the selection unconditionally.
    UnselectAll,
    /// Force a full resynchronization from a fresh snapshot.
    Refresh,
}

impl Command {
    /// Stable label used to tag completions and error reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AddUser(_) => "user.add",
            Self::UpdateUser(_) => "user.update",
            Self::RemoveUser(_) => "user.remove",
            Self::AddCar(_) => "car.add",
            Self::UpdateCar(_) => "car.update",
            Self::RemoveCar(_) => "car.remove",
            Self::Assign { .. } => "car.assign",
            Self::Unassign { .. } => "car.unassign",
            Self::SelectCar(_) => "selection.car",
            Self::SelectUser(_) => "selection.user",
            Self::UnselectAll => "selection.clear",
            Self::Refresh => "refresh",
        }
    }
}
