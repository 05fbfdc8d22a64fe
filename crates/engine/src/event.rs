//! Successful command completions, as seen by the view reducers.

use motorpool_core::{BindingId, Car, CarId, User, UserId};

/// A committed remote mutation, tagged by kind so each reducer can
/// discriminate without knowing which call site issued the command.
///
/// Events carry everything a reducer needs to patch its view without
/// re-fetching: user removal carries the cars it freed, assignment carries
/// the full car so the roster can display it.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A user was created.
    UserAdded(User),
    /// A user's fields changed.
    UserUpdated(User),
    /// A user was deleted; `freed` are the cars their bindings released.
    UserRemoved {
        /// The deleted user.
        user_id: UserId,
        /// Cars that were bound to the user and are now free.
        freed: Vec<Car>,
    },
    /// A car was created (always free at creation).
    CarAdded(Car),
    /// A car's fields changed.
    CarUpdated(Car),
    /// A car was deleted, wherever it was.
    CarRemoved(CarId),
    /// A car was assigned to a user.
    Assigned {
        /// The new binding's id.
        binding_id: BindingId,
        /// Receiving user.
        user_id: UserId,
        /// The assigned car.
        car: Car,
    },
    /// A car was released from a user.
    Unassigned {
        /// The user that held the car.
        user_id: UserId,
        /// The released car.
        car: Car,
    },
}
