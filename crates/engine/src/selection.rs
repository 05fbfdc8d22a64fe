//! Selection coordinator: pairs a car with a user to trigger assignment.

use motorpool_core::{CarId, UserId};
use serde::Serialize;

use crate::event::ChangeEvent;

/// The observable selection state.
///
/// Both-selected is transitional and never observable: completing the pair
/// immediately requests an assignment and the state returns to `Idle`
/// without waiting for the command's outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// A car is selected, waiting for a user.
    CarSelected(CarId),
    /// A user is selected, waiting for a car.
    UserSelected(UserId),
}

/// Tracks the selection and decides when to fire an assignment.
///
/// Runs for the process lifetime; there is no terminal state.
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
}

impl SelectionCoordinator {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    /// Select a car. Returns the `(user, car)` pair to assign when this
    /// completes a selection; the state is then already back to `Idle`.
    pub fn select_car(&mut self, car_id: CarId) -> Option<(UserId, CarId)> {
        match self.state {
            SelectionState::UserSelected(user_id) => {
                self.state = SelectionState::Idle;
                Some((user_id, car_id))
            }
            SelectionState::Idle | SelectionState::CarSelected(_) => {
                self.state = SelectionState::CarSelected(car_id);
                None
            }
        }
    }

    /// Select a user. Returns the `(user, car)` pair to assign when this
    /// completes a selection; the state is then already back to `Idle`.
    pub fn select_user(&mut self, user_id: UserId) -> Option<(UserId, CarId)> {
        match self.state {
            SelectionState::CarSelected(car_id) => {
                self.state = SelectionState::Idle;
                Some((user_id, car_id))
            }
            SelectionState::Idle | SelectionState::UserSelected(_) => {
                self.state = SelectionState::UserSelected(user_id);
                None
            }
        }
    }

    /// Clear the selection unconditionally.
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Drop the selection if this committed event removed, edited, or
    /// reassigned the selected entity. Returns whether the state changed.
    pub fn invalidate_on(&mut self, event: &ChangeEvent) -> bool {
        let invalidated = match self.state {
            SelectionState::Idle => false,
            SelectionState::CarSelected(selected) => match event {
                ChangeEvent::CarRemoved(car_id) => *car_id == selected,
                ChangeEvent::CarUpdated(car)
                | ChangeEvent::Assigned { car, .. }
                | ChangeEvent::Unassigned { car, .. } => car.id == selected,
                _ => false,
            },
            SelectionState::UserSelected(selected) => match event {
                ChangeEvent::UserRemoved { user_id, .. } => *user_id == selected,
                ChangeEvent::UserUpdated(user) => user.id == selected,
                _ => false,
            },
        };
        if invalidated {
            self.state = SelectionState::Idle;
        }
        invalidated
    }
}
