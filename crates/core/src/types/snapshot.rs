//! Full-state snapshot of the remote store, with the client-side joins
//! used to seed the derived views.

use serde::{Deserialize, Serialize};

use super::binding::Binding;
use super::car::Car;
use super::id::UserId;
use super::user::User;

/// The complete remote state at one point in time.
///
/// Fetched at startup and on every recovery refresh; the derived views are
/// rebuilt from it with the joins below and thereafter patched incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// All users.
    pub users: Vec<User>,
    /// All cars, assigned or not.
    pub cars: Vec<Car>,
    /// All active assignments.
    pub bindings: Vec<Binding>,
}

impl Snapshot {
    /// Cars currently bound to the given user.
    ///
    /// Bindings whose car no longer exists are skipped; the remote cascades
    /// binding removal on car deletion, so such bindings only appear when a
    /// snapshot is torn, and dropping them keeps the join total.
    #[must_use]
    pub fn cars_for(&self, user_id: UserId) -> Vec<Car> {
        self.bindings
            .iter()
            .filter(|binding| binding.user_id == user_id)
            .filter_map(|binding| self.cars.iter().find(|car| car.id == binding.car_id))
            .cloned()
            .collect()
    }

    /// Cars with no active binding.
    #[must_use]
    pub fn free_cars(&self) -> Vec<Car> {
        self.cars
            .iter()
            .filter(|car| {
                !self
                    .bindings
                    .iter()
                    .any(|binding| binding.car_id == car.id)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BindingId, CarDraft, CarId, Email, UserDraft};

    fn sample_user(email: &str) -> User {
        UserDraft {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: Email::parse(email).unwrap(),
        }
        .with_id(UserId::generate())
    }

    fn sample_car(model: &str) -> Car {
        CarDraft {
            make: "Make".into(),
            model: model.into(),
            year: 2020,
        }
        .with_id(CarId::generate())
    }

    fn bind(user: &User, car: &Car) -> Binding {
        Binding {
            id: BindingId::generate(),
            user_id: user.id,
            car_id: car.id,
        }
    }

    #[test]
    fn test_cars_for_returns_only_bound_cars() {
        let user = sample_user("a@example.com");
        let other = sample_user("b@example.com");
        let bound = sample_car("bound");
        let free = sample_car("free");

        let snapshot = Snapshot {
            users: vec![user.clone(), other.clone()],
            cars: vec![bound.clone(), free],
            bindings: vec![bind(&user, &bound)],
        };

        assert_eq!(snapshot.cars_for(user.id), vec![bound]);
        assert!(snapshot.cars_for(other.id).is_empty());
    }

    #[test]
    fn test_free_cars_excludes_bound_cars() {
        let user = sample_user("a@example.com");
        let bound = sample_car("bound");
        let free = sample_car("free");

        let snapshot = Snapshot {
            users: vec![user.clone()],
            cars: vec![bound.clone(), free.clone()],
            bindings: vec![bind(&user, &bound)],
        };

        assert_eq!(snapshot.free_cars(), vec![free]);
    }

    #[test]
    fn test_cars_for_skips_dangling_bindings() {
        let user = sample_user("a@example.com");
        let gone = sample_car("gone");

        let snapshot = Snapshot {
            users: vec![user.clone()],
            cars: vec![],
            bindings: vec![bind(&user, &gone)],
        };

        assert!(snapshot.cars_for(user.id).is_empty());
    }
}
