//! Normalized mirror of the last-known-true remote state.

use std::collections::HashMap;

use motorpool_core::{Binding, BindingId, Car, CarId, Snapshot, User, UserId};

use crate::event::ChangeEvent;

/// The engine's authoritative local mirror of the remote collections.
///
/// Owned exclusively by the engine task. Updated only from acknowledged
/// results - either a committed [`ChangeEvent`] or a wholesale replacement
/// from a fresh snapshot - so downstream consumers never observe an
/// optimistic write-ahead.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    users: HashMap<UserId, User>,
    cars: HashMap<CarId, Car>,
    bindings: HashMap<BindingId, Binding>,
}

impl EntityStore {
    /// Replace the entire mirror with a fresh snapshot.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.users = snapshot.users.into_iter().map(|u| (u.id, u)).collect();
        self.cars = snapshot.cars.into_iter().map(|c| (c.id, c)).collect();
        self.bindings = snapshot.bindings.into_iter().map(|b| (b.id, b)).collect();
    }

    /// Fold one committed mutation into the mirror.
    pub fn apply(&mut self, event: &ChangeEvent) {
        match event {
            ChangeEvent::UserAdded(user) | ChangeEvent::UserUpdated(user) => {
                self.users.insert(user.id, user.clone());
            }
            ChangeEvent::UserRemoved { user_id, .. } => {
                self.users.remove(user_id);
                self.bindings.retain(|_, binding| binding.user_id != *user_id);
            }
            ChangeEvent::CarAdded(car) | ChangeEvent::CarUpdated(car) => {
                self.cars.insert(car.id, car.clone());
            }
            ChangeEvent::CarRemoved(car_id) => {
                self.cars.remove(car_id);
                self.bindings.retain(|_, binding| binding.car_id != *car_id);
            }
            ChangeEvent::Assigned {
                binding_id,
                user_id,
                car,
            } => {
                self.cars.insert(car.id, car.clone());
                self.bindings.insert(
                    *binding_id,
                    Binding {
                        id: *binding_id,
                        user_id: *user_id,
                        car_id: car.id,
                    },
                );
            }
            ChangeEvent::Unassigned { user_id, car } => {
                self.cars.insert(car.id, car.clone());
                self.bindings
                    .retain(|_, binding| !(binding.user_id == *user_id && binding.car_id == car.id));
            }
        }
    }

    /// Immutable copy of the current mirror.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.values().cloned().collect(),
            cars: self.cars.values().cloned().collect(),
            bindings: self.bindings.values().copied().collect(),
        }
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use motorpool_core::{CarDraft, Email, UserDraft};

    use super::*;

    fn user(email: &str) -> User {
        UserDraft {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: Email::parse(email).unwrap(),
        }
        .with_id(UserId::generate())
    }

    fn car(model: &str) -> Car {
        CarDraft {
            make: "Make".into(),
            model: model.into(),
            year: 2020,
        }
        .with_id(CarId::generate())
    }

    #[test]
    fn test_user_removal_cascades_bindings() {
        let mut store = EntityStore::default();
        let u = user("a@example.com");
        let c = car("one");
        let binding_id = BindingId::generate();

        store.apply(&ChangeEvent::UserAdded(u.clone()));
        store.apply(&ChangeEvent::CarAdded(c.clone()));
        store.apply(&ChangeEvent::Assigned {
            binding_id,
            user_id: u.id,
            car: c.clone(),
        });
        assert_eq!(store.snapshot().bindings.len(), 1);

        store.apply(&ChangeEvent::UserRemoved {
            user_id: u.id,
            freed: vec![c],
        });
        let snapshot = store.snapshot();
        assert!(snapshot.users.is_empty());
        assert!(snapshot.bindings.is_empty());
        assert_eq!(snapshot.cars.len(), 1, "the car itself survives");
    }

    #[test]
    fn test_car_removal_cascades_bindings() {
        let mut store = EntityStore::default();
        let u = user("a@example.com");
        let c = car("one");

        store.apply(&ChangeEvent::UserAdded(u.clone()));
        store.apply(&ChangeEvent::CarAdded(c.clone()));
        store.apply(&ChangeEvent::Assigned {
            binding_id: BindingId::generate(),
            user_id: u.id,
            car: c.clone(),
        });

        store.apply(&ChangeEvent::CarRemoved(c.id));
        let snapshot = store.snapshot();
        assert!(snapshot.cars.is_empty());
        assert!(snapshot.bindings.is_empty());
    }

    #[test]
    fn test_unassign_removes_only_that_binding() {
        let mut store = EntityStore::default();
        let u = user("a@example.com");
        let first = car("one");
        let second = car("two");

        store.apply(&ChangeEvent::UserAdded(u.clone()));
        store.apply(&ChangeEvent::Assigned {
            binding_id: BindingId::generate(),
            user_id: u.id,
            car: first.clone(),
        });
        store.apply(&ChangeEvent::Assigned {
            binding_id: BindingId::generate(),
            user_id: u.id,
            car: second.clone(),
        });

        store.apply(&ChangeEvent::Unassigned {
            user_id: u.id,
            car: first,
        });
        let snapshot = store.snapshot();
        assert_eq!(snapshot.bindings.len(), 1);
        assert_eq!(snapshot.bindings.first().unwrap().car_id, second.id);
    }

    #[test]
    fn test_replace_overwrites_everything() {
        let mut store = EntityStore::default();
        store.apply(&ChangeEvent::UserAdded(user("a@example.com")));
        store.apply(&ChangeEvent::CarAdded(car("one")));

        let fresh = Snapshot {
            users: vec![user("b@example.com")],
            cars: vec![],
            bindings: vec![],
        };
        store.replace(fresh.clone());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.users, fresh.users);
        assert!(snapshot.cars.is_empty());
    }
}
