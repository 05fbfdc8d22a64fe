//! The free-car pool: every car with no active binding.

use motorpool_core::{Car, CarId, Snapshot};
use serde::Serialize;

use crate::event::ChangeEvent;

/// The set of unassigned cars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FreePool {
    cars: Vec<Car>,
}

impl FreePool {
    /// Seed the pool from a full snapshot.
    #[must_use]
    pub fn rebuild(snapshot: &Snapshot) -> Self {
        Self {
            cars: snapshot.free_cars(),
        }
    }

    /// Advance the pool by one committed event.
    #[must_use]
    pub fn apply(&self, event: &ChangeEvent) -> Self {
        let cars = match event {
            ChangeEvent::CarAdded(car) => {
                let mut cars = self.cars.clone();
                cars.push(car.clone());
                cars
            }
            ChangeEvent::CarUpdated(car) => self
                .cars
                .iter()
                .map(|c| if c.id == car.id { car.clone() } else { c.clone() })
                .collect(),
            ChangeEvent::CarRemoved(car_id) => self
                .cars
                .iter()
                .filter(|c| c.id != *car_id)
                .cloned()
                .collect(),
            ChangeEvent::Assigned { car, .. } => self
                .cars
                .iter()
                .filter(|c| c.id != car.id)
                .cloned()
                .collect(),
            ChangeEvent::Unassigned { car, .. } => {
                let mut cars = self.cars.clone();
                cars.push(car.clone());
                cars
            }
            ChangeEvent::UserRemoved { freed, .. } => {
                let mut cars = self.cars.clone();
                cars.extend(freed.iter().cloned());
                cars
            }
            ChangeEvent::UserAdded(_) | ChangeEvent::UserUpdated(_) => self.cars.clone(),
        };
        Self { cars }
    }

    /// The free cars; order irrelevant.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Whether the pool currently holds this car.
    #[must_use]
    pub fn contains(&self, car_id: CarId) -> bool {
        self.cars.iter().any(|c| c.id == car_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use motorpool_core::{Binding, BindingId, CarDraft, Email, UserDraft, UserId};

    use super::*;

    fn car(model: &str) -> Car {
        CarDraft {
            make: "Make".into(),
            model: model.into(),
            year: 2020,
        }
        .with_id(CarId::generate())
    }

    #[test]
    fn test_rebuild_keeps_only_unbound_cars() {
        let user = UserDraft {
            first_name: "Test".into(),
            last_name: "User".into(),
            email: Email::parse("a@example.com").unwrap(),
        }
        .with_id(UserId::generate());
        let bound = car("bound");
        let free = car("free");

        let pool = FreePool::rebuild(&Snapshot {
            users: vec![user.clone()],
            cars: vec![bound.clone(), free.clone()],
            bindings: vec![Binding {
                id: BindingId::generate(),
                user_id: user.id,
                car_id: bound.id,
            }],
        });

        assert_eq!(pool.cars(), &[free]);
    }

    #[test]
    fn test_car_lifecycle_in_pool() {
        let c = car("one");
        let pool = FreePool::default().apply(&ChangeEvent::CarAdded(c.clone()));
        assert!(pool.contains(c.id));

        let mut facelift = c.clone();
        facelift.year = 2024;
        let pool = pool.apply(&ChangeEvent::CarUpdated(facelift.clone()));
        assert_eq!(pool.cars(), &[facelift]);

        let pool = pool.apply(&ChangeEvent::CarRemoved(c.id));
        assert!(!pool.contains(c.id));
    }

    #[test]
    fn test_assignment_moves_car_out_and_back() {
        let c = car("one");
        let user_id = UserId::generate();
        let pool = FreePool::default().apply(&ChangeEvent::CarAdded(c.clone()));

        let pool = pool.apply(&ChangeEvent::Assigned {
            binding_id: BindingId::generate(),
            user_id,
            car: c.clone(),
        });
        assert!(!pool.contains(c.id));

        let pool = pool.apply(&ChangeEvent::Unassigned {
            user_id,
            car: c.clone(),
        });
        assert!(pool.contains(c.id));
    }

    #[test]
    fn test_user_removal_frees_their_cars() {
        let freed = vec![car("one"), car("two")];
        let pool = FreePool::default().apply(&ChangeEvent::UserRemoved {
            user_id: UserId::generate(),
            freed: freed.clone(),
        });
        assert_eq!(pool.cars(), freed.as_slice());
    }
}
