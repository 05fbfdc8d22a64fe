//! The client roster: every user together with the cars they hold.

use motorpool_core::{Car, Snapshot, User, UserId};
use serde::Serialize;

use crate::event::ChangeEvent;

/// One roster row: a user and the cars currently assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientEntry {
    /// The user.
    pub user: User,
    /// Cars bound to the user; order irrelevant.
    pub cars: Vec<Car>,
}

/// The full roster, one entry per existing user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientRoster {
    entries: Vec<ClientEntry>,
}

impl ClientRoster {
    /// Seed the roster from a full snapshot by joining bindings against
    /// users and cars.
    #[must_use]
    pub fn rebuild(snapshot: &Snapshot) -> Self {
        Self {
            entries: snapshot
                .users
                .iter()
                .map(|user| ClientEntry {
                    user: user.clone(),
                    cars: snapshot.cars_for(user.id),
                })
                .collect(),
        }
    }

    /// Advance the roster by one committed event.
    #[must_use]
    pub fn apply(&self, event: &ChangeEvent) -> Self {
        let entries = match event {
            ChangeEvent::UserAdded(user) => {
                let mut entries = self.entries.clone();
                entries.push(ClientEntry {
                    user: user.clone(),
                    cars: Vec::new(),
                });
                entries
            }
            ChangeEvent::UserUpdated(user) => self
                .entries
                .iter()
                .map(|entry| {
                    if entry.user.id == user.id {
                        ClientEntry {
                            user: user.clone(),
                            cars: entry.cars.clone(),
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
            ChangeEvent::UserRemoved { user_id, .. } => self
                .entries
                .iter()
                .filter(|entry| entry.user.id != *user_id)
                .cloned()
                .collect(),
            ChangeEvent::CarAdded(_) => self.entries.clone(),
            ChangeEvent::CarUpdated(car) => self
                .entries
                .iter()
                .map(|entry| ClientEntry {
                    user: entry.user.clone(),
                    cars: entry
                        .cars
                        .iter()
                        .map(|c| if c.id == car.id { car.clone() } else { c.clone() })
                        .collect(),
                })
                .collect(),
            ChangeEvent::CarRemoved(car_id) => self
                .entries
                .iter()
                .map(|entry| ClientEntry {
                    user: entry.user.clone(),
                    cars: entry
                        .cars
                        .iter()
                        .filter(|c| c.id != *car_id)
                        .cloned()
                        .collect(),
                })
                .collect(),
            ChangeEvent::Assigned { user_id, car, .. } => self
                .entries
                .iter()
                .map(|entry| {
                    if entry.user.id == *user_id {
                        let mut cars = entry.cars.clone();
                        cars.push(car.clone());
                        ClientEntry {
                            user: entry.user.clone(),
                            cars,
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
            ChangeEvent::Unassigned { user_id, car } => self
                .entries
                .iter()
                .map(|entry| {
                    if entry.user.id == *user_id {
                        ClientEntry {
                            user: entry.user.clone(),
                            cars: entry
                                .cars
                                .iter()
                                .filter(|c| c.id != car.id)
                                .cloned()
                                .collect(),
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        };
        Self { entries }
    }

    /// All roster rows.
    #[must_use]
    pub fn entries(&self) -> &[ClientEntry] {
        &self.entries
    }

    /// The roster row for one user, if present.
    #[must_use]
    pub fn entry_for(&self, user_id: UserId) -> Option<&ClientEntry> {
        self.entries.iter().find(|entry| entry.user.id == user_id)
    }

    /// Every assigned car, across all entries.
    pub fn assigned_cars(&self) -> impl Iterator<Item = &Car> {
        self.entries.iter().flat_map(|entry| entry.cars.iter())
    }
}
