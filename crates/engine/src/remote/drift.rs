//! Background drift: an uncoordinated writer mutating the remote store.
//!
//! Models "another actor changed shared state concurrently": at a fixed
//! interval the generator rolls dice and adds, edits, or removes users,
//! cars, or bindings directly against the remote, never notifying the
//! engine. Mutation failures are expected (it may, for example, try to
//! assign an already-held car) and are ignored.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::debug;

use motorpool_core::{CarDraft, Email, UserDraft};

use super::{RemoteStore, fixtures};

/// Tuning for the drift generator.
#[derive(Debug, Clone)]
pub struct DriftConfig {
    /// How often a drift step runs.
    pub interval: Duration,
    /// Fixed RNG seed for deterministic runs; random otherwise.
    pub seed: Option<u64>,
    /// Population size the binding count drifts toward.
    pub target_bindings: usize,
    /// Population size the user count drifts toward.
    pub target_users: usize,
    /// Population size the car count drifts toward.
    pub target_cars: usize,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            seed: None,
            target_bindings: 5,
            target_users: 10,
            target_cars: 10,
        }
    }
}

/// Probability of adding rather than removing, shaped so the population
/// drifts toward `target`: full add pressure when empty, none at target.
/// `other` is the probability mass reserved for a third outcome (update).
fn add_probability(target: usize, current: usize, other: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let (target_f, current_f) = (target as f64, current as f64);
    (target_f - current_f) / target_f * (1.0 - other)
}

/// The uncoordinated background writer.
pub struct DriftGenerator<R> {
    remote: R,
    rng: StdRng,
    config: DriftConfig,
}

impl<R: RemoteStore> DriftGenerator<R> {
    /// Create a generator over the given remote.
    #[must_use]
    pub fn new(remote: R, config: DriftConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            remote,
            rng,
            config,
        }
    }

    /// Run forever on the configured interval.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(self.config.interval);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately; skip it so the engine can
            // seed from an undisturbed snapshot.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                self.step().await;
            }
        })
    }

    /// Run exactly one drift step. 10% chance each of touching bindings,
    /// users, or cars; otherwise the store is left alone.
    pub async fn step(&mut self) {
        let roll: f64 = self.rng.random();
        if roll < 0.1 {
            self.jumble_bindings().await;
        } else if roll < 0.2 {
            self.jumble_users().await;
        } else if roll < 0.3 {
            self.jumble_cars().await;
        }
    }

    async fn jumble_bindings(&mut self) {
        let Ok(snapshot) = self.remote.fetch_snapshot().await else {
            return;
        };
        let add = add_probability(self.config.target_bindings, snapshot.bindings.len(), 0.0);
        if self.rng.random::<f64>() < add {
            let (Some(user), Some(car)) = (
                snapshot.users.choose(&mut self.rng),
                snapshot.cars.choose(&mut self.rng),
            ) else {
                return;
            };
            match self.remote.assign(user.id, car.id).await {
                Ok(_) => debug!(user = %user.id, car = %car.id, "drift: assigned"),
                Err(err) => debug!(%err, "drift: assignment rejected"),
            }
        } else if let Some(binding) = snapshot.bindings.choose(&mut self.rng) {
            match self.remote.unassign(binding.user_id, binding.car_id).await {
                Ok(()) => debug!(binding = %binding.id, "drift: unassigned"),
                Err(err) => debug!(%err, "drift: unassignment rejected"),
            }
        }
    }

    async fn jumble_users(&mut self) {
        let Ok(snapshot) = self.remote.fetch_snapshot().await else {
            return;
        };
        // A third of the mass is reserved for updates.
        let add = add_probability(self.config.target_users, snapshot.users.len(), 0.33);
        let remove = 1.0 - add - 0.33;
        let roll: f64 = self.rng.random();
        if roll < add {
            let draft = self.invent_user();
            match self.remote.create_user(draft).await {
                Ok(id) => debug!(user = %id, "drift: user added"),
                Err(err) => debug!(%err, "drift: user creation rejected"),
            }
        } else if roll < add + remove {
            if let Some(user) = snapshot.users.choose(&mut self.rng) {
                let _ = self.remote.delete_user(user.id).await;
                debug!(user = %user.id, "drift: user removed");
            }
        } else if let Some(user) = snapshot.users.choose(&mut self.rng) {
            let mut edited = user.clone();
            if self.rng.random::<f64>() < 0.5 {
                edited.first_name = pick(&mut self.rng, fixtures::FIRST_NAMES);
            } else {
                edited.last_name = pick(&mut self.rng, fixtures::LAST_NAMES);
            }
            if let Ok(email) = Email::parse(&format!(
                "{}.{}@{}",
                edited.first_name.to_lowercase(),
                edited.last_name.to_lowercase(),
                pick(&mut self.rng, fixtures::EMAIL_DOMAINS),
            )) {
                edited.email = email;
            }
            match self.remote.update_user(edited).await {
                Ok(()) => debug!(user = %user.id, "drift: user edited"),
                Err(err) => debug!(%err, "drift: user edit rejected"),
            }
        }
    }

    async fn jumble_cars(&mut self) {
        let Ok(snapshot) = self.remote.fetch_snapshot().await else {
            return;
        };
        let add = add_probability(self.config.target_cars, snapshot.cars.len(), 0.0);
        if self.rng.random::<f64>() < add {
            let draft = self.invent_car();
            match self.remote.create_car(draft).await {
                Ok(id) => debug!(car = %id, "drift: car added"),
                Err(err) => debug!(%err, "drift: car creation rejected"),
            }
        } else if let Some(car) = snapshot.cars.choose(&mut self.rng) {
            let _ = self.remote.delete_car(car.id).await;
            debug!(car = %car.id, "drift: car removed");
        }
    }

    fn invent_user(&mut self) -> UserDraft {
        let first_name = pick(&mut self.rng, fixtures::FIRST_NAMES);
        let last_name = pick(&mut self.rng, fixtures::LAST_NAMES);
        let address = format!(
            "{}.{}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            pick(&mut self.rng, fixtures::EMAIL_DOMAINS),
        );
        UserDraft {
            first_name,
            last_name,
            email: Email::parse(&address).expect("generated email is structurally valid"),
        }
    }

    fn invent_car(&mut self) -> CarDraft {
        let (make, models) = fixtures::MAKES_AND_MODELS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(("BMW", &[]));
        let model = models.choose(&mut self.rng).copied().unwrap_or("3er");
        CarDraft {
            make: make.to_owned(),
            model: model.to_owned(),
            year: self.rng.random_range(2000..=2024),
        }
    }
}

fn pick(rng: &mut StdRng, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or("x").to_owned()
}
