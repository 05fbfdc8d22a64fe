//! In-memory remote store with simulated latency and failure injection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use motorpool_core::{
    Binding, BindingId, Car, CarDraft, CarId, Snapshot, User, UserDraft, UserId,
};
use tokio::sync::Mutex;

use super::RemoteStore;
use crate::error::RemoteError;

/// An in-memory [`RemoteStore`] standing in for a real backend.
///
/// Every operation sleeps for the configured latency before touching state,
/// so many calls can be in flight at once and complete out of issuance
/// order. Cheap to clone; clones share the same underlying state, which is
/// how external writers (the drift generator, tests) mutate the store
/// behind the engine's back.
#[derive(Clone)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    latency: Duration,
    unavailable: AtomicBool,
    snapshot_fetches: AtomicU64,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    cars: Vec<Car>,
    bindings: Vec<Binding>,
}

impl MemoryRemote {
    /// An empty store with no latency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// An empty store with the given per-operation latency.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                latency,
                unavailable: AtomicBool::new(false),
                snapshot_fetches: AtomicU64::new(0),
            }),
        }
    }

    /// A store pre-populated with the given snapshot.
    #[must_use]
    pub fn seeded(snapshot: Snapshot, latency: Duration) -> Self {
        let remote = Self::with_latency(latency);
        {
            let mut state = remote
                .inner
                .state
                .try_lock()
                .expect("state is unshared during construction");
            state.users = snapshot.users;
            state.cars = snapshot.cars;
            state.bindings = snapshot.bindings;
        }
        remote
    }

    /// Toggle failure injection: while unavailable, every operation fails
    /// with [`RemoteError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many full snapshots have been fetched so far.
    #[must_use]
    pub fn snapshot_fetches(&self) -> u64 {
        self.inner.snapshot_fetches.load(Ordering::SeqCst)
    }

    /// Simulate transit time, then check availability.
    async fn reach(&self) -> Result<(), RemoteError> {
        if !self.inner.latency.is_zero() {
            tokio::time::sleep(self.inner.latency).await;
        }
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable);
        }
        Ok(())
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryRemote {
    async fn create_user(&self, draft: UserDraft) -> Result<UserId, RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        if state.users.iter().any(|u| u.email == draft.email) {
            return Err(RemoteError::DuplicateEmail(draft.email));
        }
        let id = UserId::generate();
        state.users.push(draft.with_id(id));
        Ok(id)
    }

    async fn update_user(&self, user: User) -> Result<(), RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        let Some(existing) = state.users.iter_mut().find(|u| u.id == user.id) else {
            return Err(RemoteError::UserNotFound(user.id));
        };
        *existing = user;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        state.users.retain(|u| u.id != id);
        state.bindings.retain(|b| b.user_id != id);
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RemoteError> {
        self.reach().await?;
        let state = self.inner.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_car(&self, draft: CarDraft) -> Result<CarId, RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        let id = CarId::generate();
        state.cars.push(draft.with_id(id));
        Ok(id)
    }

    async fn update_car(&self, car: Car) -> Result<(), RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        let Some(existing) = state.cars.iter_mut().find(|c| c.id == car.id) else {
            return Err(RemoteError::CarNotFound(car.id));
        };
        *existing = car;
        Ok(())
    }

    async fn delete_car(&self, id: CarId) -> Result<(), RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        state.cars.retain(|c| c.id != id);
        state.bindings.retain(|b| b.car_id != id);
        Ok(())
    }

    async fn get_car(&self, id: CarId) -> Result<Option<Car>, RemoteError> {
        self.reach().await?;
        let state = self.inner.state.lock().await;
        Ok(state.cars.iter().find(|c| c.id == id).cloned())
    }

    async fn cars_for_user(&self, id: UserId) -> Result<Vec<Car>, RemoteError> {
        self.reach().await?;
        let state = self.inner.state.lock().await;
        Ok(state
            .bindings
            .iter()
            .filter(|b| b.user_id == id)
            .filter_map(|b| state.cars.iter().find(|c| c.id == b.car_id))
            .cloned()
            .collect())
    }

    async fn assign(&self, user_id: UserId, car_id: CarId) -> Result<BindingId, RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        if let Some(binding) = state.bindings.iter().find(|b| b.car_id == car_id) {
            return Err(RemoteError::CarAlreadyAssigned {
                car_id,
                user_id: binding.user_id,
            });
        }
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(RemoteError::UserNotFound(user_id));
        }
        if !state.cars.iter().any(|c| c.id == car_id) {
            return Err(RemoteError::CarNotFound(car_id));
        }
        let id = BindingId::generate();
        state.bindings.push(Binding {
            id,
            user_id,
            car_id,
        });
        Ok(id)
    }

    async fn unassign(&self, user_id: UserId, car_id: CarId) -> Result<(), RemoteError> {
        self.reach().await?;
        let mut state = self.inner.state.lock().await;
        let before = state.bindings.len();
        state
            .bindings
            .retain(|b| !(b.user_id == user_id && b.car_id == car_id));
        if state.bindings.len() == before {
            return Err(RemoteError::NotAssigned { car_id, user_id });
        }
        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, RemoteError> {
        self.reach().await?;
        self.inner.snapshot_fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.inner.state.lock().await;
        Ok(Snapshot {
            users: state.users.clone(),
            cars: state.cars.clone(),
            bindings: state.bindings.clone(),
        })
    }
}
