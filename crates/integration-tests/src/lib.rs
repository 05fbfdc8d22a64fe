//! Integration test harness for Motorpool.
//!
//! Drives a real engine over a zero-latency in-memory remote. The remote
//! handle doubles as the "external writer": tests mutate it directly to
//! simulate drift happening behind the engine's back.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p motorpool-integration-tests
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use motorpool_core::{CarId, Snapshot, UserId};
use motorpool_engine::{
    ClientRoster, Engine, EngineConfig, EngineHandle, FreePool, MemoryRemote, fixtures,
};

/// A running engine plus direct access to the remote behind it.
pub struct TestContext {
    /// The remote store; mutate it directly to simulate drift.
    pub remote: MemoryRemote,
    /// Handle to the running engine.
    pub engine: EngineHandle,
}

impl TestContext {
    /// Spawn an engine over a seeded zero-latency remote and wait until the
    /// initial snapshot has populated the views.
    pub async fn seeded() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    /// Same as [`seeded`](Self::seeded) with a custom engine config.
    pub async fn with_config(config: EngineConfig) -> Self {
        let remote = MemoryRemote::seeded(fixtures::seed_snapshot(), Duration::ZERO);
        let engine = Engine::spawn(remote.clone(), config);
        let mut roster = engine.roster();
        within(roster.wait_for(|r| !r.entries().is_empty()))
            .await
            .expect("engine alive");
        Self { remote, engine }
    }

    /// Current roster value.
    #[must_use]
    pub fn roster(&self) -> ClientRoster {
        self.engine.roster().borrow().clone()
    }

    /// Current pool value.
    #[must_use]
    pub fn pool(&self) -> FreePool {
        self.engine.free_pool().borrow().clone()
    }
}

/// Await a future, panicking if it takes unreasonably long.
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("future within deadline")
}

/// Order-insensitive shape of a roster: user ids with their sorted car ids.
#[must_use]
pub fn normalized_roster(roster: &ClientRoster) -> Vec<(UserId, Vec<CarId>)> {
    let mut entries: Vec<(UserId, Vec<CarId>)> = roster
        .entries()
        .iter()
        .map(|entry| {
            let mut cars: Vec<CarId> = entry.cars.iter().map(|c| c.id).collect();
            cars.sort();
            (entry.user.id, cars)
        })
        .collect();
    entries.sort();
    entries
}

/// Order-insensitive shape of a pool: sorted car ids.
#[must_use]
pub fn normalized_pool(pool: &FreePool) -> Vec<CarId> {
    let mut cars: Vec<CarId> = pool.cars().iter().map(|c| c.id).collect();
    cars.sort();
    cars
}

/// Assert the disjointness invariant: the pool and the roster car lists are
/// disjoint, and together they cover exactly the snapshot's car set.
pub fn assert_car_partition(roster: &ClientRoster, pool: &FreePool, snapshot: &Snapshot) {
    let assigned: HashSet<CarId> = roster.assigned_cars().map(|c| c.id).collect();
    let free: HashSet<CarId> = pool.cars().iter().map(|c| c.id).collect();
    assert!(
        assigned.is_disjoint(&free),
        "a car is both assigned and free"
    );

    let all: HashSet<CarId> = snapshot.cars.iter().map(|c| c.id).collect();
    let union: HashSet<CarId> = assigned.union(&free).copied().collect();
    assert_eq!(union, all, "pool and roster together must cover every car");
}
