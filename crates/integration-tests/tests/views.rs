//! View maintenance properties: disjointness, incremental-equals-rebuild,
//! deletion cascades, and conflict rejection.

use motorpool_core::CarDraft;
use motorpool_engine::{Command, RemoteStore, SyncError};
use motorpool_integration_tests::{
    TestContext, assert_car_partition, normalized_pool, normalized_roster, within,
};

/// After every settled command the pool and the roster partition the car set.
#[tokio::test]
async fn disjointness_holds_across_a_command_sequence() {
    let ctx = TestContext::seeded().await;
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    let user = snapshot.users.first().expect("seeded user").clone();
    let car = snapshot.cars.first().expect("seeded car").clone();

    assert_car_partition(&ctx.roster(), &ctx.pool(), &snapshot);

    // Assign
    ctx.engine
        .submit(Command::Assign {
            user_id: user.id,
            car_id: car.id,
        })
        .await
        .expect("submit");
    let mut roster = ctx.engine.roster();
    within(roster.wait_for(|r| {
        r.entry_for(user.id)
            .is_some_and(|entry| !entry.cars.is_empty())
    }))
    .await
    .expect("assignment applied");
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    assert_car_partition(&ctx.roster(), &ctx.pool(), &snapshot);

    // Add a car
    ctx.engine
        .submit(Command::AddCar(CarDraft {
            make: "Volvo".into(),
            model: "XC60".into(),
            year: 2022,
        }))
        .await
        .expect("submit");
    let mut pool = ctx.engine.free_pool();
    within(pool.wait_for(|p| p.cars().iter().any(|c| c.model == "XC60")))
        .await
        .expect("car added");
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    assert_car_partition(&ctx.roster(), &ctx.pool(), &snapshot);

    // Unassign
    ctx.engine
        .submit(Command::Unassign {
            user_id: user.id,
            car_id: car.id,
        })
        .await
        .expect("submit");
    within(roster.wait_for(|r| {
        r.entry_for(user.id)
            .is_some_and(|entry| entry.cars.is_empty())
    }))
    .await
    .expect("unassignment applied");
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    assert_car_partition(&ctx.roster(), &ctx.pool(), &snapshot);
}

/// The incrementally patched views equal the views rebuilt from a fresh
/// snapshot reflecting the same committed mutations.
#[tokio::test]
async fn incremental_patching_equals_full_rebuild() {
    let ctx = TestContext::seeded().await;
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    let user = snapshot.users.first().expect("seeded user").clone();
    let cars: Vec<_> = snapshot.cars.iter().take(2).cloned().collect();

    for car in &cars {
        ctx.engine
            .submit(Command::Assign {
                user_id: user.id,
                car_id: car.id,
            })
            .await
            .expect("submit");
    }
    let mut roster = ctx.engine.roster();
    within(roster.wait_for(|r| r.entry_for(user.id).is_some_and(|e| e.cars.len() == 2)))
        .await
        .expect("assignments applied");

    let patched_roster = normalized_roster(&ctx.roster());
    let patched_pool = normalized_pool(&ctx.pool());

    // Discard and rebuild from a fresh snapshot of the same remote state.
    let fetches_before = ctx.remote.snapshot_fetches();
    ctx.engine.submit(Command::Refresh).await.expect("submit");
    let mut pool = ctx.engine.free_pool();
    within(pool.wait_for(|_| ctx.remote.snapshot_fetches() > fetches_before))
        .await
        .expect("refresh applied");

    assert_eq!(normalized_roster(&ctx.roster()), patched_roster);
    assert_eq!(normalized_pool(&ctx.pool()), patched_pool);
}

/// Deleting a user removes their roster entry and frees their cars.
#[tokio::test]
async fn user_deletion_frees_their_cars() {
    let ctx = TestContext::seeded().await;
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    let user = snapshot.users.first().expect("seeded user").clone();
    let cars: Vec<_> = snapshot.cars.iter().take(2).cloned().collect();

    for car in &cars {
        ctx.engine
            .submit(Command::Assign {
                user_id: user.id,
                car_id: car.id,
            })
            .await
            .expect("submit");
    }
    let mut roster = ctx.engine.roster();
    within(roster.wait_for(|r| r.entry_for(user.id).is_some_and(|e| e.cars.len() == 2)))
        .await
        .expect("assignments applied");

    ctx.engine
        .submit(Command::RemoveUser(user.id))
        .await
        .expect("submit");
    within(roster.wait_for(|r| r.entry_for(user.id).is_none()))
        .await
        .expect("user removed");

    let pool = ctx.pool();
    for car in &cars {
        assert!(pool.contains(car.id), "freed car must return to the pool");
    }
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    assert_car_partition(&ctx.roster(), &ctx.pool(), &snapshot);
}

/// Deleting an assigned car removes it everywhere.
#[tokio::test]
async fn car_deletion_removes_it_from_roster_and_pool() {
    let ctx = TestContext::seeded().await;
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    let user = snapshot.users.first().expect("seeded user").clone();
    let car = snapshot.cars.first().expect("seeded car").clone();

    ctx.engine
        .submit(Command::Assign {
            user_id: user.id,
            car_id: car.id,
        })
        .await
        .expect("submit");
    let mut roster = ctx.engine.roster();
    within(roster.wait_for(|r| r.entry_for(user.id).is_some_and(|e| !e.cars.is_empty())))
        .await
        .expect("assignment applied");

    ctx.engine
        .submit(Command::RemoveCar(car.id))
        .await
        .expect("submit");
    within(roster.wait_for(|r| {
        r.entry_for(user.id)
            .is_some_and(|entry| entry.cars.is_empty())
    }))
    .await
    .expect("car removed");

    assert!(!ctx.pool().contains(car.id));
    assert!(ctx.roster().assigned_cars().all(|c| c.id != car.id));
}

/// Double assignment is rejected as a conflict and patches nothing.
#[tokio::test]
async fn double_assignment_is_rejected_without_patching() {
    let ctx = TestContext::seeded().await;
    let snapshot = ctx.remote.fetch_snapshot().await.expect("snapshot");
    let first = snapshot.users.first().expect("seeded user").clone();
    let second = snapshot.users.get(1).expect("seeded user").clone();
    let car = snapshot.cars.first().expect("seeded car").clone();

    ctx.engine
        .submit(Command::Assign {
            user_id: first.id,
            car_id: car.id,
        })
        .await
        .expect("submit");
    let mut roster = ctx.engine.roster();
    within(roster.wait_for(|r| r.entry_for(first.id).is_some_and(|e| !e.cars.is_empty())))
        .await
        .expect("assignment applied");

    let roster_before = normalized_roster(&ctx.roster());
    let pool_before = normalized_pool(&ctx.pool());

    ctx.engine
        .submit(Command::Assign {
            user_id: second.id,
            car_id: car.id,
        })
        .await
        .expect("submit");
    let mut errors = ctx.engine.errors();
    let failure = within(errors.wait_for(|f| f.is_some()))
        .await
        .expect("failure published")
        .clone()
        .expect("failure present");

    assert!(matches!(failure.error, SyncError::DomainConflict(_)));
    assert_eq!(normalized_roster(&ctx.roster()), roster_before);
    assert_eq!(normalized_pool(&ctx.pool()), pool_before);
}
