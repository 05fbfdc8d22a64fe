//! Live demo: a real engine over the simulated remote, drift enabled.
//!
//! Streams every roster, pool, and error transition to stdout until
//! interrupted (or until `--duration-secs` elapses). Once the first
//! snapshot lands, the demo walks through the selection flow once, so an
//! assignment shows up without any manual input.

use std::time::Duration;

use clap::Args;
use thiserror::Error;

use motorpool_engine::{
    ClientRoster, Command, CommandFailure, ConfigError, DriftConfig, DriftGenerator, Engine,
    EngineConfig, EngineHandle, EngineStopped, FreePool, MemoryRemote, SimulationConfig, fixtures,
};

/// Errors the demo runner can produce.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration loading failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine task stopped unexpectedly.
    #[error(transparent)]
    Engine(#[from] EngineStopped),
}

/// Flags for `mp-cli run`; unset flags fall back to `MOTORPOOL_*`
/// environment variables, then to defaults.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Simulated remote latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Drift generator period in milliseconds
    #[arg(long)]
    drift_interval_ms: Option<u64>,

    /// Fixed drift RNG seed for reproducible runs
    #[arg(long)]
    drift_seed: Option<u64>,

    /// Disable the drift generator entirely
    #[arg(long)]
    no_drift: bool,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(long)]
    duration_secs: Option<u64>,
}

/// Run the demo.
pub async fn run(args: RunArgs) -> Result<(), RunError> {
    let mut simulation = SimulationConfig::from_env()?;
    if let Some(ms) = args.latency_ms {
        simulation.remote_latency = Duration::from_millis(ms);
    }
    if let Some(ms) = args.drift_interval_ms {
        simulation.drift_interval = Duration::from_millis(ms);
    }
    if let Some(seed) = args.drift_seed {
        simulation.drift_seed = Some(seed);
    }

    let remote = MemoryRemote::seeded(fixtures::seed_snapshot(), simulation.remote_latency);
    if args.no_drift {
        tracing::info!("drift generator disabled");
    } else {
        let _detached = DriftGenerator::new(
            remote.clone(),
            DriftConfig {
                interval: simulation.drift_interval,
                seed: simulation.drift_seed,
                ..DriftConfig::default()
            },
        )
        .spawn();
        tracing::info!(interval = ?simulation.drift_interval, "drift generator running");
    }

    let engine = Engine::spawn(remote.clone(), EngineConfig::from_env()?);
    demo_selection_once(engine.clone());

    let mut roster = engine.roster();
    let mut pool = engine.free_pool();
    let mut errors = engine.errors();

    let deadline = async move {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(deadline, ctrl_c);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            result = &mut ctrl_c => {
                result.ok();
                break;
            }
            changed = roster.changed() => {
                if changed.is_err() {
                    break;
                }
                print_roster(&roster.borrow_and_update());
            }
            changed = pool.changed() => {
                if changed.is_err() {
                    break;
                }
                print_pool(&pool.borrow_and_update());
            }
            changed = errors.changed() => {
                if changed.is_err() {
                    break;
                }
                let failure = errors.borrow_and_update().clone();
                if let Some(failure) = failure {
                    print_failure(&failure);
                }
            }
        }
    }

    tracing::info!(
        snapshot_fetches = remote.snapshot_fetches(),
        "demo finished"
    );
    Ok(())
}

/// After the first snapshot lands, select the first free car and the first
/// user; the engine turns the completed pair into one assignment.
fn demo_selection_once(engine: EngineHandle) {
    tokio::spawn(async move {
        let mut roster = engine.roster();
        if roster.wait_for(|r| !r.entries().is_empty()).await.is_err() {
            return;
        }
        let user_id = roster.borrow().entries().first().map(|e| e.user.id);
        let car_id = engine.free_pool().borrow().cars().first().map(|c| c.id);
        if let (Some(user_id), Some(car_id)) = (user_id, car_id) {
            tracing::info!(%user_id, %car_id, "demo: selecting a pair");
            let _ = engine.submit(Command::SelectCar(car_id)).await;
            let _ = engine.submit(Command::SelectUser(user_id)).await;
        }
    });
}

#[allow(clippy::print_stdout)]
fn print_roster(roster: &ClientRoster) {
    println!("clients ({}):", roster.entries().len());
    for entry in roster.entries() {
        let cars = entry
            .cars
            .iter()
            .map(|c| format!("{} {} ({})", c.make, c.model, c.year))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} <{}>: {}",
            entry.user.full_name(),
            entry.user.email,
            if cars.is_empty() { "-".to_owned() } else { cars },
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_pool(pool: &FreePool) {
    let cars = pool
        .cars()
        .iter()
        .map(|c| format!("{} {}", c.make, c.model))
        .collect::<Vec<_>>()
        .join(", ");
    println!("free cars ({}): {}", pool.cars().len(), cars);
}

#[allow(clippy::print_stdout)]
fn print_failure(failure: &CommandFailure) {
    println!("error [{}]: {}", failure.command, failure.error);
}
