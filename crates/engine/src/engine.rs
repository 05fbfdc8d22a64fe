//! The engine worker: a single task owning every piece of mutable state.
//!
//! All state transitions of the entity store, the two derived views, and
//! the selection happen strictly serialized on this one task; it drains a
//! command queue and a completion queue and never holds a lock. Suspension
//! happens only at the remote boundary: each data command runs in its own
//! spawned task and re-enters the loop as a single completion, so any
//! number of operations can be in flight while the loop keeps applying
//! whatever arrives, in arrival order.
//!
//! Completions are tagged with the generation current at dispatch. A
//! refresh bumps the generation, so results that were in flight when the
//! views were rebuilt are dropped instead of being reapplied on top of the
//! fresh baseline - reapplying them is how the views drifted in the first
//! place.

use std::future::Future;
use std::sync::Arc;

use motorpool_core::Snapshot;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::{CommandFailure, SyncError};
use crate::event::ChangeEvent;
use crate::pipeline;
use crate::remote::RemoteStore;
use crate::selection::{SelectionCoordinator, SelectionState};
use crate::store::EntityStore;
use crate::views::{ClientRoster, FreePool};

/// The engine worker task has stopped and no longer accepts commands.
#[derive(Debug, Error)]
#[error("engine task has stopped")]
pub struct EngineStopped;

/// Cloneable handle to a running engine.
///
/// Commands go in through [`submit`](Self::submit); state comes out through
/// four watch subscriptions with replay-last-value semantics: a late
/// subscriber immediately observes the current snapshot, then live updates.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    roster: watch::Receiver<ClientRoster>,
    pool: watch::Receiver<FreePool>,
    selection: watch::Receiver<SelectionState>,
    errors: watch::Receiver<Option<CommandFailure>>,
}

impl EngineHandle {
    /// Submit a command. Resolves as soon as the command is queued; the
    /// outcome arrives later through the subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineStopped`] if the engine task is gone.
    pub async fn submit(&self, command: Command) -> Result<(), EngineStopped> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EngineStopped)
    }

    /// Subscribe to the client roster.
    #[must_use]
    pub fn roster(&self) -> watch::Receiver<ClientRoster> {
        self.roster.clone()
    }

    /// Subscribe to the free-car pool.
    #[must_use]
    pub fn free_pool(&self) -> watch::Receiver<FreePool> {
        self.pool.clone()
    }

    /// Subscribe to the selection state.
    #[must_use]
    pub fn selection(&self) -> watch::Receiver<SelectionState> {
        self.selection.clone()
    }

    /// Subscribe to command failures. `None` until the first failure.
    #[must_use]
    pub fn errors(&self) -> watch::Receiver<Option<CommandFailure>> {
        self.errors.clone()
    }
}

/// A completion re-entering the engine loop from a spawned task.
enum Arrival {
    /// A data command finished.
    Completed {
        generation: u64,
        command: &'static str,
        outcome: Result<ChangeEvent, SyncError>,
    },
    /// A snapshot fetch finished.
    Refreshed {
        generation: u64,
        result: Result<Snapshot, SyncError>,
    },
}

/// The synchronization engine.
///
/// Construct and detach with [`Engine::spawn`]; all interaction afterwards
/// goes through the returned [`EngineHandle`].
pub struct Engine<R> {
    remote: Arc<R>,
    config: EngineConfig,
    store: EntityStore,
    roster: ClientRoster,
    pool: FreePool,
    selection: SelectionCoordinator,
    generation: u64,
    refresh_pending: bool,
    in_flight: usize,
    commands: mpsc::Receiver<Command>,
    results: mpsc::Receiver<Arrival>,
    results_tx: mpsc::Sender<Arrival>,
    roster_tx: watch::Sender<ClientRoster>,
    pool_tx: watch::Sender<FreePool>,
    selection_tx: watch::Sender<SelectionState>,
    errors_tx: watch::Sender<Option<CommandFailure>>,
}

impl<R: RemoteStore> Engine<R> {
    /// Start an engine over the given remote and return its handle.
    ///
    /// The worker immediately fetches a snapshot to seed the views; until
    /// it arrives the subscriptions show empty state.
    pub fn spawn(remote: R, config: EngineConfig) -> EngineHandle {
        let (engine, handle) = Self::new(remote, config);
        tokio::spawn(engine.run());
        handle
    }

    fn new(remote: R, config: EngineConfig) -> (Self, EngineHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(config.channel_capacity);
        let (results_tx, results_rx) = mpsc::channel(config.channel_capacity);
        let (roster_tx, roster_rx) = watch::channel(ClientRoster::default());
        let (pool_tx, pool_rx) = watch::channel(FreePool::default());
        let (selection_tx, selection_rx) = watch::channel(SelectionState::Idle);
        let (errors_tx, errors_rx) = watch::channel(None);

        let engine = Self {
            remote: Arc::new(remote),
            config,
            store: EntityStore::default(),
            roster: ClientRoster::default(),
            pool: FreePool::default(),
            selection: SelectionCoordinator::default(),
            generation: 0,
            refresh_pending: false,
            in_flight: 0,
            commands: commands_rx,
            results: results_rx,
            results_tx,
            roster_tx,
            pool_tx,
            selection_tx,
            errors_tx,
        };
        let handle = EngineHandle {
            commands: commands_tx,
            roster: roster_rx,
            pool: pool_rx,
            selection: selection_rx,
            errors: errors_rx,
        };
        (engine, handle)
    }

    async fn run(mut self) {
        self.start_refresh();

        let mut commands_open = true;
        loop {
            tokio::select! {
                command = self.commands.recv(), if commands_open => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_open = false,
                },
                Some(arrival) = self.results.recv() => self.handle_arrival(arrival),
            }
            // Once every handle is gone and every in-flight operation has
            // landed there is nothing left that could ever wake us.
            if !commands_open && self.in_flight == 0 {
                break;
            }
        }
        debug!("engine loop stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let label = command.label();
        debug!(command = label, "command received");
        match command {
            Command::AddUser(draft) => {
                self.dispatch(label, pipeline::add_user(Arc::clone(&self.remote), draft));
            }
            Command::UpdateUser(user) => {
                self.dispatch(label, pipeline::update_user(Arc::clone(&self.remote), user));
            }
            Command::RemoveUser(user_id) => {
                self.dispatch(
                    label,
                    pipeline::remove_user(Arc::clone(&self.remote), user_id),
                );
            }
            Command::AddCar(draft) => {
                self.dispatch(label, pipeline::add_car(Arc::clone(&self.remote), draft));
            }
            Command::UpdateCar(car) => {
                self.dispatch(label, pipeline::update_car(Arc::clone(&self.remote), car));
            }
            Command::RemoveCar(car_id) => {
                self.dispatch(label, pipeline::remove_car(Arc::clone(&self.remote), car_id));
            }
            Command::Assign { user_id, car_id } => {
                self.dispatch(
                    label,
                    pipeline::assign(Arc::clone(&self.remote), user_id, car_id),
                );
            }
            Command::Unassign { user_id, car_id } => {
                self.dispatch(
                    label,
                    pipeline::unassign(Arc::clone(&self.remote), user_id, car_id),
                );
            }
            Command::SelectCar(car_id) => {
                if let Some((user_id, car_id)) = self.selection.select_car(car_id) {
                    self.dispatch(
                        "car.assign",
                        pipeline::assign(Arc::clone(&self.remote), user_id, car_id),
                    );
                }
                self.publish_selection();
            }
            Command::SelectUser(user_id) => {
                if let Some((user_id, car_id)) = self.selection.select_user(user_id) {
                    self.dispatch(
                        "car.assign",
                        pipeline::assign(Arc::clone(&self.remote), user_id, car_id),
                    );
                }
                self.publish_selection();
            }
            Command::UnselectAll => {
                self.selection.clear();
                self.publish_selection();
            }
            Command::Refresh => self.start_refresh(),
        }
    }

    /// Run one pipeline in its own task; its completion re-enters the loop
    /// tagged with the current generation.
    fn dispatch(
        &mut self,
        command: &'static str,
        work: impl Future<Output = Result<ChangeEvent, SyncError>> + Send + 'static,
    ) {
        let generation = self.generation;
        let results = self.results_tx.clone();
        self.in_flight += 1;
        debug!(command, generation, "dispatching");
        tokio::spawn(async move {
            let outcome = work.await;
            let _ = results
                .send(Arrival::Completed {
                    generation,
                    command,
                    outcome,
                })
                .await;
        });
    }

    /// Begin a full resynchronization: everything dispatched before this
    /// point belongs to a dead generation.
    fn start_refresh(&mut self) {
        self.generation += 1;
        self.refresh_pending = true;
        self.in_flight += 1;
        let generation = self.generation;
        let remote = Arc::clone(&self.remote);
        let results = self.results_tx.clone();
        info!(generation, "fetching full snapshot");
        tokio::spawn(async move {
            let result = remote.fetch_snapshot().await.map_err(SyncError::classify);
            let _ = results.send(Arrival::Refreshed { generation, result }).await;
        });
    }

    fn handle_arrival(&mut self, arrival: Arrival) {
        self.in_flight -= 1;
        match arrival {
            Arrival::Completed {
                generation,
                command,
                outcome,
            } => {
                if generation != self.generation {
                    debug!(
                        command,
                        generation,
                        current = self.generation,
                        "dropping stale completion"
                    );
                    return;
                }
                match outcome {
                    Ok(event) => self.apply_event(&event),
                    Err(error) => self.report_failure(command, error),
                }
            }
            Arrival::Refreshed { generation, result } => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "dropping stale snapshot"
                    );
                    return;
                }
                self.refresh_pending = false;
                match result {
                    Ok(snapshot) => self.rebuild_from(snapshot),
                    Err(error) => {
                        warn!(%error, "snapshot fetch failed");
                        let _ = self.errors_tx.send(Some(CommandFailure {
                            command: "refresh",
                            error,
                        }));
                    }
                }
            }
        }
    }

    /// Fold one committed event into the store and both views.
    fn apply_event(&mut self, event: &ChangeEvent) {
        self.store.apply(event);
        self.roster = self.roster.apply(event);
        self.pool = self.pool.apply(event);
        if self.selection.invalidate_on(event) {
            self.publish_selection();
        }
        self.publish_views();
    }

    /// Replace every piece of derived state with the fresh baseline.
    fn rebuild_from(&mut self, snapshot: Snapshot) {
        info!(
            users = snapshot.users.len(),
            cars = snapshot.cars.len(),
            bindings = snapshot.bindings.len(),
            "rebuilding views from snapshot"
        );
        self.roster = ClientRoster::rebuild(&snapshot);
        self.pool = FreePool::rebuild(&snapshot);
        self.store.replace(snapshot);
        self.selection.clear();
        self.publish_selection();
        self.publish_views();
    }

    fn report_failure(&mut self, command: &'static str, error: SyncError) {
        warn!(command, %error, "command failed");
        let stale = error.is_stale();
        let _ = self.errors_tx.send(Some(CommandFailure { command, error }));
        if stale && !self.refresh_pending {
            if self.config.auto_resync {
                info!(command, "stale result detected, resynchronizing");
                self.start_refresh();
            } else {
                warn!(command, "stale result detected, awaiting explicit refresh");
            }
        }
    }

    fn publish_views(&self) {
        let _ = self.roster_tx.send(self.roster.clone());
        let _ = self.pool_tx.send(self.pool.clone());
    }

    fn publish_selection(&self) {
        let _ = self.selection_tx.send(self.selection.state());
    }
}
