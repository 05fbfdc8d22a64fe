//! Per-command conversations with the remote store.
//!
//! Each data command runs one of these pipelines in its own task; the
//! returned value is the command's single terminal completion. Creation and
//! (un)assignment re-fetch the affected entity so the resulting event can
//! carry the full payload the reducers need; a lookup that comes back empty
//! means the entity vanished between the two operations.

use std::sync::Arc;

use motorpool_core::{Car, CarDraft, CarId, User, UserDraft, UserId};

use crate::error::SyncError;
use crate::event::ChangeEvent;
use crate::remote::RemoteStore;

pub(crate) async fn add_user<R: RemoteStore>(
    remote: Arc<R>,
    draft: UserDraft,
) -> Result<ChangeEvent, SyncError> {
    let id = remote.create_user(draft).await.map_err(SyncError::classify)?;
    let user = remote
        .get_user(id)
        .await
        .map_err(|_| SyncError::CannotFetchData)?;
    user.map(ChangeEvent::UserAdded).ok_or(SyncError::EmptyResponse)
}

pub(crate) async fn update_user<R: RemoteStore>(
    remote: Arc<R>,
    user: User,
) -> Result<ChangeEvent, SyncError> {
    remote
        .update_user(user.clone())
        .await
        .map_err(SyncError::classify)?;
    Ok(ChangeEvent::UserUpdated(user))
}

pub(crate) async fn remove_user<R: RemoteStore>(
    remote: Arc<R>,
    user_id: UserId,
) -> Result<ChangeEvent, SyncError> {
    // Collect the user's cars before deletion; afterwards the cascade has
    // already destroyed the bindings and the freed set is unrecoverable.
    let freed = remote
        .cars_for_user(user_id)
        .await
        .map_err(|_| SyncError::CannotFetchData)?;
    remote
        .delete_user(user_id)
        .await
        .map_err(SyncError::classify)?;
    Ok(ChangeEvent::UserRemoved { user_id, freed })
}

pub(crate) async fn add_car<R: RemoteStore>(
    remote: Arc<R>,
    draft: CarDraft,
) -> Result<ChangeEvent, SyncError> {
    let id = remote.create_car(draft).await.map_err(SyncError::classify)?;
    let car = remote
        .get_car(id)
        .await
        .map_err(|_| SyncError::CannotFetchData)?;
    car.map(ChangeEvent::CarAdded).ok_or(SyncError::EmptyResponse)
}

pub(crate) async fn update_car<R: RemoteStore>(
    remote: Arc<R>,
    car: Car,
) -> Result<ChangeEvent, SyncError> {
    remote
        .update_car(car.clone())
        .await
        .map_err(SyncError::classify)?;
    Ok(ChangeEvent::CarUpdated(car))
}

pub(crate) async fn remove_car<R: RemoteStore>(
    remote: Arc<R>,
    car_id: CarId,
) -> Result<ChangeEvent, SyncError> {
    remote
        .delete_car(car_id)
        .await
        .map_err(SyncError::classify)?;
    Ok(ChangeEvent::CarRemoved(car_id))
}

pub(crate) async fn assign<R: RemoteStore>(
    remote: Arc<R>,
    user_id: UserId,
    car_id: CarId,
) -> Result<ChangeEvent, SyncError> {
    let binding_id = remote
        .assign(user_id, car_id)
        .await
        .map_err(SyncError::classify)?;
    let car = remote
        .get_car(car_id)
        .await
        .map_err(|_| SyncError::CannotFetchData)?;
    car.map(|car| ChangeEvent::Assigned {
        binding_id,
        user_id,
        car,
    })
    .ok_or(SyncError::EmptyResponse)
}

pub(crate) async fn unassign<R: RemoteStore>(
    remote: Arc<R>,
    user_id: UserId,
    car_id: CarId,
) -> Result<ChangeEvent, SyncError> {
    remote
        .unassign(user_id, car_id)
        .await
        .map_err(SyncError::classify)?;
    let car = remote
        .get_car(car_id)
        .await
        .map_err(|_| SyncError::CannotFetchData)?;
    car.map(|car| ChangeEvent::Unassigned { user_id, car })
        .ok_or(SyncError::EmptyResponse)
}
