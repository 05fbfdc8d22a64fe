//! Error taxonomy for the synchronization engine.
//!
//! Two layers: [`RemoteError`] is what the remote store itself reports per
//! operation; [`SyncError`] is the engine's classification of a failed
//! command, which decides whether the failure is recovered locally or
//! escalates into a full resynchronization.

use motorpool_core::{CarId, Email, UserId};
use thiserror::Error;

/// Errors reported by the remote store for individual operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// A user with this email already exists.
    #[error("a user with email {0} already exists")]
    DuplicateEmail(Email),

    /// The targeted user does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// The targeted car does not exist.
    #[error("car {0} not found")]
    CarNotFound(CarId),

    /// The car is already held by some user.
    #[error("car {car_id} is already assigned to user {user_id}")]
    CarAlreadyAssigned {
        /// The contested car.
        car_id: CarId,
        /// The user currently holding it.
        user_id: UserId,
    },

    /// No binding exists between this user and car.
    #[error("car {car_id} is not assigned to user {user_id}")]
    NotAssigned {
        /// The car named by the command.
        car_id: CarId,
        /// The user named by the command.
        user_id: UserId,
    },

    /// The store could not be reached; the operation may be retried.
    #[error("remote store temporarily unavailable")]
    Unavailable,
}

/// A failed command, classified by how the engine must react.
///
/// Every command failure is isolated to that command's completion; none of
/// these abort the engine. Only [`SyncError::OutdatedData`] (and
/// [`SyncError::EmptyResponse`], which the staleness monitor escalates into
/// it) triggers the refresh protocol.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The command conflicted with current remote state (duplicate email,
    /// car already assigned, binding not found). Recovered locally: the
    /// command simply failed, no view is patched.
    #[error("command rejected: {0}")]
    DomainConflict(RemoteError),

    /// A fetch failed transiently; no view is patched.
    #[error("could not fetch data from the remote store")]
    CannotFetchData,

    /// A lookup that should have produced an entity produced nothing; the
    /// entity vanished between operations.
    #[error("remote store returned no entity where one was expected")]
    EmptyResponse,

    /// Local and remote state have diverged; incremental patching is no
    /// longer trustworthy.
    #[error("local state has diverged from the remote store")]
    OutdatedData,
}

impl SyncError {
    /// Classify a remote failure.
    ///
    /// Not-found failures mean the entity the command was built on no
    /// longer exists, which is exactly the divergence signal; conflicts are
    /// recoverable user-level rejections; unavailability is transient.
    #[must_use]
    pub fn classify(err: RemoteError) -> Self {
        match err {
            RemoteError::DuplicateEmail(_)
            | RemoteError::CarAlreadyAssigned { .. }
            | RemoteError::NotAssigned { .. } => Self::DomainConflict(err),
            RemoteError::UserNotFound(_) | RemoteError::CarNotFound(_) => Self::OutdatedData,
            RemoteError::Unavailable => Self::CannotFetchData,
        }
    }

    /// Whether the staleness monitor must react with a resynchronization.
    ///
    /// `EmptyResponse` escalates to `OutdatedData` here.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::OutdatedData | Self::EmptyResponse)
    }
}

/// A command failure as published on the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Stable label of the failed command, e.g. `"car.assign"`.
    pub command: &'static str,
    /// The classified failure.
    pub error: SyncError,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicts_are_domain_conflicts() {
        let email = Email::parse("dup@example.com").unwrap();
        assert!(matches!(
            SyncError::classify(RemoteError::DuplicateEmail(email)),
            SyncError::DomainConflict(_)
        ));

        let err = RemoteError::CarAlreadyAssigned {
            car_id: CarId::generate(),
            user_id: UserId::generate(),
        };
        assert!(matches!(
            SyncError::classify(err),
            SyncError::DomainConflict(_)
        ));

        let err = RemoteError::NotAssigned {
            car_id: CarId::generate(),
            user_id: UserId::generate(),
        };
        assert!(matches!(
            SyncError::classify(err),
            SyncError::DomainConflict(_)
        ));
    }

    #[test]
    fn test_not_found_is_outdated_data() {
        assert_eq!(
            SyncError::classify(RemoteError::UserNotFound(UserId::generate())),
            SyncError::OutdatedData
        );
        assert_eq!(
            SyncError::classify(RemoteError::CarNotFound(CarId::generate())),
            SyncError::OutdatedData
        );
    }

    #[test]
    fn test_unavailable_is_transient() {
        assert_eq!(
            SyncError::classify(RemoteError::Unavailable),
            SyncError::CannotFetchData
        );
    }

    #[test]
    fn test_staleness_escalation() {
        assert!(SyncError::OutdatedData.is_stale());
        assert!(SyncError::EmptyResponse.is_stale());
        assert!(!SyncError::CannotFetchData.is_stale());
        assert!(
            !SyncError::DomainConflict(RemoteError::Unavailable).is_stale(),
            "conflicts never force a refresh"
        );
    }
}
