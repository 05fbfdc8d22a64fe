//! User entity and its pre-persistence draft.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A persisted user (client) of the fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; unique among users at creation time.
    pub email: Email,
}

impl User {
    /// Full display name, `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user that has not been persisted yet, so it has no id.
///
/// Promoted to a [`User`] only by the remote store, which assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; must be unique among users.
    pub email: Email,
}

impl UserDraft {
    /// Attach a store-assigned id, producing a persisted [`User`].
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_with_id_keeps_fields() {
        let draft = UserDraft {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Email::parse("ada@example.com").unwrap(),
        };
        let id = UserId::generate();
        let user = draft.clone().with_id(id);

        assert_eq!(user.id, id);
        assert_eq!(user.first_name, draft.first_name);
        assert_eq!(user.last_name, draft.last_name);
        assert_eq!(user.email, draft.email);
    }

    #[test]
    fn test_full_name() {
        let user = UserDraft {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: Email::parse("ada@example.com").unwrap(),
        }
        .with_id(UserId::generate());

        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
