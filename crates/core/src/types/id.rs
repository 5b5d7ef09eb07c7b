//! Provider-issued user identifier.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid [`UserId`].
#[derive(Debug, thiserror::Error)]
#[error("invalid user id: {0}")]
pub struct UserIdError(#[from] uuid::Error);

/// Identifier of an authenticated user.
///
/// The identity provider issues UUIDs; the same value keys the row in the
/// user-role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a user id from its hyphenated string form.
    ///
    /// # Errors
    ///
    /// Returns `UserIdError` if the input is not a UUID.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let raw = "8f14e45f-ceea-4e7a-9b3f-2a7c1d5e6b90";
        let id = UserId::parse(raw).unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_deserializes_from_provider_json() {
        let id: UserId =
            serde_json::from_str("\"8f14e45f-ceea-4e7a-9b3f-2a7c1d5e6b90\"").unwrap();
        assert_eq!(id, UserId::parse("8f14e45f-ceea-4e7a-9b3f-2a7c1d5e6b90").unwrap());
    }
}
