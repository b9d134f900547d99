//! Authenticated user identifier.
//!
//! User ids are opaque strings issued by the identity store (not UUIDs). The
//! invariants enforced here are that an id is never empty and contains no
//! control characters, so it can always travel as an HTTP header value. A
//! `UserId` always belongs to an authenticated caller; anonymous callers have
//! none.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Non-empty identifier of an authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

/// Returned when a string cannot be used as a user id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user id must be non-empty and free of control characters")]
pub struct InvalidUserId;

impl UserId {
    /// Create a user id, rejecting empty values and control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidUserId> {
        let value = value.into();
        if value.trim().is_empty() || value.chars().any(char::is_control) {
            return Err(InvalidUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
