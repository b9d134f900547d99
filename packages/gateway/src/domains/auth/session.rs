use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// How the session was originally established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Federated login (Google OAuth)
    #[serde(rename = "oauth")]
    OAuth,
    /// Email + password checked against the stored hash
    Credentials,
}

/// Resolved identity of the caller for a single request
///
/// Produced by a `SessionResolver` and read-only afterwards. An authenticated
/// session always carries a user id; there is no "logged in without id" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    Authenticated {
        user_id: UserId,
        provider: AuthProvider,
        expires_at: DateTime<Utc>,
    },
    #[default]
    Anonymous,
}

impl Session {
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Session::Authenticated { user_id, .. } => Some(user_id),
            Session::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}
