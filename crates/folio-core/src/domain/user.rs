//! Registered user entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, keyed by the id they log in with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A user registered now.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}
