//! User profile records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::UserStreakRecord;

/// A learner's profile as stored in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Durable identifier issued by the identity provider
    pub uid: String,
    /// Display name
    pub name: String,
    pub username: String,
    pub points: u32,
    /// Consecutive calendar days with at least one login
    pub streak: u32,
    /// Absent until the first login is recorded
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AppUser {
    /// A fresh profile with no points, no streak and no recorded login.
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            username: username.into(),
            points: 0,
            streak: 0,
            last_login: None,
            created_at,
        }
    }

    pub fn streak_snapshot(&self) -> UserStreakRecord {
        UserStreakRecord {
            streak_count: self.streak,
            last_login_at: self.last_login,
        }
    }
}
