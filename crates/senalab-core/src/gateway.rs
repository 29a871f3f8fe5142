use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::streak::UserStreakRecord;
use crate::user::AppUser;

/// Outcome of a conditional streak write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// The stored snapshot matched and the new values were written.
    Written,
    /// Another writer changed the record since it was read; nothing was written.
    Conflict,
}

/// The document-store seam for user records.
///
/// Implementations must make `write_streak` a single atomic compare-and-swap:
/// the streak policy trusts that it was handed a consistent snapshot, so
/// concurrent logins for one user are serialized here and nowhere else.
pub trait UserRecordGateway {
    /// Store a new profile. Fails with `DuplicateUser` if the uid is taken.
    fn create_user(&self, user: &AppUser) -> Result<()>;

    /// Fetch a profile by uid.
    fn get_user(&self, uid: &str) -> Result<Option<AppUser>>;

    /// Write `{streak, last_login}` only if the stored pair still equals `expected`.
    fn write_streak(
        &self,
        uid: &str,
        expected: &UserStreakRecord,
        new_streak: u32,
        login_at: DateTime<Utc>,
    ) -> Result<WriteResult>;

    /// Replace the stored username. Fails with `UserNotFound` for an unknown uid.
    fn update_username(&self, uid: &str, username: &str) -> Result<()>;

    /// Add `delta` to the stored points. Fails with `UserNotFound` for an unknown uid.
    fn add_points(&self, uid: &str, delta: u32) -> Result<u32>;

    /// Up to `limit` profiles ordered by points, highest first.
    fn top_users(&self, limit: usize) -> Result<Vec<AppUser>>;
}
