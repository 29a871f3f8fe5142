//! Profile registration and login bookkeeping.
//!
//! A login is three separate steps: fetch the stored record, let the pure
//! [`StreakPolicy`] decide, then write conditionally through the gateway. The
//! write is a compare-and-swap against the snapshot that was evaluated; when
//! another device wins the race the record is re-read and re-evaluated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::gateway::{UserRecordGateway, WriteResult};
use crate::leaderboard::Leaderboard;
use crate::storage::Config;
use crate::streak::{StreakChange, StreakPolicy};
use crate::user::AppUser;

const DEFAULT_MAX_WRITE_RETRIES: u32 = 3;

/// What a recorded login did to the user's streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub uid: String,
    pub previous_streak: u32,
    pub streak: u32,
    pub change: StreakChange,
    /// False for a repeat login on the same calendar day.
    pub persisted: bool,
    /// Read-evaluate-write rounds used, including the successful one.
    pub attempts: u32,
}

pub struct AccountService<G> {
    gateway: G,
    policy: StreakPolicy,
    max_write_retries: u32,
}

impl<G: UserRecordGateway> AccountService<G> {
    pub fn new(gateway: G, policy: StreakPolicy) -> Self {
        Self {
            gateway,
            policy,
            max_write_retries: DEFAULT_MAX_WRITE_RETRIES,
        }
    }

    /// Build from the configured day boundary and retry budget.
    pub fn from_config(gateway: G, config: &Config) -> Result<Self> {
        Ok(Self::new(gateway, config.streak_policy()?)
            .with_max_write_retries(config.login.max_write_retries))
    }

    pub fn with_max_write_retries(mut self, retries: u32) -> Self {
        self.max_write_retries = retries;
        self
    }

    pub fn policy(&self) -> StreakPolicy {
        self.policy
    }

    /// Create the profile for a freshly authenticated identity.
    pub fn register(
        &self,
        uid: &str,
        name: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<AppUser> {
        if uid.trim().is_empty() {
            return Err(ValidationError::BlankField("uid".into()).into());
        }
        if username.trim().is_empty() {
            return Err(ValidationError::BlankField("username".into()).into());
        }

        let user = AppUser::new(uid, name.trim(), username.trim(), now);
        self.gateway.create_user(&user)?;
        Ok(user)
    }

    /// Whether the identity already has a stored profile.
    pub fn is_profile_complete(&self, uid: &str) -> Result<bool> {
        Ok(self.gateway.get_user(uid)?.is_some())
    }

    pub fn profile(&self, uid: &str) -> Result<AppUser> {
        self.gateway
            .get_user(uid)?
            .ok_or_else(|| CoreError::UserNotFound {
                uid: uid.to_string(),
            })
    }

    /// Record a login at `now` and update the daily streak.
    ///
    /// # Errors
    /// `UserNotFound` if no profile exists, `WriteConflict` if every attempt
    /// lost a race with another writer, or any storage error.
    pub fn record_login(&self, uid: &str, now: DateTime<Utc>) -> Result<LoginOutcome> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let snapshot = self.profile(uid)?.streak_snapshot();
            let outcome = self.policy.evaluate_record(&snapshot, now);

            let result = LoginOutcome {
                uid: uid.to_string(),
                previous_streak: snapshot.streak_count,
                streak: outcome.new_streak,
                change: outcome.change,
                persisted: outcome.should_persist,
                attempts,
            };

            if !outcome.should_persist {
                tracing::debug!(uid, streak = result.streak, "repeat login on the same day");
                return Ok(result);
            }

            match self
                .gateway
                .write_streak(uid, &snapshot, outcome.new_streak, now)?
            {
                WriteResult::Written => {
                    tracing::info!(
                        uid,
                        change = ?outcome.change,
                        from = snapshot.streak_count,
                        to = outcome.new_streak,
                        "streak updated"
                    );
                    return Ok(result);
                }
                WriteResult::Conflict if attempts <= self.max_write_retries => {
                    tracing::warn!(uid, attempts, "streak write conflicted, re-reading");
                }
                WriteResult::Conflict => {
                    tracing::error!(uid, attempts, "streak write kept conflicting");
                    return Err(CoreError::WriteConflict {
                        uid: uid.to_string(),
                        attempts,
                    });
                }
            }
        }
    }

    /// Change the username and return the refreshed profile.
    pub fn rename(&self, uid: &str, username: &str) -> Result<AppUser> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::BlankField("username".into()).into());
        }
        self.gateway.update_username(uid, username)?;
        self.profile(uid)
    }

    pub fn award_points(&self, uid: &str, delta: u32) -> Result<u32> {
        self.gateway.add_points(uid, delta)
    }

    /// Top `limit` users by points.
    pub fn leaderboard(&self, limit: usize) -> Result<Leaderboard> {
        let users = self.gateway.top_users(limit)?;
        Ok(Leaderboard::from_users(users, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::storage::Database;
    use crate::streak::UserStreakRecord;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn service() -> AccountService<Database> {
        AccountService::new(Database::open_memory().unwrap(), StreakPolicy::default())
    }

    /// Gateway where another writer sneaks in before each of our writes.
    struct RacingGateway {
        inner: Database,
        races_left: Cell<u32>,
    }

    impl UserRecordGateway for RacingGateway {
        fn create_user(&self, user: &AppUser) -> Result<()> {
            self.inner.create_user(user)
        }

        fn get_user(&self, uid: &str) -> Result<Option<AppUser>> {
            self.inner.get_user(uid)
        }

        fn write_streak(
            &self,
            uid: &str,
            expected: &UserStreakRecord,
            new_streak: u32,
            login_at: DateTime<Utc>,
        ) -> Result<WriteResult> {
            if self.races_left.get() > 0 {
                self.races_left.set(self.races_left.get() - 1);
                self.inner.conn().execute(
                    "UPDATE users SET streak = streak + 1 WHERE uid = ?1",
                    [uid],
                )?;
            }
            self.inner.write_streak(uid, expected, new_streak, login_at)
        }

        fn update_username(&self, uid: &str, username: &str) -> Result<()> {
            self.inner.update_username(uid, username)
        }

        fn add_points(&self, uid: &str, delta: u32) -> Result<u32> {
            self.inner.add_points(uid, delta)
        }

        fn top_users(&self, limit: usize) -> Result<Vec<AppUser>> {
            self.inner.top_users(limit)
        }
    }

    fn racing(races: u32) -> AccountService<RacingGateway> {
        AccountService::new(
            RacingGateway {
                inner: Database::open_memory().unwrap(),
                races_left: Cell::new(races),
            },
            StreakPolicy::default(),
        )
    }

    #[test]
    fn register_rejects_blank_fields() {
        let svc = service();
        assert!(matches!(
            svc.register(" ", "Ana", "ana", Utc::now()),
            Err(CoreError::Validation(ValidationError::BlankField(_)))
        ));
        assert!(svc.register("u1", "Ana", "", Utc::now()).is_err());
        assert!(!svc.is_profile_complete("u1").unwrap());
    }

    #[test]
    fn register_then_profile_is_complete() {
        let svc = service();
        let user = svc.register("u1", " Ana ", "ana", Utc::now()).unwrap();
        assert_eq!(user.name, "Ana");
        assert!(svc.is_profile_complete("u1").unwrap());
    }

    #[test]
    fn daily_logins_build_and_break_a_streak() {
        let svc = service();
        svc.register("u1", "Ana", "ana", at("2024-01-01T09:00:00Z")).unwrap();

        let first = svc.record_login("u1", at("2024-01-09T09:00:00Z")).unwrap();
        assert_eq!((first.streak, first.change), (1, StreakChange::Started));

        let again = svc.record_login("u1", at("2024-01-09T21:00:00Z")).unwrap();
        assert_eq!((again.streak, again.persisted), (1, false));

        let next = svc.record_login("u1", at("2024-01-10T07:00:00Z")).unwrap();
        assert_eq!((next.streak, next.change), (2, StreakChange::Extended));

        let gap = svc.record_login("u1", at("2024-01-13T07:00:00Z")).unwrap();
        assert_eq!((gap.previous_streak, gap.streak), (2, 1));
        assert_eq!(gap.change, StreakChange::Reset);

        let stored = svc.profile("u1").unwrap();
        assert_eq!(stored.streak, 1);
        assert_eq!(stored.last_login, Some(at("2024-01-13T07:00:00Z")));
    }

    #[test]
    fn same_day_login_keeps_first_timestamp() {
        let svc = service();
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();
        svc.record_login("u1", at("2024-01-09T09:00:00Z")).unwrap();
        svc.record_login("u1", at("2024-01-09T23:00:00Z")).unwrap();
        assert_eq!(
            svc.profile("u1").unwrap().last_login,
            Some(at("2024-01-09T09:00:00Z"))
        );
    }

    #[test]
    fn login_for_unknown_user_fails() {
        let err = service().record_login("ghost", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound { .. }));
    }

    #[test]
    fn conflicting_write_is_retried_against_fresh_state() {
        let svc = racing(1);
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();

        // The racer bumps the stored streak from 0 to 1 before our first write.
        let first = svc.record_login("u1", at("2024-01-09T09:00:00Z")).unwrap();
        assert_eq!(first.attempts, 2);
        assert_eq!(first.previous_streak, 1);
        assert_eq!(first.streak, 1);

        let stored = svc.profile("u1").unwrap();
        assert_eq!(stored.last_login, Some(at("2024-01-09T09:00:00Z")));

        let next = svc.record_login("u1", at("2024-01-10T09:00:00Z")).unwrap();
        assert_eq!(next.attempts, 1);
        assert_eq!(next.streak, 2);
    }

    #[test]
    fn conflict_retry_reports_attempts() {
        let svc = racing(2);
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();
        let out = svc.record_login("u1", at("2024-01-09T09:00:00Z")).unwrap();
        assert_eq!(out.attempts, 3);
        assert!(out.persisted);
    }

    #[test]
    fn gives_up_after_retry_budget() {
        let svc = racing(u32::MAX).with_max_write_retries(2);
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();
        let err = svc.record_login("u1", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::WriteConflict { attempts: 3, .. }));
    }

    #[test]
    fn rename_stores_trimmed_username() {
        let svc = service();
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();
        let user = svc.rename("u1", "  ana_lsm  ").unwrap();
        assert_eq!(user.username, "ana_lsm");
        assert_eq!(svc.profile("u1").unwrap().username, "ana_lsm");
    }

    #[test]
    fn rename_rejects_blank_username() {
        let svc = service();
        svc.register("u1", "Ana", "ana", Utc::now()).unwrap();
        assert!(matches!(
            svc.rename("u1", "   "),
            Err(CoreError::Validation(ValidationError::BlankField(_)))
        ));
        assert_eq!(svc.profile("u1").unwrap().username, "ana");
    }

    #[test]
    fn rename_unknown_user_fails() {
        let err = service().rename("ghost", "casper").unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound { .. }));
    }

    #[test]
    fn renamed_user_moves_in_leaderboard_ties() {
        let svc = service();
        for (uid, username) in [("a", "beto"), ("b", "caro")] {
            svc.register(uid, uid, username, Utc::now()).unwrap();
            svc.award_points(uid, 10).unwrap();
        }
        assert_eq!(svc.leaderboard(20).unwrap().entries[0].uid, "a");

        svc.rename("b", "ana").unwrap();
        let board = svc.leaderboard(20).unwrap();
        assert_eq!(board.entries[0].uid, "b");
        assert_eq!(board.entries[0].username, "ana");
    }

    #[test]
    fn leaderboard_ranks_points() {
        let svc = service();
        for (uid, points) in [("a", 3), ("b", 9)] {
            svc.register(uid, uid, uid, Utc::now()).unwrap();
            svc.award_points(uid, points).unwrap();
        }
        let board = svc.leaderboard(20).unwrap();
        assert_eq!(board.entries[0].uid, "b");
        assert_eq!(board.position_of("a"), Some(2));
    }

    #[test]
    fn from_config_uses_configured_boundary() {
        let mut config = Config::default();
        config.set("streak.day_boundary", "local").unwrap();
        let svc = AccountService::from_config(Database::open_memory().unwrap(), &config).unwrap();
        assert_eq!(svc.policy().boundary(), crate::streak::DayBoundary::Local);
    }
}
