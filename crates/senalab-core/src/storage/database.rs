//! SQLite-based storage for user profiles and catalog content.
//!
//! Provides persistent storage for:
//! - User profiles (points, streak, last login)
//! - Lessons with their quiz question
//! - Dictionary signs

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::catalog::{Lesson, LessonQuestion, Sign};
use crate::error::{CoreError, DatabaseError, Result};
use crate::gateway::{UserRecordGateway, WriteResult};
use crate::streak::UserStreakRecord;
use crate::user::AppUser;

use super::data_dir;

const USER_COLUMNS: &str = "uid, name, username, points, streak, last_login, created_at";

/// SQLite database for profiles and catalog content.
pub struct Database {
    conn: Connection,
}

fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn decode_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<AppUser> {
    let last_login: Option<String> = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(AppUser {
        uid: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        points: row.get(3)?,
        streak: row.get(4)?,
        last_login: last_login.as_deref().map(|s| decode_ts(5, s)).transpose()?,
        created_at: decode_ts(6, &created_at)?,
    })
}

fn lesson_from_row(row: &Row<'_>) -> rusqlite::Result<Lesson> {
    let question: String = row.get(5)?;
    let question: LessonQuestion = serde_json::from_str(&question)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Lesson {
        id: row.get(0)?,
        title: row.get(1)?,
        thumbnail: row.get(2)?,
        video: row.get(3)?,
        points: row.get(4)?,
        question,
    })
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/senalab/senalab.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("senalab.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    uid         TEXT PRIMARY KEY,
                    name        TEXT NOT NULL DEFAULT '',
                    username    TEXT NOT NULL,
                    points      INTEGER NOT NULL DEFAULT 0,
                    streak      INTEGER NOT NULL DEFAULT 0,
                    last_login  TEXT,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS lessons (
                    id          TEXT PRIMARY KEY,
                    title       TEXT NOT NULL DEFAULT '',
                    thumbnail   TEXT NOT NULL DEFAULT '',
                    video       TEXT NOT NULL DEFAULT '',
                    points      INTEGER NOT NULL DEFAULT 0,
                    question    TEXT NOT NULL DEFAULT '{}'
                );

                CREATE TABLE IF NOT EXISTS signs (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    word        TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    category    TEXT NOT NULL DEFAULT '',
                    video_url   TEXT NOT NULL DEFAULT ''
                );

                CREATE INDEX IF NOT EXISTS idx_users_points ON users(points DESC);
                CREATE INDEX IF NOT EXISTS idx_signs_category ON signs(category);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Lessons ──────────────────────────────────────────────────────────

    /// Insert or replace a lesson by id.
    pub fn upsert_lesson(&self, lesson: &Lesson) -> Result<()> {
        let question = serde_json::to_string(&lesson.question)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO lessons (id, title, thumbnail, video, points, question)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                lesson.id,
                lesson.title,
                lesson.thumbnail,
                lesson.video,
                lesson.points,
                question,
            ],
        )?;
        Ok(())
    }

    pub fn list_lessons(&self) -> Result<Vec<Lesson>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, thumbnail, video, points, question FROM lessons ORDER BY id",
        )?;
        let rows = stmt.query_map([], lesson_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        let lesson = self
            .conn
            .query_row(
                "SELECT id, title, thumbnail, video, points, question FROM lessons WHERE id = ?1",
                params![id],
                lesson_from_row,
            )
            .optional()?;
        Ok(lesson)
    }

    // ── Dictionary ───────────────────────────────────────────────────────

    pub fn insert_sign(&self, sign: &Sign) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO signs (word, description, category, video_url) VALUES (?1, ?2, ?3, ?4)",
            params![sign.word, sign.description, sign.category, sign.video_url],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_signs(&self) -> Result<Vec<Sign>> {
        let mut stmt = self.conn.prepare(
            "SELECT word, description, category, video_url FROM signs ORDER BY word, id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Sign {
                word: row.get(0)?,
                description: row.get(1)?,
                category: row.get(2)?,
                video_url: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl UserRecordGateway for Database {
    fn create_user(&self, user: &AppUser) -> Result<()> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (uid, name, username, points, streak, last_login, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.uid,
                user.name,
                user.username,
                user.points,
                user.streak,
                user.last_login.map(encode_ts),
                encode_ts(user.created_at),
            ],
        )?;
        if inserted == 0 {
            return Err(CoreError::DuplicateUser {
                uid: user.uid.clone(),
            });
        }
        tracing::info!(uid = %user.uid, username = %user.username, "created user profile");
        Ok(())
    }

    fn get_user(&self, uid: &str) -> Result<Option<AppUser>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE uid = ?1"),
                params![uid],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn write_streak(
        &self,
        uid: &str,
        expected: &UserStreakRecord,
        new_streak: u32,
        login_at: DateTime<Utc>,
    ) -> Result<WriteResult> {
        let changed = self.conn.execute(
            "UPDATE users SET streak = ?3, last_login = ?4
             WHERE uid = ?1 AND streak = ?2 AND last_login IS ?5",
            params![
                uid,
                expected.streak_count,
                new_streak,
                encode_ts(login_at),
                expected.last_login_at.map(encode_ts),
            ],
        )?;
        if changed == 1 {
            return Ok(WriteResult::Written);
        }

        let exists: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM users WHERE uid = ?1", params![uid], |row| row.get(0))
            .optional()?;
        match exists {
            Some(_) => Ok(WriteResult::Conflict),
            None => Err(CoreError::UserNotFound { uid: uid.to_string() }),
        }
    }

    fn update_username(&self, uid: &str, username: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE users SET username = ?2 WHERE uid = ?1",
            params![uid, username],
        )?;
        if changed == 0 {
            return Err(CoreError::UserNotFound { uid: uid.to_string() });
        }
        tracing::info!(uid, username, "renamed user");
        Ok(())
    }

    fn add_points(&self, uid: &str, delta: u32) -> Result<u32> {
        let changed = self.conn.execute(
            "UPDATE users SET points = MIN(points + ?2, 4294967295) WHERE uid = ?1",
            params![uid, delta],
        )?;
        if changed == 0 {
            return Err(CoreError::UserNotFound { uid: uid.to_string() });
        }
        let points: u32 =
            self.conn
                .query_row("SELECT points FROM users WHERE uid = ?1", params![uid], |row| {
                    row.get(0)
                })?;
        Ok(points)
    }

    fn top_users(&self, limit: usize) -> Result<Vec<AppUser>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             ORDER BY points DESC, username ASC, uid ASC
             LIMIT ?1"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], user_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
