//! # Senalab Core Library
//!
//! Core logic for the Senalab sign-language learning app. The command-line
//! binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Streak policy**: pure calendar-day arithmetic deciding whether a login
//!   starts, extends, keeps or resets the daily streak
//! - **Accounts**: fetch the stored record, evaluate, write back with a
//!   compare-and-swap
//! - **Storage**: SQLite for profiles and catalog content, TOML configuration
//! - **Catalog**: lessons with a quiz question, and the sign dictionary
//!
//! ## Key Components
//!
//! - [`StreakPolicy`]: login streak evaluator
//! - [`AccountService`]: registration, login bookkeeping, leaderboard
//! - [`UserRecordGateway`]: storage seam for user records
//! - [`Database`]: SQLite implementation of the gateway
//! - [`Config`]: Application configuration management

pub mod account;
pub mod catalog;
pub mod error;
pub mod gateway;
pub mod leaderboard;
pub mod storage;
pub mod streak;
pub mod user;

pub use account::{AccountService, LoginOutcome};
pub use catalog::{Lesson, LessonOption, LessonQuestion, Sign, SignFilter};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use gateway::{UserRecordGateway, WriteResult};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use storage::{Config, Database};
pub use streak::{DayBoundary, StreakChange, StreakOutcome, StreakPolicy, UserStreakRecord};
pub use user::AppUser;
