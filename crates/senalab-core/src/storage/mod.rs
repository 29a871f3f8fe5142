mod config;
pub mod database;

pub use config::{Config, DayBoundaryMode, LeaderboardConfig, LoginConfig, StreakConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/senalab[-dev]/` based on SENALAB_ENV.
///
/// Set SENALAB_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SENALAB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("senalab-dev")
    } else {
        base_dir.join("senalab")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
