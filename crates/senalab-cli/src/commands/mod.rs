pub mod config;
pub mod dictionary;
pub mod leaderboard;
pub mod lesson;
pub mod streak;
pub mod user;

use std::error::Error;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use senalab_core::{AccountService, Config, Database};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Account service over the on-disk database and config.
pub fn open_accounts() -> Result<AccountService<Database>, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(AccountService::from_config(Database::open()?, &config)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read a JSON array of records from `path`.
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}
