//! User profile and login commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use super::{open_accounts, print_json, CmdResult};

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a profile for an authenticated identity
    Register {
        /// Identity-provider uid (generated when omitted)
        #[arg(long)]
        uid: Option<String>,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        username: String,
    },
    /// Show a stored profile
    Show { uid: String },
    /// Check whether a profile exists for the uid
    Exists { uid: String },
    /// Record a login and update the daily streak
    Login {
        uid: String,
        /// Login instant in RFC 3339 (default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Change the username of a profile
    Rename { uid: String, username: String },
    /// Add points to a profile
    Points { uid: String, delta: u32 },
}

pub fn run(action: UserAction) -> CmdResult {
    let accounts = open_accounts()?;

    match action {
        UserAction::Register {
            uid,
            name,
            username,
        } => {
            let uid = uid.unwrap_or_else(|| Uuid::new_v4().to_string());
            let user = accounts.register(&uid, &name, &username, Utc::now())?;
            print_json(&user)?;
        }
        UserAction::Show { uid } => {
            let user = accounts.profile(&uid)?;
            print_json(&user)?;
        }
        UserAction::Exists { uid } => {
            println!("{}", accounts.is_profile_complete(&uid)?);
        }
        UserAction::Login { uid, at } => {
            let outcome = accounts.record_login(&uid, at.unwrap_or_else(Utc::now))?;
            print_json(&outcome)?;
        }
        UserAction::Rename { uid, username } => {
            let user = accounts.rename(&uid, &username)?;
            print_json(&user)?;
        }
        UserAction::Points { uid, delta } => {
            let total = accounts.award_points(&uid, delta)?;
            println!("{total}");
        }
    }
    Ok(())
}
