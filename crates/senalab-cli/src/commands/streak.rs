use chrono::{DateTime, Utc};
use clap::Subcommand;
use senalab_core::{Config, DayBoundary, StreakPolicy};
use serde::Serialize;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Decide the new streak for one login
    Evaluate {
        /// Stored streak count
        #[arg(long, default_value_t = 0)]
        streak: u32,
        /// Stored last login in RFC 3339; omit for a first login
        #[arg(long)]
        last_login: Option<DateTime<Utc>>,
        /// Evaluation instant in RFC 3339 (default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// utc, local or an offset like -06:00 (default from config)
        #[arg(long, allow_hyphen_values = true)]
        boundary: Option<DayBoundary>,
    },
}

#[derive(Serialize)]
struct Evaluation {
    boundary: String,
    today: DateTime<Utc>,
    #[serde(flatten)]
    outcome: senalab_core::StreakOutcome,
}

pub fn run(action: StreakAction) -> CmdResult {
    match action {
        StreakAction::Evaluate {
            streak,
            last_login,
            now,
            boundary,
        } => {
            let policy = match boundary {
                Some(b) => StreakPolicy::new(b),
                None => Config::load()?.streak_policy()?,
            };
            let now = now.unwrap_or_else(Utc::now);
            print_json(&Evaluation {
                boundary: policy.boundary().to_string(),
                today: policy.boundary().start_of_day(now),
                outcome: policy.evaluate(streak, last_login, now),
            })
        }
    }
}
