mod day;
mod policy;

pub use day::{offset_from_minutes, DayBoundary};
pub use policy::{evaluate, StreakChange, StreakOutcome, StreakPolicy, UserStreakRecord};
