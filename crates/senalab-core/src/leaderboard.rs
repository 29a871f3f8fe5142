//! Points leaderboard.

use serde::{Deserialize, Serialize};

use crate::user::AppUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub uid: String,
    pub username: String,
    pub name: String,
    pub points: u32,
    pub streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank users by points, highest first, keeping at most `limit`.
    ///
    /// Ties are broken by username then uid so the order does not depend on
    /// how the store returned the rows.
    pub fn from_users(mut users: Vec<AppUser>, limit: usize) -> Self {
        users.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.username.cmp(&b.username))
                .then_with(|| a.uid.cmp(&b.uid))
        });
        users.truncate(limit);

        let entries = users
            .into_iter()
            .enumerate()
            .map(|(i, u)| LeaderboardEntry {
                rank: i + 1,
                uid: u.uid,
                username: u.username,
                name: u.name,
                points: u.points,
                streak: u.streak,
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The top three, as shown on the podium.
    pub fn podium(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(3)]
    }

    pub fn position_of(&self, uid: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.uid == uid).map(|e| e.rank)
    }
}
