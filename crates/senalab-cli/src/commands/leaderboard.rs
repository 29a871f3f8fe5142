use senalab_core::Config;

use super::{open_accounts, print_json, CmdResult};

pub fn run(limit: Option<usize>) -> CmdResult {
    let limit = match limit {
        Some(n) => n,
        None => Config::load()?.leaderboard.default_limit,
    };
    let board = open_accounts()?.leaderboard(limit)?;
    print_json(&board.entries)
}
