use std::path::PathBuf;

use clap::Subcommand;
use senalab_core::catalog::categories;
use senalab_core::{Database, Sign, SignFilter};

use super::{print_json, read_json_array, CmdResult};

#[derive(Subcommand)]
pub enum DictionaryAction {
    /// Import signs from a JSON array file
    Import { file: PathBuf },
    /// List signs, optionally filtered
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive match on word or description
        #[arg(long)]
        query: Option<String>,
    },
    /// List the distinct categories
    Categories,
}

pub fn run(action: DictionaryAction) -> CmdResult {
    let db = Database::open()?;

    match action {
        DictionaryAction::Import { file } => {
            let signs: Vec<Sign> = read_json_array(&file)?;
            for sign in &signs {
                db.insert_sign(sign)?;
            }
            println!("imported {} signs", signs.len());
        }
        DictionaryAction::List { category, query } => {
            let signs = db.list_signs()?;
            let filter = SignFilter { category, query };
            print_json(&filter.apply(&signs))?;
        }
        DictionaryAction::Categories => {
            print_json(&categories(&db.list_signs()?))?;
        }
    }
    Ok(())
}
