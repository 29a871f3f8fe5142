use serde::{Deserialize, Serialize};

/// A dictionary entry: one sign and its demonstration video.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sign {
    pub word: String,
    pub description: String,
    pub category: String,
    pub video_url: String,
}

/// Category and free-text filter over dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignFilter {
    /// `None` selects every category.
    pub category: Option<String>,
    /// Blank matches everything.
    pub query: Option<String>,
}

impl SignFilter {
    pub fn matches(&self, sign: &Sign) -> bool {
        if let Some(category) = &self.category {
            if sign.category != *category {
                return false;
            }
        }

        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                sign.word.to_lowercase().contains(&needle)
                    || sign.description.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn apply<'a>(&self, signs: &'a [Sign]) -> Vec<&'a Sign> {
        signs.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Distinct non-blank categories, sorted.
pub fn categories(signs: &[Sign]) -> Vec<String> {
    let mut out: Vec<String> = signs
        .iter()
        .map(|s| s.category.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}
