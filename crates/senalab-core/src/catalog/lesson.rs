use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One answer choice. Exactly one of the `option_*` texts is normally set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonOption {
    pub is_correct: bool,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    /// Video demonstrating the sign for this choice
    pub video: Option<String>,
}

impl LessonOption {
    /// Text shown for this option: the first of a, b, c that is present.
    pub fn label(&self) -> &str {
        self.option_a
            .as_deref()
            .or(self.option_b.as_deref())
            .or(self.option_c.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonQuestion {
    pub text: String,
    pub options: Vec<LessonOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub video: String,
    /// Points advertised for completing the lesson
    pub points: u32,
    pub question: LessonQuestion,
}

impl Lesson {
    /// Whether the option at `index` is marked correct.
    pub fn check_answer(&self, index: usize) -> Result<bool, ValidationError> {
        let options = &self.question.options;
        options
            .get(index)
            .map(|option| option.is_correct)
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: format!("lesson '{}' options", self.id),
                index,
                len: options.len(),
            })
    }
}
