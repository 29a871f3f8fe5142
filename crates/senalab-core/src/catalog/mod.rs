//! Lesson content and the sign dictionary.
//!
//! Both are read-mostly reference data: imported in bulk, listed, and
//! filtered client-side.

mod dictionary;
mod lesson;

pub use dictionary::{categories, Sign, SignFilter};
pub use lesson::{Lesson, LessonOption, LessonQuestion};
