//! Lesson content commands.

use std::path::PathBuf;

use clap::Subcommand;
use senalab_core::{Database, Lesson};
use serde::Serialize;

use super::{print_json, read_json_array, CmdResult};

#[derive(Subcommand)]
pub enum LessonAction {
    /// Import lessons from a JSON array file (replaces lessons with the same id)
    Import { file: PathBuf },
    /// List all lessons
    List,
    /// Show one lesson with its question
    Show { id: String },
    /// Check an answer to the lesson's question
    Answer {
        id: String,
        /// Zero-based option index
        index: usize,
    },
}

#[derive(Serialize)]
struct LessonSummary<'a> {
    id: &'a str,
    title: &'a str,
    points: u32,
    options: usize,
}

#[derive(Serialize)]
struct AnswerResult<'a> {
    lesson: &'a str,
    index: usize,
    label: &'a str,
    correct: bool,
}

fn lesson_or_err(db: &Database, id: &str) -> Result<Lesson, Box<dyn std::error::Error>> {
    db.get_lesson(id)?
        .ok_or_else(|| format!("lesson not found: {id}").into())
}

pub fn run(action: LessonAction) -> CmdResult {
    let db = Database::open()?;

    match action {
        LessonAction::Import { file } => {
            let lessons: Vec<Lesson> = read_json_array(&file)?;
            for lesson in &lessons {
                if lesson.id.trim().is_empty() {
                    return Err(format!("lesson '{}' has no id", lesson.title).into());
                }
                db.upsert_lesson(lesson)?;
            }
            println!("imported {} lessons", lessons.len());
        }
        LessonAction::List => {
            let lessons = db.list_lessons()?;
            let summaries: Vec<_> = lessons
                .iter()
                .map(|l| LessonSummary {
                    id: &l.id,
                    title: &l.title,
                    points: l.points,
                    options: l.question.options.len(),
                })
                .collect();
            print_json(&summaries)?;
        }
        LessonAction::Show { id } => {
            print_json(&lesson_or_err(&db, &id)?)?;
        }
        LessonAction::Answer { id, index } => {
            let lesson = lesson_or_err(&db, &id)?;
            let correct = lesson.check_answer(index)?;
            print_json(&AnswerResult {
                lesson: &lesson.id,
                index,
                label: lesson.question.options[index].label(),
                correct,
            })?;
        }
    }
    Ok(())
}
