//! In-progress user input for each entity type.
//!
//! A form is only turned into an entity when it validates; a rejected
//! submission leaves the buffer untouched so the user can correct it.

use crate::error::AppError;
use crate::model::Priority;
use serde::Serialize;
use time::Date;
use time::macros::format_description;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TaskForm {
    pub title: String,
    pub priority: Priority,
    /// Raw `YYYY-MM-DD` input; empty means no due date.
    pub due_date: String,
    pub subject: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub subject: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GoalForm {
    pub title: String,
    /// Raw target input, coerced to a positive integer on submit.
    pub target: String,
    pub current: i64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidTask {
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidNote {
    pub title: String,
    pub content: String,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidGoal {
    pub title: String,
    pub target: u32,
    pub current: u32,
    pub category: Option<String>,
}

impl TaskForm {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match canonical_field(field).as_str() {
            "title" => self.title = value.to_string(),
            "priority" => self.priority = value.parse()?,
            "due" | "due_date" | "date" => self.due_date = value.to_string(),
            "subject" => self.subject = value.to_string(),
            other => return Err(unknown_field("task", other)),
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<ValidTask, AppError> {
        let title = required(&self.title, "title")?;
        let due_date = parse_due_date(&self.due_date)?;

        Ok(ValidTask {
            title,
            priority: self.priority,
            due_date,
            subject: optional(&self.subject),
        })
    }
}

impl NoteForm {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match canonical_field(field).as_str() {
            "title" => self.title = value.to_string(),
            "content" | "body" => self.content = value.to_string(),
            "subject" => self.subject = value.to_string(),
            other => return Err(unknown_field("note", other)),
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<ValidNote, AppError> {
        Ok(ValidNote {
            title: required(&self.title, "title")?,
            content: required(&self.content, "content")?,
            subject: optional(&self.subject),
        })
    }
}

impl GoalForm {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match canonical_field(field).as_str() {
            "title" => self.title = value.to_string(),
            "target" => self.target = value.to_string(),
            "current" => {
                self.current = value
                    .trim()
                    .parse()
                    .map_err(|_| AppError::invalid_input("current must be an integer"))?
            }
            "category" => self.category = value.to_string(),
            other => return Err(unknown_field("goal", other)),
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<ValidGoal, AppError> {
        let title = required(&self.title, "title")?;
        let target = match self.target.trim().parse::<u32>() {
            Ok(value) if value > 0 => value,
            _ => return Err(AppError::invalid_input("target must be a positive integer")),
        };
        let current = self.current.clamp(0, i64::from(target)) as u32;

        Ok(ValidGoal {
            title,
            target,
            current,
            category: optional(&self.category),
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_due_date(raw: &str) -> Result<Option<String>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(trimmed, format)
        .map_err(|_| AppError::invalid_input("due date must be YYYY-MM-DD"))?;
    let normalized = date
        .format(format)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok(Some(normalized))
}

fn canonical_field(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('-', "_")
}

fn unknown_field(form: &str, field: &str) -> AppError {
    AppError::invalid_input(format!("unknown {form} field '{field}'"))
}
