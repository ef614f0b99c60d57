use crate::calendar;
use crate::records::{Goal, Milestone, Todo};
use crate::validation::{self, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<ValidationError> for ImportError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

/// A goal together with its milestones and todos, as handed over by the
/// storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSnapshot {
    pub goal: Goal,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl GoalSnapshot {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            milestones: Vec::new(),
            todos: Vec::new(),
        }
    }

    pub fn find_milestone(&self, id: Uuid) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn todos_for_milestone(&self, id: Uuid) -> impl Iterator<Item = &Todo> {
        self.todos
            .iter()
            .filter(move |todo| todo.milestone_id == Some(id))
    }
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> ImportResult<GoalSnapshot> {
    let file = File::open(path.as_ref())?;
    let snapshot: GoalSnapshot = serde_json::from_reader(file)?;
    validation::validate_snapshot(&snapshot)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        milestones = snapshot.milestones.len(),
        todos = snapshot.todos.len(),
        "loaded goal snapshot"
    );
    Ok(snapshot)
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(snapshot: &GoalSnapshot, path: P) -> ImportResult<()> {
    validation::validate_snapshot(snapshot)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TodoCsvRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    milestone_id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_date: String,
    #[serde(default)]
    completed: String,
    #[serde(default)]
    created_at: String,
}

impl TodoCsvRecord {
    fn into_todo(self, goal_id: Uuid, imported_at: DateTime<Utc>) -> ImportResult<Todo> {
        let mut todo = Todo::new(goal_id, self.title, imported_at);
        if let Some(id) = parse_uuid(&self.id)? {
            todo.id = id;
        }
        todo.milestone_id = parse_uuid(&self.milestone_id)?;
        todo.description = parse_string_option(self.description);
        todo.due_date = match self.due_date.trim() {
            "" => None,
            value => Some(
                calendar::parse_date(value)
                    .map_err(|err| ImportError::InvalidData(err.to_string()))?,
            ),
        };
        todo.completed = parse_bool(&self.completed)?;
        if let Some(created_at) = parse_timestamp(&self.created_at)? {
            todo.created_at = created_at;
        }
        Ok(todo)
    }
}

/// Reads todos for `goal_id` from a CSV file with a header row of
/// `id,milestone_id,title,description,due_date,completed,created_at`. Only
/// `title` is required; rows without `created_at` are stamped with
/// `imported_at`.
pub fn load_todos_from_csv<P: AsRef<Path>>(
    path: P,
    goal_id: Uuid,
    imported_at: DateTime<Utc>,
) -> ImportResult<Vec<Todo>> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);
    let mut todos = Vec::new();
    for (idx, record) in reader.deserialize::<TodoCsvRecord>().enumerate() {
        let todo = record?.into_todo(goal_id, imported_at)?;
        validation::validate_todo(&todo)
            .map_err(|err| ImportError::InvalidData(format!("row {}: {err}", idx + 1)))?;
        todos.push(todo);
    }
    tracing::debug!(path = %path.as_ref().display(), count = todos.len(), "imported todos from csv");
    Ok(todos)
}

fn parse_uuid(value: &str) -> ImportResult<Option<Uuid>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(trimmed)
        .map(Some)
        .map_err(|err| ImportError::InvalidData(format!("invalid id '{trimmed}': {err}")))
}

fn parse_bool(value: &str) -> ImportResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        other => Err(ImportError::InvalidData(format!("invalid boolean '{other}'"))),
    }
}

fn parse_timestamp(value: &str) -> ImportResult<Option<DateTime<Utc>>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|err| ImportError::InvalidData(format!("invalid timestamp '{trimmed}': {err}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
