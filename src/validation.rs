use crate::calendar;
use crate::import::GoalSnapshot;
use crate::records::{CheckIn, Goal, Milestone, MilestoneKind, Objective, Todo};
use crate::status::{EntityKind, StoredStatus};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_CATEGORY_CHARS: usize = 50;
pub const MAX_CHECK_IN_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::new(
            "title",
            format!("Title must be {MAX_TITLE_CHARS} characters or less"),
        ));
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), ValidationError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_CHARS => Err(ValidationError::new(
            "description",
            format!("Description must be {MAX_DESCRIPTION_CHARS} characters or less"),
        )),
        _ => Ok(()),
    }
}

fn check_status(status: StoredStatus, kind: EntityKind) -> Result<(), ValidationError> {
    if status.is_settable_on(kind) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "status",
            format!("status '{}' cannot be set on a {}", status, kind.as_str()),
        ))
    }
}

fn check_required_text(field: &'static str, label: &str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{label} are required")));
    }
    if text.chars().count() > MAX_CHECK_IN_CHARS {
        return Err(ValidationError::new(
            field,
            format!("{label} must be {MAX_CHECK_IN_CHARS} characters or less"),
        ));
    }
    Ok(())
}

pub fn validate_objective(objective: &Objective) -> Result<(), ValidationError> {
    check_title(&objective.title)?;
    check_description(objective.description.as_deref())?;
    check_status(objective.status, EntityKind::Objective)
}

pub fn validate_goal(goal: &Goal) -> Result<(), ValidationError> {
    check_title(&goal.title)?;
    check_description(goal.description.as_deref())?;
    if let Some(category) = goal.category.as_deref() {
        if category.chars().count() > MAX_CATEGORY_CHARS {
            return Err(ValidationError::new(
                "category",
                format!("Category must be {MAX_CATEGORY_CHARS} characters or less"),
            ));
        }
    }
    check_status(goal.status, EntityKind::Goal)
}

pub fn validate_milestone(milestone: &Milestone) -> Result<(), ValidationError> {
    check_title(&milestone.title)?;
    check_description(milestone.description.as_deref())?;
    if let Some(quarter) = milestone.quarter {
        if !(1..=4).contains(&quarter) {
            return Err(ValidationError::new(
                "quarter",
                format!("quarter {quarter} must be between 1 and 4"),
            ));
        }
    }
    if let Some(month) = milestone.month {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::new(
                "month",
                format!("month {month} must be between 1 and 12"),
            ));
        }
    }
    if let (MilestoneKind::Monthly, Some(quarter), Some(month)) =
        (milestone.kind, milestone.quarter, milestone.month)
    {
        if calendar::quarter_of_month(u32::from(month)) != Some(quarter) {
            return Err(ValidationError::new(
                "month",
                format!("month {month} does not fall in quarter {quarter}"),
            ));
        }
    }
    check_status(milestone.status, EntityKind::Milestone)
}

pub fn validate_todo(todo: &Todo) -> Result<(), ValidationError> {
    check_title(&todo.title)?;
    check_description(todo.description.as_deref())?;
    if todo.completed_at.is_some() && !todo.completed {
        return Err(ValidationError::new(
            "completedAt",
            "an incomplete todo cannot carry a completion timestamp",
        ));
    }
    Ok(())
}

pub fn validate_check_in(check_in: &CheckIn) -> Result<(), ValidationError> {
    check_required_text("accomplishments", "Accomplishments", &check_in.accomplishments)?;
    check_required_text("challenges", "Challenges", &check_in.challenges)?;
    check_required_text(
        "nextWeekPriorities",
        "Next week priorities",
        &check_in.next_week_priorities,
    )
}

/// Validates every record of a snapshot and the links between them.
pub fn validate_snapshot(snapshot: &GoalSnapshot) -> Result<(), ValidationError> {
    validate_goal(&snapshot.goal)?;

    let mut milestone_ids: HashSet<Uuid> = HashSet::with_capacity(snapshot.milestones.len());
    for milestone in &snapshot.milestones {
        if !milestone_ids.insert(milestone.id) {
            return Err(ValidationError::new(
                "milestones",
                format!("duplicate milestone id {}", milestone.id),
            ));
        }
        if milestone.goal_id != snapshot.goal.id {
            return Err(ValidationError::new(
                "milestones",
                format!("milestone {} belongs to another goal", milestone.id),
            ));
        }
        validate_milestone(milestone)?;
    }

    let mut todo_ids: HashSet<Uuid> = HashSet::with_capacity(snapshot.todos.len());
    for todo in &snapshot.todos {
        if !todo_ids.insert(todo.id) {
            return Err(ValidationError::new(
                "todos",
                format!("duplicate todo id {}", todo.id),
            ));
        }
        if todo.goal_id != snapshot.goal.id {
            return Err(ValidationError::new(
                "todos",
                format!("todo {} belongs to another goal", todo.id),
            ));
        }
        if let Some(milestone_id) = todo.milestone_id {
            if !milestone_ids.contains(&milestone_id) {
                return Err(ValidationError::new(
                    "todos",
                    format!("todo {} references unknown milestone {}", todo.id, milestone_id),
                ));
            }
        }
        validate_todo(todo)?;
    }
    Ok(())
}
