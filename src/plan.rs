//! Intake of milestone and todo suggestions returned by the planning
//! assistant. Only the shape of the reply is handled here.

use crate::calendar;
use crate::error::ProgressError;
use crate::records::{Milestone, MilestoneKind, Todo};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningPhase {
    #[default]
    Clarification,
    Quarterly,
    Monthly,
    Todos,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMilestone {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResponse {
    pub message: String,
    #[serde(default)]
    pub phase: PlanningPhase,
    #[serde(default)]
    pub suggested_milestones: Vec<SuggestedMilestone>,
    #[serde(default)]
    pub suggested_todos: Vec<SuggestedTodo>,
    #[serde(default)]
    pub is_complete: bool,
}

impl PlanningResponse {
    fn plain(text: &str) -> Self {
        Self {
            message: text.to_string(),
            phase: PlanningPhase::Clarification,
            suggested_milestones: Vec::new(),
            suggested_todos: Vec::new(),
            is_complete: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    phase: Option<PlanningPhase>,
    #[serde(default)]
    suggested_milestones: Option<Vec<SuggestedMilestone>>,
    #[serde(default)]
    suggested_todos: Option<Vec<SuggestedTodo>>,
    #[serde(default)]
    is_complete: Option<bool>,
}

impl RawReply {
    fn into_response(self, text: &str) -> PlanningResponse {
        PlanningResponse {
            message: self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| text.to_string()),
            phase: self.phase.unwrap_or_default(),
            suggested_milestones: self.suggested_milestones.unwrap_or_default(),
            suggested_todos: self.suggested_todos.unwrap_or_default(),
            is_complete: self.is_complete.unwrap_or(false),
        }
    }
}

fn fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Reads an assistant reply: a fenced ```json block if present, else the
/// whole text as JSON, else the text itself as a clarification message.
pub fn parse_planning_reply(text: &str) -> PlanningResponse {
    if let Some(block) = fenced_json(text) {
        match serde_json::from_str::<RawReply>(block) {
            Ok(raw) => return raw.into_response(text),
            Err(err) => tracing::warn!(error = %err, "fenced planning reply is not valid JSON"),
        }
    }
    match serde_json::from_str::<RawReply>(text.trim()) {
        Ok(raw) => raw.into_response(text),
        Err(_) => PlanningResponse::plain(text),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedPlan {
    pub milestones: Vec<Milestone>,
    pub todos: Vec<Todo>,
    /// Todos naming a milestone title that was not part of the plan.
    pub unlinked_todos: usize,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Turns accepted suggestions into new milestone and todo records for
/// `goal_id`. Todos are linked to the first milestone whose title matches
/// their `milestone_title`.
pub fn accept_plan(
    goal_id: Uuid,
    milestones: &[SuggestedMilestone],
    todos: &[SuggestedTodo],
    now: DateTime<Utc>,
) -> Result<AcceptedPlan, ProgressError> {
    let mut created_milestones = Vec::with_capacity(milestones.len());
    for suggestion in milestones {
        let due_date = calendar::parse_date(&suggestion.due_date)?;
        let mut milestone = Milestone::new(goal_id, suggestion.title.clone(), suggestion.kind, due_date, now);
        milestone.description = non_empty(&suggestion.description);
        milestone.quarter = suggestion.quarter;
        milestone.month = suggestion.month;
        validation::validate_milestone(&milestone)
            .map_err(|err| ProgressError::invalid(format!("milestone '{}': {err}", suggestion.title)))?;
        created_milestones.push(milestone);
    }

    let mut created_todos = Vec::with_capacity(todos.len());
    let mut unlinked_todos = 0;
    for suggestion in todos {
        let mut todo = Todo::new(goal_id, suggestion.title.clone(), now);
        todo.description = non_empty(&suggestion.description);
        todo.due_date = match non_empty(&suggestion.due_date) {
            Some(raw) => Some(calendar::parse_date(&raw)?),
            None => None,
        };
        if let Some(title) = suggestion.milestone_title.as_deref() {
            todo.milestone_id = created_milestones
                .iter()
                .find(|m| m.title == title)
                .map(|m| m.id);
            if todo.milestone_id.is_none() {
                tracing::warn!(todo = %suggestion.title, milestone = %title, "suggested todo names an unknown milestone");
                unlinked_todos += 1;
            }
        }
        validation::validate_todo(&todo)
            .map_err(|err| ProgressError::invalid(format!("todo '{}': {err}", suggestion.title)))?;
        created_todos.push(todo);
    }

    tracing::debug!(
        %goal_id,
        milestones = created_milestones.len(),
        todos = created_todos.len(),
        "accepted plan"
    );
    Ok(AcceptedPlan {
        milestones: created_milestones,
        todos: created_todos,
        unlinked_todos,
    })
}
