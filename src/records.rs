use crate::calendar::{self, Quarter};
use crate::status::StoredStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Quarterly,
    Monthly,
}

impl MilestoneKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneKind::Quarterly => "quarterly",
            MilestoneKind::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: StoredStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: StoredStatus,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(title: impl Into<String>, target_date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            objective_id: None,
            title: title.into(),
            description: None,
            target_date,
            category: None,
            status: StoredStatus::NotStarted,
            created_at,
        }
    }

    /// A stored status other than the `not_started` default was set by hand.
    pub fn status_override(&self) -> Option<StoredStatus> {
        match self.status {
            StoredStatus::NotStarted => None,
            other => Some(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default)]
    pub status: StoredStatus,
    pub created_at: DateTime<Utc>,
}

impl Milestone {
    pub fn new(
        goal_id: Uuid,
        title: impl Into<String>,
        kind: MilestoneKind,
        due_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            title: title.into(),
            description: None,
            due_date,
            kind,
            quarter: None,
            month: None,
            status: StoredStatus::NotStarted,
            created_at,
        }
    }

    /// The stored quarter when it is valid, otherwise the quarter of the due date.
    pub fn quarter_or_derived(&self) -> Quarter {
        self.quarter
            .and_then(|q| Quarter::try_from(q).ok())
            .unwrap_or_else(|| Quarter::from_date(self.due_date))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub goal_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(goal_id: Uuid, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            milestone_id: None,
            title: title.into(),
            description: None,
            due_date: None,
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    /// Incomplete and due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed
            && self
                .due_date
                .is_some_and(|due| calendar::is_overdue(due, today))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub week_start_date: NaiveDate,
    pub accomplishments: String,
    pub challenges: String,
    pub next_week_priorities: String,
    #[serde(default)]
    pub needs_adjustment: bool,
    pub created_at: DateTime<Utc>,
}
