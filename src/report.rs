use crate::calendar::{self, Quarter};
use crate::import::GoalSnapshot;
use crate::progress::{self, ProgressInput, ProgressResult, StatusThresholds};
use crate::records::MilestoneKind;
use crate::status::{DerivedStatus, StoredStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTally {
    pub not_started: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub off_track: usize,
    pub completed: usize,
}

impl StatusTally {
    pub fn record(&mut self, status: DerivedStatus) {
        match status {
            DerivedStatus::NotStarted => self.not_started += 1,
            DerivedStatus::OnTrack => self.on_track += 1,
            DerivedStatus::AtRisk => self.at_risk += 1,
            DerivedStatus::OffTrack => self.off_track += 1,
            DerivedStatus::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.not_started + self.on_track + self.at_risk + self.off_track + self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneReport {
    pub id: Uuid,
    pub title: String,
    pub kind: MilestoneKind,
    pub quarter: Quarter,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    pub stored_status: StoredStatus,
    pub progress: ProgressResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub goal_id: Uuid,
    pub goal_title: String,
    pub target_date: NaiveDate,
    pub days_until_target: i64,
    pub progress: ProgressResult,
    pub display_status: StoredStatus,
    pub todos: ProgressInput,
    pub overdue_todos: usize,
    pub milestones: Vec<MilestoneReport>,
    pub milestone_statuses: StatusTally,
}

impl ProgressReport {
    pub fn build(snapshot: &GoalSnapshot, now: DateTime<Utc>, thresholds: &StatusThresholds) -> Self {
        let today = now.date_naive();
        let goal = &snapshot.goal;
        let goal_result = progress::goal_progress(goal, &snapshot.todos, now, thresholds);

        let mut milestone_statuses = StatusTally::default();
        let mut milestones: Vec<MilestoneReport> = snapshot
            .milestones
            .iter()
            .map(|milestone| {
                let result = progress::milestone_progress(milestone, &snapshot.todos, now, thresholds);
                milestone_statuses.record(result.status);
                MilestoneReport {
                    id: milestone.id,
                    title: milestone.title.clone(),
                    kind: milestone.kind,
                    quarter: milestone.quarter_or_derived(),
                    due_date: milestone.due_date,
                    days_until_due: calendar::days_until(milestone.due_date, today),
                    stored_status: milestone.status,
                    progress: result,
                }
            })
            .collect();
        milestones.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.title.cmp(&b.title)));

        Self {
            goal_id: goal.id,
            goal_title: goal.title.clone(),
            target_date: goal.target_date,
            days_until_target: calendar::days_until(goal.target_date, today),
            progress: goal_result,
            display_status: progress::resolve_status(goal.status, goal_result.status),
            todos: ProgressInput::from_todos(&snapshot.todos),
            overdue_todos: snapshot.todos.iter().filter(|t| t.is_overdue(today)).count(),
            milestones,
            milestone_statuses,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("status={}", self.display_status));
        parts.push(format!("actual={}%", self.progress.actual));
        parts.push(format!("expected={}%", self.progress.expected));
        parts.push(format!(
            "todos={}/{}",
            self.todos.completed_units, self.todos.total_units
        ));
        if self.overdue_todos > 0 {
            parts.push(format!("overdue={}", self.overdue_todos));
        }
        if self.days_until_target >= 0 {
            parts.push(format!("due_in={}d", self.days_until_target));
        } else {
            parts.push(format!("late_by={}d", -self.days_until_target));
        }
        if self.milestone_statuses.total() > 0 {
            let tally = &self.milestone_statuses;
            parts.push(format!(
                "milestones[on_track={} at_risk={} off_track={} completed={} not_started={}]",
                tally.on_track, tally.at_risk, tally.off_track, tally.completed, tally.not_started
            ));
        }
        parts.join(", ")
    }

    /// Milestones as an ASCII table.
    pub fn render_table(&self) -> String {
        let header = ["title", "type", "quarter", "due", "days", "actual", "expected", "status"];
        let rows: Vec<Vec<String>> = self
            .milestones
            .iter()
            .map(|m| {
                vec![
                    m.title.clone(),
                    m.kind.as_str().to_string(),
                    m.quarter.label().to_string(),
                    m.due_date.to_string(),
                    m.days_until_due.to_string(),
                    format!("{}%", m.progress.actual),
                    format!("{}%", m.progress.expected),
                    m.progress.status.label().to_string(),
                ]
            })
            .collect();
        render_text_table(&header, &rows)
    }
}

fn render_text_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(ci) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(header.iter().copied(), &widths));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths.iter()) {
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad));
        line.push_str(" |");
    }
    line
}
