use crate::error::ProgressError;
use crate::records::{Goal, Milestone, Objective, Todo};
use crate::status::{DerivedStatus, StoredStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Points behind schedule still counted as on track.
pub const ON_TRACK_TOLERANCE: u8 = 10;
/// Points behind schedule before a goal is off track.
pub const AT_RISK_TOLERANCE: u8 = 25;

/// Completion counts of the todos that belong to a goal or milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    pub total_units: usize,
    pub completed_units: usize,
}

impl ProgressInput {
    pub fn new(total_units: usize, completed_units: usize) -> Self {
        Self {
            total_units,
            completed_units,
        }
    }

    pub fn from_todos<'a, I>(todos: I) -> Self
    where
        I: IntoIterator<Item = &'a Todo>,
    {
        todos
            .into_iter()
            .fold(Self::default(), |mut acc, todo| {
                acc.total_units += 1;
                if todo.completed {
                    acc.completed_units += 1;
                }
                acc
            })
    }

    pub fn percent(&self) -> u8 {
        percent_complete(self.total_units, self.completed_units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResult {
    pub actual: u8,
    pub expected: u8,
    pub status: DerivedStatus,
}

/// Share of completed units, rounded half-up to a whole percent.
///
/// An empty input is 0%, not 100%. Pairs with `completed > total` are outside
/// the contract; they are clamped to 100 instead of panicking.
pub fn percent_complete(total: usize, completed: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let total = total as u128;
    let completed = completed as u128;
    let pct = (200 * completed + total) / (2 * total);
    pct.min(100) as u8
}

/// The span a goal or milestone is expected to be worked on. Progress is
/// expected to grow linearly from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = ProgressError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ProgressError> {
        if start > end {
            return Err(ProgressError::invalid(format!(
                "window start {start} is after window end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a window from entity dates, collapsing an inverted window onto
    /// `end`.
    pub fn clamped(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start > end {
            tracing::debug!(%start, %end, "inverted progress window collapsed onto its end");
            return Self { start: end, end };
        }
        Self { start, end }
    }

    /// Window from a creation timestamp to midnight of a due date.
    pub fn from_due_date(created_at: DateTime<Utc>, due: NaiveDate) -> Self {
        Self::clamped(created_at.naive_utc(), due.and_time(NaiveTime::MIN))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Percentage of the window elapsed at `now`, rounded half-up.
    ///
    /// The `now >= end` check runs before any division, so a zero-length
    /// window yields 100 for every `now` past its start.
    pub fn expected_percent(&self, now: NaiveDateTime) -> u8 {
        if now <= self.start {
            return 0;
        }
        if now >= self.end {
            return 100;
        }
        let total = i128::from((self.end - self.start).num_milliseconds());
        let elapsed = i128::from((now - self.start).num_milliseconds());
        // sub-millisecond window
        if total <= 0 {
            return 100;
        }
        let pct = (200 * elapsed + total) / (2 * total);
        pct.clamp(0, 100) as u8
    }
}

pub fn expected_percent(
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<u8, ProgressError> {
    Ok(TimeWindow::new(start, end)?.expected_percent(now))
}

/// Tolerance bands used to classify progress. `actual` within
/// `on_track_tolerance` points of `expected` is on track; within
/// `at_risk_tolerance` it is at risk; anything further behind is off track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawThresholds")]
pub struct StatusThresholds {
    pub on_track_tolerance: u8,
    pub at_risk_tolerance: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawThresholds {
    on_track_tolerance: u8,
    at_risk_tolerance: u8,
}

impl Default for RawThresholds {
    fn default() -> Self {
        Self {
            on_track_tolerance: ON_TRACK_TOLERANCE,
            at_risk_tolerance: AT_RISK_TOLERANCE,
        }
    }
}

impl TryFrom<RawThresholds> for StatusThresholds {
    type Error = ProgressError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.on_track_tolerance, raw.at_risk_tolerance)
    }
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            on_track_tolerance: ON_TRACK_TOLERANCE,
            at_risk_tolerance: AT_RISK_TOLERANCE,
        }
    }
}

impl StatusThresholds {
    pub fn new(on_track_tolerance: u8, at_risk_tolerance: u8) -> Result<Self, ProgressError> {
        let thresholds = Self {
            on_track_tolerance,
            at_risk_tolerance,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ProgressError> {
        if self.on_track_tolerance > self.at_risk_tolerance {
            return Err(ProgressError::invalid(format!(
                "on-track tolerance {} exceeds at-risk tolerance {}",
                self.on_track_tolerance, self.at_risk_tolerance
            )));
        }
        if self.at_risk_tolerance > 100 {
            return Err(ProgressError::invalid(format!(
                "at-risk tolerance {} exceeds 100 points",
                self.at_risk_tolerance
            )));
        }
        Ok(())
    }

    /// First matching rule wins: no work items, fully done, nothing done,
    /// then the two tolerance bands. Both band boundaries are inclusive.
    pub fn classify(&self, actual: u8, expected: u8, total_units: usize) -> DerivedStatus {
        if total_units == 0 {
            return DerivedStatus::NotStarted;
        }
        if actual == 100 {
            return DerivedStatus::Completed;
        }
        if actual == 0 {
            return DerivedStatus::NotStarted;
        }

        let actual = i16::from(actual);
        let expected = i16::from(expected);
        if actual >= expected - i16::from(self.on_track_tolerance) {
            DerivedStatus::OnTrack
        } else if actual >= expected - i16::from(self.at_risk_tolerance) {
            DerivedStatus::AtRisk
        } else {
            DerivedStatus::OffTrack
        }
    }

    pub fn evaluate(&self, input: ProgressInput, window: &TimeWindow, now: NaiveDateTime) -> ProgressResult {
        let actual = input.percent();
        let expected = window.expected_percent(now);
        ProgressResult {
            actual,
            expected,
            status: self.classify(actual, expected, input.total_units),
        }
    }
}

pub fn classify_status(actual: u8, expected: u8, total_units: usize) -> DerivedStatus {
    StatusThresholds::default().classify(actual, expected, total_units)
}

/// Progress of a goal across every todo passed in.
pub fn goal_progress(
    goal: &Goal,
    todos: &[Todo],
    now: DateTime<Utc>,
    thresholds: &StatusThresholds,
) -> ProgressResult {
    let window = TimeWindow::from_due_date(goal.created_at, goal.target_date);
    thresholds.evaluate(ProgressInput::from_todos(todos), &window, now.naive_utc())
}

/// Progress of a milestone. Todos attached to other milestones, or to none,
/// are ignored.
pub fn milestone_progress(
    milestone: &Milestone,
    todos: &[Todo],
    now: DateTime<Utc>,
    thresholds: &StatusThresholds,
) -> ProgressResult {
    let window = TimeWindow::from_due_date(milestone.created_at, milestone.due_date);
    let input = ProgressInput::from_todos(
        todos
            .iter()
            .filter(|todo| todo.milestone_id == Some(milestone.id)),
    );
    thresholds.evaluate(input, &window, now.naive_utc())
}

/// Manually stored statuses win over the derived one; `not_started` is the
/// stored default and means "not overridden".
pub fn resolve_status(stored: StoredStatus, derived: DerivedStatus) -> StoredStatus {
    match stored {
        StoredStatus::NotStarted => StoredStatus::from(derived),
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRollup {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub percent: u8,
}

/// Completed-goal tally of an objective, counting only goals linked to it.
pub fn objective_rollup(objective: &Objective, goals: &[Goal]) -> ObjectiveRollup {
    let (total_goals, completed_goals) = goals
        .iter()
        .filter(|goal| goal.objective_id == Some(objective.id))
        .fold((0usize, 0usize), |(total, done), goal| {
            let done = done + usize::from(goal.status == StoredStatus::Completed);
            (total + 1, done)
        });
    ObjectiveRollup {
        total_goals,
        completed_goals,
        percent: percent_complete(total_goals, completed_goals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn percent_complete_rounds_half_up() {
        // 12.5 and 37.5
        assert_eq!(percent_complete(8, 1), 13);
        assert_eq!(percent_complete(8, 3), 38);
        // 0.5
        assert_eq!(percent_complete(200, 1), 1);
    }

    #[test]
    fn percent_complete_clamps_inconsistent_pairs() {
        assert_eq!(percent_complete(3, 7), 100);
        assert_eq!(percent_complete(0, 5), 0);
    }

    #[test]
    fn expected_percent_rounds_half_up_at_exact_half() {
        let start = at(2025, 1, 1, 0, 0);
        let end = start + Duration::hours(8);
        // 1h of 8h is 12.5%
        assert_eq!(expected_percent(start, end, start + Duration::hours(1)).unwrap(), 13);
    }

    #[test]
    fn clamped_window_collapses_onto_end() {
        let start = at(2025, 6, 1, 0, 0);
        let end = at(2025, 5, 1, 0, 0);
        let window = TimeWindow::clamped(start, end);
        assert_eq!(window.start(), end);
        assert_eq!(window.expected_percent(at(2025, 4, 1, 0, 0)), 0);
        assert_eq!(window.expected_percent(at(2025, 5, 15, 0, 0)), 100);
    }

    #[test]
    fn deserialized_window_is_checked() {
        let window: TimeWindow =
            serde_json::from_str(r#"{"start":"2025-01-01T00:00:00","end":"2025-06-01T00:00:00"}"#)
                .unwrap();
        assert_eq!(window.start(), at(2025, 1, 1, 0, 0));
        let inverted =
            serde_json::from_str::<TimeWindow>(r#"{"start":"2025-06-01T00:00:00","end":"2025-01-01T00:00:00"}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn deserialized_thresholds_are_checked() {
        let partial: StatusThresholds = serde_json::from_str(r#"{"onTrackTolerance":15}"#).unwrap();
        assert_eq!(partial, StatusThresholds::new(15, 25).unwrap());
        assert!(serde_json::from_str::<StatusThresholds>(r#"{"onTrackTolerance":30,"atRiskTolerance":20}"#).is_err());
        assert!(serde_json::from_str::<StatusThresholds>(r#"{"atRiskTolerance":101}"#).is_err());
    }

    #[test]
    fn thresholds_reject_inverted_bands() {
        assert!(StatusThresholds::new(30, 20).is_err());
        assert!(StatusThresholds::new(10, 101).is_err());
        assert!(StatusThresholds::new(5, 15).is_ok());
    }
}
