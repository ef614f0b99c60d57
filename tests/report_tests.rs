use chrono::{NaiveDate, TimeZone, Utc};
use compass_progress::{
    DerivedStatus, Goal, GoalSnapshot, Milestone, MilestoneKind, ProgressReport, StatusThresholds,
    StoredStatus, Todo, calendar::Quarter,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn build_snapshot() -> GoalSnapshot {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let goal = Goal::new("Learn Spanish", d(2025, 12, 31), created);
    let mut snapshot = GoalSnapshot::new(goal);

    let q2 = Milestone::new(snapshot.goal.id, "Hold a conversation", MilestoneKind::Quarterly, d(2025, 6, 30), created);
    let q1 = Milestone::new(snapshot.goal.id, "Finish A1 course", MilestoneKind::Quarterly, d(2025, 3, 31), created);
    let (q1_id, q2_id) = (q1.id, q2.id);
    snapshot.milestones.push(q2);
    snapshot.milestones.push(q1);

    for i in 0..20 {
        let mut todo = Todo::new(snapshot.goal.id, format!("lesson {i}"), created);
        todo.completed = i < 10;
        todo.milestone_id = match i {
            0..=3 => Some(q1_id),
            4..=11 => Some(q2_id),
            _ => None,
        };
        if i == 12 {
            todo.due_date = Some(d(2025, 6, 1));
        }
        snapshot.todos.push(todo);
    }
    snapshot
}

#[test]
fn report_covers_goal_and_milestones() {
    let snapshot = build_snapshot();
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
    let report = ProgressReport::build(&snapshot, now, &StatusThresholds::default());

    assert_eq!(report.goal_title, "Learn Spanish");
    assert_eq!(report.progress.actual, 50);
    assert_eq!(report.progress.status, DerivedStatus::OnTrack);
    assert_eq!(report.display_status, StoredStatus::OnTrack);
    assert_eq!(report.todos.total_units, 20);
    assert_eq!(report.todos.completed_units, 10);
    assert_eq!(report.overdue_todos, 1);
    assert_eq!(report.days_until_target, 183);

    // sorted by due date
    assert_eq!(report.milestones[0].title, "Finish A1 course");
    assert_eq!(report.milestones[0].quarter, Quarter::Q1);
    assert_eq!(report.milestones[0].progress.status, DerivedStatus::Completed);
    assert_eq!(report.milestones[1].progress.actual, 75);
    assert_eq!(report.milestones[1].progress.expected, 100);
    assert_eq!(report.milestones[1].progress.status, DerivedStatus::AtRisk);
    assert_eq!(report.milestones[1].days_until_due, -1);

    assert_eq!(report.milestone_statuses.completed, 1);
    assert_eq!(report.milestone_statuses.at_risk, 1);
    assert_eq!(report.milestone_statuses.total(), 2);
}

#[test]
fn stored_goal_status_overrides_report_display() {
    let mut snapshot = build_snapshot();
    snapshot.goal.status = StoredStatus::InProgress;
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
    let report = ProgressReport::build(&snapshot, now, &StatusThresholds::default());
    assert_eq!(report.display_status, StoredStatus::InProgress);
    assert_eq!(report.progress.status, DerivedStatus::OnTrack);
}

#[test]
fn cli_summary_and_table() {
    let snapshot = build_snapshot();
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
    let report = ProgressReport::build(&snapshot, now, &StatusThresholds::default());

    let summary = report.to_cli_summary();
    assert!(summary.starts_with("status=on_track, actual=50%"), "{summary}");
    assert!(summary.contains("todos=10/20"));
    assert!(summary.contains("overdue=1"));
    assert!(summary.contains("due_in=183d"));
    assert!(summary.contains("milestones[on_track=0 at_risk=1 off_track=0 completed=1 not_started=0]"));

    let table = report.render_table();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("| title"));
    assert!(lines[3].contains("Finish A1 course"));
    assert!(lines[4].contains("At Risk"));
    assert!(lines.iter().all(|l| l.len() == lines[0].len()));
}

#[test]
fn overdue_goal_reports_late_days() {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let snapshot = GoalSnapshot::new(Goal::new("Tax return", d(2025, 4, 15), created));
    let now = Utc.with_ymd_and_hms(2025, 4, 20, 10, 0, 0).unwrap();
    let report = ProgressReport::build(&snapshot, now, &StatusThresholds::default());
    assert_eq!(report.progress.status, DerivedStatus::NotStarted);
    assert!(report.to_cli_summary().contains("late_by=5d"));
    assert!(report.milestones.is_empty());
}
