use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use compass_progress::{
    DerivedStatus, Goal, Milestone, MilestoneKind, Objective, ProgressInput, StatusThresholds,
    StoredStatus, TimeWindow, Todo, classify_status, expected_percent, goal_progress,
    milestone_progress, objective_rollup, percent_complete, resolve_status,
};
use uuid::Uuid;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn midnight(y: i32, m: u32, day: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(0, 0, 0).unwrap()
}

fn utc(y: i32, m: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, 0, 0, 0).unwrap()
}

fn todos(goal_id: Uuid, total: usize, completed: usize) -> Vec<Todo> {
    (0..total)
        .map(|i| {
            let mut todo = Todo::new(goal_id, format!("todo {i}"), utc(2025, 1, 1));
            todo.completed = i < completed;
            todo
        })
        .collect()
}

#[test]
fn percent_complete_full_and_empty() {
    for total in 1..=50 {
        assert_eq!(percent_complete(total, total), 100);
        assert_eq!(percent_complete(total, 0), 0);
    }
    assert_eq!(percent_complete(0, 0), 0);
}

#[test]
fn percent_complete_rounds_to_nearest() {
    assert_eq!(percent_complete(3, 1), 33);
    assert_eq!(percent_complete(3, 2), 67);
    assert_eq!(percent_complete(4, 1), 25);
    assert_eq!(percent_complete(8, 1), 13);
}

#[test]
fn progress_input_counts_completed_todos() {
    let goal_id = Uuid::new_v4();
    let input = ProgressInput::from_todos(&todos(goal_id, 5, 2));
    assert_eq!(input, ProgressInput::new(5, 2));
    assert_eq!(input.percent(), 40);
}

#[test]
fn expected_percent_before_start_and_after_end() {
    let start = midnight(2025, 1, 1);
    let end = midnight(2025, 12, 31);
    assert_eq!(expected_percent(start, end, start).unwrap(), 0);
    assert_eq!(expected_percent(start, end, start - Duration::days(30)).unwrap(), 0);
    assert_eq!(expected_percent(start, end, end).unwrap(), 100);
    assert_eq!(expected_percent(start, end, end + Duration::days(1)).unwrap(), 100);
}

#[test]
fn expected_percent_near_midpoint() {
    let pct = expected_percent(midnight(2025, 1, 1), midnight(2025, 12, 31), midnight(2025, 7, 1))
        .unwrap();
    assert!(pct > 45 && pct < 55, "got {pct}");
}

#[test]
fn zero_length_window_is_zero_at_start_and_full_after() {
    let at = midnight(2025, 3, 1);
    assert_eq!(expected_percent(at, at, at).unwrap(), 0);
    assert_eq!(expected_percent(at, at, at + Duration::seconds(1)).unwrap(), 100);
    assert_eq!(expected_percent(at, at, at - Duration::seconds(1)).unwrap(), 0);
}

#[test]
fn inverted_window_is_rejected() {
    let err = TimeWindow::new(midnight(2025, 6, 1), midnight(2025, 1, 1)).unwrap_err();
    assert!(err.to_string().starts_with("invalid argument"));
    assert!(expected_percent(midnight(2025, 6, 1), midnight(2025, 1, 1), midnight(2025, 3, 1)).is_err());
}

#[test]
fn classify_without_work_items_is_not_started() {
    for (actual, expected) in [(0, 0), (50, 50), (100, 0), (10, 90)] {
        assert_eq!(classify_status(actual, expected, 0), DerivedStatus::NotStarted);
    }
    assert_eq!(classify_status(0, 50, 10), DerivedStatus::NotStarted);
    assert_eq!(classify_status(100, 50, 10), DerivedStatus::Completed);
}

#[test]
fn classify_band_boundaries_are_inclusive() {
    assert_eq!(classify_status(45, 55, 10), DerivedStatus::OnTrack);
    assert_eq!(classify_status(44, 55, 10), DerivedStatus::AtRisk);
    assert_eq!(classify_status(30, 55, 10), DerivedStatus::AtRisk);
    assert_eq!(classify_status(29, 55, 10), DerivedStatus::OffTrack);
    assert_eq!(classify_status(20, 55, 10), DerivedStatus::OffTrack);
}

#[test]
fn classify_just_started_and_exactly_on_schedule() {
    // nothing is expected yet
    for actual in [1, 10, 99] {
        assert_eq!(classify_status(actual, 0, 4), DerivedStatus::OnTrack);
    }
    assert_eq!(classify_status(60, 60, 5), DerivedStatus::OnTrack);
    assert_eq!(classify_status(90, 40, 5), DerivedStatus::OnTrack);
}

#[test]
fn custom_thresholds_shift_the_bands() {
    let strict = StatusThresholds::new(5, 15).unwrap();
    assert_eq!(strict.classify(50, 55, 10), DerivedStatus::OnTrack);
    assert_eq!(strict.classify(49, 55, 10), DerivedStatus::AtRisk);
    assert_eq!(strict.classify(39, 55, 10), DerivedStatus::OffTrack);
    assert_eq!(StatusThresholds::default(), StatusThresholds::new(10, 25).unwrap());
}

#[test]
fn half_done_goal_at_midyear_is_on_track() {
    let goal = Goal::new("Learn Spanish", d(2025, 12, 31), utc(2025, 1, 1));
    let items = todos(goal.id, 20, 10);
    let result = goal_progress(&goal, &items, utc(2025, 7, 1), &StatusThresholds::default());
    assert_eq!(result.actual, 50);
    assert!((45..=55).contains(&result.expected), "got {}", result.expected);
    assert_eq!(result.status, DerivedStatus::OnTrack);
}

#[test]
fn goal_past_due_expects_everything() {
    let goal = Goal::new("Ship v1", d(2025, 3, 31), utc(2025, 1, 1));
    let items = todos(goal.id, 4, 1);
    let result = goal_progress(&goal, &items, utc(2025, 4, 15), &StatusThresholds::default());
    assert_eq!(result.expected, 100);
    assert_eq!(result.actual, 25);
    assert_eq!(result.status, DerivedStatus::OffTrack);
}

#[test]
fn goal_due_before_creation_uses_collapsed_window() {
    let goal = Goal::new("Backfilled", d(2024, 12, 1), utc(2025, 1, 1));
    let items = todos(goal.id, 2, 1);
    let result = goal_progress(&goal, &items, utc(2025, 1, 2), &StatusThresholds::default());
    assert_eq!(result.expected, 100);
    assert_eq!(result.status, DerivedStatus::OffTrack);
}

#[test]
fn milestone_counts_only_its_own_todos() {
    let goal = Goal::new("Run a marathon", d(2025, 12, 31), utc(2025, 1, 1));
    let milestone = Milestone::new(
        goal.id,
        "10k race",
        MilestoneKind::Quarterly,
        d(2025, 3, 31),
        utc(2025, 1, 1),
    );
    let mut items = todos(goal.id, 6, 3);
    items[0].milestone_id = Some(milestone.id);
    items[1].milestone_id = Some(milestone.id);
    items[3].milestone_id = Some(milestone.id);
    items[4].milestone_id = Some(Uuid::new_v4());

    let result = milestone_progress(&milestone, &items, utc(2025, 2, 14), &StatusThresholds::default());
    // todos 0 and 1 done, todo 3 open
    assert_eq!(result.actual, 67);
    assert_eq!(result.status, DerivedStatus::OnTrack);

    let empty = Milestone::new(goal.id, "Empty", MilestoneKind::Monthly, d(2025, 2, 28), utc(2025, 1, 1));
    let result = milestone_progress(&empty, &items, utc(2025, 2, 14), &StatusThresholds::default());
    assert_eq!(result.actual, 0);
    assert_eq!(result.status, DerivedStatus::NotStarted);
}

#[test]
fn stored_status_overrides_derived_one() {
    assert_eq!(
        resolve_status(StoredStatus::NotStarted, DerivedStatus::AtRisk),
        StoredStatus::AtRisk
    );
    assert_eq!(
        resolve_status(StoredStatus::InProgress, DerivedStatus::OffTrack),
        StoredStatus::InProgress
    );
    assert_eq!(
        resolve_status(StoredStatus::Completed, DerivedStatus::OnTrack),
        StoredStatus::Completed
    );

    let mut goal = Goal::new("Save for a trip", d(2025, 9, 1), utc(2025, 1, 1));
    assert_eq!(goal.status_override(), None);
    goal.status = StoredStatus::OffTrack;
    assert_eq!(goal.status_override(), Some(StoredStatus::OffTrack));
}

#[test]
fn objective_rollup_counts_linked_completed_goals() {
    let objective = Objective {
        id: Uuid::new_v4(),
        title: "Get fit".into(),
        description: None,
        status: StoredStatus::InProgress,
        created_at: utc(2025, 1, 1),
    };
    let mut goals: Vec<Goal> = (0..4)
        .map(|i| {
            let mut goal = Goal::new(format!("goal {i}"), d(2025, 12, 31), utc(2025, 1, 1));
            goal.objective_id = Some(objective.id);
            goal
        })
        .collect();
    goals[0].status = StoredStatus::Completed;
    goals[1].status = StoredStatus::OnTrack;
    let mut unrelated = Goal::new("other", d(2025, 12, 31), utc(2025, 1, 1));
    unrelated.status = StoredStatus::Completed;
    goals.push(unrelated);

    let rollup = objective_rollup(&objective, &goals);
    assert_eq!(rollup.total_goals, 4);
    assert_eq!(rollup.completed_goals, 1);
    assert_eq!(rollup.percent, 25);
}

#[test]
fn progress_result_serializes_camel_case() {
    let goal = Goal::new("Read 12 books", d(2025, 12, 31), utc(2025, 1, 1));
    let items = todos(goal.id, 12, 12);
    let result = goal_progress(&goal, &items, utc(2025, 6, 1), &StatusThresholds::default());
    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["actual"], 100);
    assert_eq!(json["status"], "completed");
}
