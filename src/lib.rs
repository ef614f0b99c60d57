pub mod calendar;
pub mod config;
pub mod error;
pub mod import;
pub mod plan;
pub mod progress;
pub mod records;
pub mod report;
pub mod status;
pub mod validation;
pub mod week;

pub use calendar::Quarter;
pub use config::{ProgressConfig, load_config, save_config};
pub use error::ProgressError;
pub use import::{
    GoalSnapshot, ImportError, ImportResult, load_snapshot_from_json, load_todos_from_csv,
    save_snapshot_to_json,
};
pub use plan::{AcceptedPlan, PlanningPhase, PlanningResponse, accept_plan, parse_planning_reply};
pub use progress::{
    ObjectiveRollup, ProgressInput, ProgressResult, StatusThresholds, TimeWindow, classify_status,
    expected_percent, goal_progress, milestone_progress, objective_rollup, percent_complete,
    resolve_status,
};
pub use records::{CheckIn, Goal, Milestone, MilestoneKind, Objective, Todo};
pub use report::ProgressReport;
pub use status::{DerivedStatus, EntityKind, StoredStatus};
pub use validation::ValidationError;
