use crate::error::ProgressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status produced by classifying actual against expected progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStatus {
    NotStarted,
    OnTrack,
    AtRisk,
    OffTrack,
    Completed,
}

/// Status stored directly on an objective, goal or milestone. Unlike
/// [`DerivedStatus`] it includes `in_progress`, which is only ever set by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredStatus {
    #[default]
    NotStarted,
    InProgress,
    OnTrack,
    AtRisk,
    OffTrack,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Objective,
    Goal,
    Milestone,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Objective => "objective",
            EntityKind::Goal => "goal",
            EntityKind::Milestone => "milestone",
        }
    }
}

impl DerivedStatus {
    pub const ALL: [DerivedStatus; 5] = [
        DerivedStatus::NotStarted,
        DerivedStatus::OnTrack,
        DerivedStatus::AtRisk,
        DerivedStatus::OffTrack,
        DerivedStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        StoredStatus::from(self).as_str()
    }

    pub fn label(self) -> &'static str {
        StoredStatus::from(self).label()
    }

    pub fn bar_color(self) -> &'static str {
        StoredStatus::from(self).bar_color()
    }

    pub fn text_color(self) -> &'static str {
        StoredStatus::from(self).text_color()
    }

    pub fn badge_class(self) -> &'static str {
        StoredStatus::from(self).badge_class()
    }
}

impl StoredStatus {
    pub const ALL: [StoredStatus; 6] = [
        StoredStatus::NotStarted,
        StoredStatus::InProgress,
        StoredStatus::OnTrack,
        StoredStatus::AtRisk,
        StoredStatus::OffTrack,
        StoredStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoredStatus::NotStarted => "not_started",
            StoredStatus::InProgress => "in_progress",
            StoredStatus::OnTrack => "on_track",
            StoredStatus::AtRisk => "at_risk",
            StoredStatus::OffTrack => "off_track",
            StoredStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StoredStatus::NotStarted => "Not Started",
            StoredStatus::InProgress => "In Progress",
            StoredStatus::OnTrack => "On Track",
            StoredStatus::AtRisk => "At Risk",
            StoredStatus::OffTrack => "Off Track",
            StoredStatus::Completed => "Completed",
        }
    }

    /// Fill color of a progress bar.
    pub fn bar_color(self) -> &'static str {
        match self {
            StoredStatus::NotStarted => "bg-gray-300",
            StoredStatus::InProgress => "bg-blue-500",
            StoredStatus::OnTrack => "bg-green-500",
            StoredStatus::AtRisk => "bg-yellow-500",
            StoredStatus::OffTrack => "bg-red-500",
            StoredStatus::Completed => "bg-purple-500",
        }
    }

    pub fn text_color(self) -> &'static str {
        match self {
            StoredStatus::NotStarted => "text-gray-500",
            StoredStatus::InProgress => "text-blue-600",
            StoredStatus::OnTrack => "text-green-600",
            StoredStatus::AtRisk => "text-yellow-600",
            StoredStatus::OffTrack => "text-red-600",
            StoredStatus::Completed => "text-purple-600",
        }
    }

    /// Background and text classes of a status badge.
    pub fn badge_class(self) -> &'static str {
        match self {
            StoredStatus::NotStarted => "bg-gray-100 text-gray-700",
            StoredStatus::InProgress => "bg-blue-100 text-blue-700",
            StoredStatus::OnTrack => "bg-green-100 text-green-700",
            StoredStatus::AtRisk => "bg-yellow-100 text-yellow-700",
            StoredStatus::OffTrack => "bg-red-100 text-red-700",
            StoredStatus::Completed => "bg-purple-100 text-purple-700",
        }
    }

    /// Goals and objectives never store `at_risk`; milestones additionally
    /// never store `on_track`.
    pub fn is_settable_on(self, kind: EntityKind) -> bool {
        match (kind, self) {
            (_, StoredStatus::AtRisk) => false,
            (EntityKind::Milestone, StoredStatus::OnTrack) => false,
            (_, StoredStatus::NotStarted)
            | (_, StoredStatus::InProgress)
            | (_, StoredStatus::OnTrack)
            | (_, StoredStatus::OffTrack)
            | (_, StoredStatus::Completed) => true,
        }
    }
}

impl From<DerivedStatus> for StoredStatus {
    fn from(status: DerivedStatus) -> Self {
        match status {
            DerivedStatus::NotStarted => StoredStatus::NotStarted,
            DerivedStatus::OnTrack => StoredStatus::OnTrack,
            DerivedStatus::AtRisk => StoredStatus::AtRisk,
            DerivedStatus::OffTrack => StoredStatus::OffTrack,
            DerivedStatus::Completed => StoredStatus::Completed,
        }
    }
}

impl FromStr for StoredStatus {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "not_started" => Ok(StoredStatus::NotStarted),
            "in_progress" => Ok(StoredStatus::InProgress),
            "on_track" => Ok(StoredStatus::OnTrack),
            "at_risk" => Ok(StoredStatus::AtRisk),
            "off_track" => Ok(StoredStatus::OffTrack),
            "completed" => Ok(StoredStatus::Completed),
            other => Err(ProgressError::UnknownStatus(other.to_string())),
        }
    }
}

impl FromStr for DerivedStatus {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<StoredStatus>()? {
            StoredStatus::NotStarted => Ok(DerivedStatus::NotStarted),
            StoredStatus::OnTrack => Ok(DerivedStatus::OnTrack),
            StoredStatus::AtRisk => Ok(DerivedStatus::AtRisk),
            StoredStatus::OffTrack => Ok(DerivedStatus::OffTrack),
            StoredStatus::Completed => Ok(DerivedStatus::Completed),
            StoredStatus::InProgress => Err(ProgressError::invalid(
                "in_progress is set by hand and never derived",
            )),
        }
    }
}

impl fmt::Display for StoredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
