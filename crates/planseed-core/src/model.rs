use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Review status of a weekly plan.
///
/// The downstream tracker knows all four states; the generator only ever
/// emits `Approved` or `Pending` (seeded plans are past submission).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for PlanStatus {
    type Err = PlanStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(PlanStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PlanStatus`] string.
#[derive(Debug, Clone)]
pub struct PlanStatusParseError(pub String);

impl fmt::Display for PlanStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan status: {:?}", self.0)
    }
}

impl std::error::Error for PlanStatusParseError {}

// ---------------------------------------------------------------------------

/// Category of a task within a weekly plan.
///
/// The tracker stores the Chinese labels verbatim, so `Display`, `FromStr`,
/// and the serde representation all use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    /// "關鍵職責" -- core/priority work, counted into the key-hour ratio.
    #[serde(rename = "關鍵職責")]
    KeyResponsibility,
    /// "其他事項" -- everything else.
    #[serde(rename = "其他事項")]
    Other,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::KeyResponsibility => "關鍵職責",
            Self::Other => "其他事項",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskCategory {
    type Err = TaskCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "關鍵職責" => Ok(Self::KeyResponsibility),
            "其他事項" => Ok(Self::Other),
            other => Err(TaskCategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskCategory`] string.
#[derive(Debug, Clone)]
pub struct TaskCategoryParseError(pub String);

impl fmt::Display for TaskCategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task category: {:?}", self.0)
    }
}

impl std::error::Error for TaskCategoryParseError {}

// ---------------------------------------------------------------------------

/// Priority of a task, stored as the Chinese single-character labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "高")]
    High,
    #[serde(rename = "中")]
    Medium,
    #[serde(rename = "低")]
    Low,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskPriority {
    type Err = TaskPriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "高" => Ok(Self::High),
            "中" => Ok(Self::Medium),
            "低" => Ok(Self::Low),
            other => Err(TaskPriorityParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskPriority`] string.
#[derive(Debug, Clone)]
pub struct TaskPriorityParseError(pub String);

impl fmt::Display for TaskPriorityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task priority: {:?}", self.0)
    }
}

impl std::error::Error for TaskPriorityParseError {}

// ---------------------------------------------------------------------------

/// Completion progress of a task.
///
/// The tracker records progress on a fixed four-step scale and serializes
/// it as the bare percentage, so serde goes through `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Progress {
    NotStarted,
    Halfway,
    NearlyDone,
    Done,
}

impl Progress {
    /// All steps, in ascending order.
    pub const ALL: [Progress; 4] = [
        Progress::NotStarted,
        Progress::Halfway,
        Progress::NearlyDone,
        Progress::Done,
    ];

    /// The percentage this step represents.
    pub const fn percent(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Halfway => 50,
            Self::NearlyDone => 80,
            Self::Done => 100,
        }
    }

    /// Whether the task is fully done (progress = 100).
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<Progress> for u8 {
    fn from(p: Progress) -> Self {
        p.percent()
    }
}

impl TryFrom<u8> for Progress {
    type Error = ProgressParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotStarted),
            50 => Ok(Self::Halfway),
            80 => Ok(Self::NearlyDone),
            100 => Ok(Self::Done),
            other => Err(ProgressParseError(other)),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.percent())
    }
}

/// Error returned when a percentage is not one of the four progress steps.
#[derive(Debug, Clone)]
pub struct ProgressParseError(pub u8);

impl fmt::Display for ProgressParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid progress percent: {} (expected 0, 50, 80, or 100)",
            self.0
        )
    }
}

impl std::error::Error for ProgressParseError {}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One work item within a weekly plan.
///
/// Serialized into the plan's `tasks` JSON column with the camelCase field
/// names the tracker reads back (`actualHours`, `notDoneReason`). Field
/// order matters: the tracker's import diff tooling compares raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub name: String,
    pub outcome: String,
    /// Estimated hours, 1 decimal.
    pub hours: f64,
    /// Reported hours, 1 decimal.
    pub actual_hours: f64,
    pub progress: Progress,
    /// Present exactly when `progress` is below 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_done_reason: Option<String>,
}

impl Task {
    /// Whether this task counts toward the key-hour ratio.
    pub fn is_key(&self) -> bool {
        self.category == TaskCategory::KeyResponsibility
    }
}

/// One week's submitted work-hour record for a user.
///
/// Created once per generated week and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    /// Human-readable range label, e.g. "1月1日 - 1月7日".
    pub week_range: String,
    pub week_start: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    /// Always equal to `submitted_at` in seeded data.
    pub updated_at: DateTime<Utc>,
    pub status: PlanStatus,
    /// Non-empty exactly when the plan is approved.
    pub review_comment: String,
    /// Total planned hours for the week, 1 decimal. Drawn independently of
    /// the per-task estimates, so it is not their sum.
    pub total_hours: f64,
    /// Share of `total_hours` planned on key-responsibility tasks, percent
    /// rounded to 1 decimal.
    pub key_ratio: f64,
    pub tasks: Vec<Task>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
