//! Randomized weekly-plan generation.
//!
//! Produces one [`WeeklyPlan`] per week for a single user, with task counts,
//! hours, categories and progress drawn from the same distributions the
//! tracker's demo data uses. All randomness flows through one [`StdRng`], so
//! an explicit seed reproduces the exact batch, ids included.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{CalendarError, WeekDates};
use crate::model::{PlanStatus, Progress, Task, TaskCategory, TaskPriority, WeeklyPlan};
use crate::roster::Profile;
use crate::stats::{key_ratio, round1};

/// Number of weeks generated when nothing else is configured.
pub const DEFAULT_WEEKS: u32 = 52;

/// Series start used when nothing else is configured (a Wednesday).
pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("2025-01-01 is a valid date")
}

// Draw ranges. Bounds are inclusive; hour draws are rounded to one decimal.
const WEEK_HOURS: RangeInclusive<f64> = 30.0..=45.0;
const TASKS_PER_WEEK: RangeInclusive<u32> = 3..=6;
const TASK_HOURS: RangeInclusive<f64> = 2.0..=10.0;
const ACTUAL_FACTOR: RangeInclusive<f64> = 0.8..=1.2;

/// Comment attached to plans that come out approved.
const REVIEW_COMMENT_APPROVED: &str = "本週執行狀況良好，繼續保持。";
/// Reason attached to every task below 100% progress.
const NOT_DONE_REASON: &str = "時間不足";

/// Errors from generating a batch of plans.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// What to generate: who the plans belong to and which weeks they cover.
#[derive(Debug, Clone)]
pub struct SeedParams {
    /// Profile the plans are attributed to.
    pub user: Profile,
    /// First day of week 0.
    pub start: NaiveDate,
    /// Number of consecutive weeks to generate.
    pub weeks: u32,
}

/// Generator for one batch of weekly plans.
pub struct Generator {
    params: SeedParams,
    rng: StdRng,
}

impl Generator {
    /// Create a generator. With `Some(seed)` the batch is fully
    /// reproducible; without, draws come from OS entropy.
    pub fn new(params: SeedParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { params, rng }
    }

    /// Generate one plan per configured week, in week order.
    pub fn generate(&mut self) -> Result<Vec<WeeklyPlan>, GenerateError> {
        let mut plans = Vec::with_capacity(self.params.weeks as usize);
        for index in 0..self.params.weeks {
            let plan = self.week_plan(index)?;
            tracing::debug!(
                week = index,
                start = %plan.week_start,
                status = %plan.status,
                tasks = plan.tasks.len(),
                "generated weekly plan"
            );
            plans.push(plan);
        }
        Ok(plans)
    }

    fn week_plan(&mut self, index: u32) -> Result<WeeklyPlan, GenerateError> {
        let week = WeekDates::for_index(self.params.start, index)?;
        let week_range = week.range_label();

        let id = self.next_uuid();
        // 3 in 4 plans come out approved, the rest stay pending review.
        let status = if self.rng.random_range(0..4) < 3 {
            PlanStatus::Approved
        } else {
            PlanStatus::Pending
        };
        // The weekly total is drawn on its own; task hours do not sum to it.
        let total_hours = round1(self.rng.random_range(WEEK_HOURS));

        let task_count = self.rng.random_range(TASKS_PER_WEEK);
        let mut tasks = Vec::with_capacity(task_count as usize);
        for number in 1..=task_count {
            tasks.push(self.task(number, &week_range));
        }

        let review_comment = if status == PlanStatus::Approved {
            REVIEW_COMMENT_APPROVED.to_string()
        } else {
            String::new()
        };

        Ok(WeeklyPlan {
            id,
            user_id: self.params.user.id,
            user_name: self.params.user.name.clone(),
            week_range,
            week_start: week.start,
            submitted_at: week.submitted_at,
            updated_at: week.submitted_at,
            status,
            review_comment,
            total_hours,
            key_ratio: key_ratio(&tasks, total_hours),
            tasks,
        })
    }

    fn task(&mut self, number: u32, week_range: &str) -> Task {
        // 2 in 3 tasks land on the key-responsibility category.
        let category = if self.rng.random_range(0..3) < 2 {
            TaskCategory::KeyResponsibility
        } else {
            TaskCategory::Other
        };
        let hours = round1(self.rng.random_range(TASK_HOURS));
        let actual_hours = round1(hours * self.rng.random_range(ACTUAL_FACTOR));
        // Half of all tasks finish; the rest spread evenly over 0/50/80.
        let progress = match self.rng.random_range(0..6) {
            0 => Progress::NotStarted,
            1 => Progress::Halfway,
            2 => Progress::NearlyDone,
            _ => Progress::Done,
        };
        let priority = match self.rng.random_range(0..3) {
            0 => TaskPriority::High,
            1 => TaskPriority::Medium,
            _ => TaskPriority::Low,
        };

        Task {
            id: self.next_uuid(),
            category,
            priority,
            name: format!("執行專案開發任務 {number} - {week_range}"),
            outcome: format!("完成階段性功能 {number} 並通過測試"),
            hours,
            actual_hours,
            progress,
            not_done_reason: (!progress.is_done()).then(|| NOT_DONE_REASON.to_string()),
        }
    }

    /// Random v4 uuid drawn from the generator's own rng, so seeded runs
    /// reproduce ids too.
    fn next_uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
