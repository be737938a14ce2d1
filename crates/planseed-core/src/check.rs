//! Invariant checks over a batch of plans.
//!
//! Used by the `check` command to validate a seed file after the fact:
//! every rule the generator upholds is re-verified here against whatever
//! was parsed back, so hand edits that break the data shape get reported
//! row by row instead of failing somewhere inside the tracker.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::calendar::WeekDates;
use crate::model::{PlanStatus, WeeklyPlan};
use crate::stats::{key_ratio, round1};

/// One broken invariant, tied back to the plan it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    /// Zero-based position of the plan in the batch.
    pub plan_index: usize,
    /// Id of the offending plan.
    pub plan_id: Uuid,
    /// What was wrong, in one line.
    pub message: String,
}

/// Outcome of checking a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of plans checked.
    pub plans: usize,
    /// Number of tasks checked across all plans.
    pub tasks: usize,
    /// Every broken invariant found, in batch order.
    pub failures: Vec<CheckFailure>,
}

impl CheckReport {
    /// True when no invariant was broken.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compare at one-decimal precision, the precision everything is stored at.
fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

/// Check every seeded invariant over `plans`.
///
/// With `expected_start` the series is anchored to that date; otherwise the
/// first plan's `week_start` anchors it and only the 7-day cadence is
/// enforced.
pub fn check_plans(plans: &[WeeklyPlan], expected_start: Option<NaiveDate>) -> CheckReport {
    let mut failures = Vec::new();
    let mut tasks = 0usize;

    let anchor = expected_start.or_else(|| plans.first().map(|p| p.week_start));

    for (index, plan) in plans.iter().enumerate() {
        let mut fail = |message: String| {
            failures.push(CheckFailure {
                plan_index: index,
                plan_id: plan.id,
                message,
            });
        };

        // Series cadence.
        if let Some(anchor) = anchor {
            match WeekDates::for_index(anchor, index as u32) {
                Ok(expected) if plan.week_start == expected.start => {}
                Ok(expected) => fail(format!(
                    "week_start {} breaks the 7-day cadence (expected {})",
                    plan.week_start, expected.start
                )),
                Err(e) => fail(format!("cannot derive expected week dates: {e}")),
            }
        }

        // Self-consistency of the week's own dates.
        match WeekDates::for_index(plan.week_start, 0) {
            Ok(own) => {
                if plan.week_range != own.range_label() {
                    fail(format!(
                        "week_range {:?} does not match week_start {} (expected {:?})",
                        plan.week_range,
                        plan.week_start,
                        own.range_label()
                    ));
                }
                if plan.submitted_at != own.submitted_at {
                    fail(format!(
                        "submitted_at {} is not 10:00 UTC on the day before week_start",
                        plan.submitted_at
                    ));
                }
            }
            Err(e) => fail(format!("week_start {} is unusable: {e}", plan.week_start)),
        }
        if plan.updated_at != plan.submitted_at {
            fail(format!(
                "updated_at {} differs from submitted_at {}",
                plan.updated_at, plan.submitted_at
            ));
        }

        // Status and review comment.
        match plan.status {
            PlanStatus::Approved => {
                if plan.review_comment.is_empty() {
                    fail("approved plan has an empty review_comment".to_string());
                }
            }
            PlanStatus::Pending => {
                if !plan.review_comment.is_empty() {
                    fail("pending plan carries a review_comment".to_string());
                }
            }
            other => fail(format!("status {other} is not a seeded status")),
        }

        // Hours and ratio.
        if !(30.0..=45.0).contains(&plan.total_hours) {
            fail(format!("total_hours {} outside 30.0..=45.0", plan.total_hours));
        }
        if round1(plan.total_hours) != plan.total_hours {
            fail(format!(
                "total_hours {} has more than one decimal",
                plan.total_hours
            ));
        }
        let expected_ratio = key_ratio(&plan.tasks, plan.total_hours);
        if tenths(plan.key_ratio) != tenths(expected_ratio) {
            fail(format!(
                "key_ratio {} does not match the tasks (expected {expected_ratio})",
                plan.key_ratio
            ));
        }

        // Tasks.
        if !(3..=6).contains(&plan.tasks.len()) {
            fail(format!("expected 3..=6 tasks, found {}", plan.tasks.len()));
        }
        for (task_index, task) in plan.tasks.iter().enumerate() {
            tasks += 1;
            if !(2.0..=10.0).contains(&task.hours) {
                fail(format!(
                    "task {task_index}: hours {} outside 2.0..=10.0",
                    task.hours
                ));
            }
            if round1(task.hours) != task.hours || round1(task.actual_hours) != task.actual_hours
            {
                fail(format!(
                    "task {task_index}: hours are not rounded to one decimal"
                ));
            }
            // Both draws are rounded, which widens the band by half a tenth.
            if task.actual_hours < task.hours * 0.8 - 0.05
                || task.actual_hours > task.hours * 1.2 + 0.05
            {
                fail(format!(
                    "task {task_index}: actual_hours {} outside the 80%..120% band of {}",
                    task.actual_hours, task.hours
                ));
            }
            match (&task.not_done_reason, task.progress.is_done()) {
                (Some(_), true) => {
                    fail(format!("task {task_index}: finished task carries a notDoneReason"))
                }
                (None, false) => {
                    fail(format!("task {task_index}: unfinished task is missing a notDoneReason"))
                }
                _ => {}
            }
        }

        // Single-user batch.
        if let Some(first) = plans.first() {
            if plan.user_id != first.user_id || plan.user_name != first.user_name {
                fail(format!(
                    "user {} ({}) differs from the first plan's user",
                    plan.user_name, plan.user_id
                ));
            }
        }
    }

    CheckReport {
        plans: plans.len(),
        tasks,
        failures,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{Generator, SeedParams, default_start};
    use crate::roster;

    fn batch(weeks: u32) -> Vec<WeeklyPlan> {
        Generator::new(
            SeedParams {
                user: roster::find_user("ken").unwrap(),
                start: default_start(),
                weeks,
            },
            Some(1234),
        )
        .generate()
        .unwrap()
    }

    fn failing_messages(report: &CheckReport) -> Vec<String> {
        report.failures.iter().map(|f| f.message.clone()).collect()
    }

    fn assert_flags(plans: &[WeeklyPlan], fragment: &str) {
        let report = check_plans(plans, Some(default_start()));
        assert!(
            report
                .failures
                .iter()
                .any(|f| f.message.contains(fragment)),
            "expected a failure mentioning {fragment:?}, got: {:?}",
            failing_messages(&report)
        );
    }

    #[test]
    fn a_generated_batch_passes() {
        let plans = batch(52);
        let report = check_plans(&plans, Some(default_start()));
        assert!(report.is_ok(), "failures: {:?}", failing_messages(&report));
        assert_eq!(report.plans, 52);
        assert_eq!(
            report.tasks,
            plans.iter().map(|p| p.tasks.len()).sum::<usize>()
        );
    }

    #[test]
    fn the_anchor_defaults_to_the_first_plan() {
        let plans = batch(6);
        assert!(check_plans(&plans, None).is_ok());
    }

    #[test]
    fn an_empty_batch_is_ok() {
        let report = check_plans(&[], None);
        assert!(report.is_ok());
        assert_eq!(report.plans, 0);
    }

    #[test]
    fn flags_a_broken_cadence() {
        let mut plans = batch(4);
        plans[2].week_start = plans[2].week_start.succ_opt().unwrap();
        assert_flags(&plans, "7-day cadence");
    }

    #[test]
    fn flags_a_wrong_anchor() {
        let plans = batch(2);
        let other_start = "2025-02-05".parse().unwrap();
        let report = check_plans(&plans, Some(other_start));
        assert!(!report.is_ok());
    }

    #[test]
    fn flags_a_mismatched_label() {
        let mut plans = batch(2);
        plans[1].week_range = "1月1日 - 1月7日".to_string();
        assert_flags(&plans, "does not match week_start");
    }

    #[test]
    fn flags_a_shifted_submission_time() {
        let mut plans = batch(2);
        plans[0].submitted_at = "2024-12-31T11:00:00Z".parse().unwrap();
        plans[0].updated_at = plans[0].submitted_at;
        assert_flags(&plans, "not 10:00 UTC");
    }

    #[test]
    fn flags_diverging_timestamps() {
        let mut plans = batch(2);
        plans[1].updated_at = "2025-06-01T09:30:00Z".parse().unwrap();
        assert_flags(&plans, "differs from submitted_at");
    }

    #[test]
    fn flags_an_unseeded_status() {
        let mut plans = batch(2);
        plans[0].status = PlanStatus::Draft;
        assert_flags(&plans, "not a seeded status");
    }

    #[test]
    fn flags_a_comment_on_a_pending_plan() {
        let mut plans = batch(8);
        for plan in &mut plans {
            match plan.status {
                PlanStatus::Approved => plan.review_comment.clear(),
                _ => plan.review_comment = "looks fine".to_string(),
            }
        }
        assert_flags(&plans, "review_comment");
    }

    #[test]
    fn flags_totals_out_of_range() {
        let mut plans = batch(2);
        plans[0].total_hours = 61.0;
        plans[0].key_ratio = key_ratio(&plans[0].tasks, plans[0].total_hours);
        assert_flags(&plans, "outside 30.0..=45.0");
    }

    #[test]
    fn flags_a_ratio_that_ignores_the_tasks() {
        let mut plans = batch(2);
        plans[1].key_ratio += 7.7;
        assert_flags(&plans, "does not match the tasks");
    }

    #[test]
    fn flags_a_thin_task_list() {
        let mut plans = batch(2);
        plans[0].tasks.truncate(2);
        plans[0].key_ratio = key_ratio(&plans[0].tasks, plans[0].total_hours);
        assert_flags(&plans, "expected 3..=6 tasks");
    }

    #[test]
    fn flags_task_hours_out_of_range() {
        let mut plans = batch(2);
        plans[0].tasks[0].hours = 12.5;
        plans[0].tasks[0].actual_hours = 12.5;
        plans[0].key_ratio = key_ratio(&plans[0].tasks, plans[0].total_hours);
        assert_flags(&plans, "outside 2.0..=10.0");
    }

    #[test]
    fn flags_actuals_outside_the_band() {
        let mut plans = batch(2);
        plans[0].tasks[0].hours = 5.0;
        plans[0].tasks[0].actual_hours = 9.5;
        plans[0].key_ratio = key_ratio(&plans[0].tasks, plans[0].total_hours);
        assert_flags(&plans, "80%..120% band");
    }

    #[test]
    fn flags_a_missing_reason() {
        let mut plans = batch(8);
        for plan in &mut plans {
            for task in &mut plan.tasks {
                task.not_done_reason = None;
            }
        }
        // 8 weeks hold at least 24 tasks; the fixed seed leaves some of
        // them unfinished.
        assert_flags(&plans, "missing a notDoneReason");
    }

    #[test]
    fn flags_a_reason_on_a_finished_task() {
        let mut plans = batch(8);
        for plan in &mut plans {
            for task in &mut plan.tasks {
                task.not_done_reason = Some("時間不足".to_string());
            }
        }
        assert_flags(&plans, "finished task carries");
    }

    #[test]
    fn flags_a_second_user_in_the_batch() {
        let mut plans = batch(3);
        plans[2].user_name = "Jenny".to_string();
        assert_flags(&plans, "differs from the first plan's user");
    }
}
