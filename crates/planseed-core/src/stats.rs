//! Aggregate figures over generated plans, for summaries and checks.

use crate::model::{PlanStatus, Task, WeeklyPlan};

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of planned hours spent on key-responsibility tasks, in percent,
/// rounded to one decimal. Zero when there are no planned hours.
pub fn key_ratio(tasks: &[Task], total_hours: f64) -> f64 {
    if total_hours <= 0.0 {
        return 0.0;
    }
    let key_hours: f64 = tasks.iter().filter(|t| t.is_key()).map(|t| t.hours).sum();
    round1(key_hours / total_hours * 100.0)
}

/// Aggregated figures over a batch of generated plans.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    /// Number of plans in the batch.
    pub plans: usize,
    /// Plans whose status is `approved`.
    pub approved_plans: usize,
    /// Total number of tasks across all plans.
    pub tasks: usize,
    /// Tasks at 100% progress.
    pub completed_tasks: usize,
    /// Mean task progress in percent, rounded to the nearest integer.
    pub avg_progress: u32,
    /// Sum of planned hours, rounded to one decimal.
    pub planned_hours: f64,
    /// Sum of actual hours, rounded to one decimal.
    pub actual_hours: f64,
    /// Share of tasks that are key responsibilities, in whole percent.
    pub key_task_rate: u32,
}

/// Aggregate a batch of plans into a [`SeedSummary`].
pub fn summarize(plans: &[WeeklyPlan]) -> SeedSummary {
    let mut tasks = 0usize;
    let mut completed_tasks = 0usize;
    let mut progress_sum = 0u64;
    let mut planned_hours = 0.0f64;
    let mut actual_hours = 0.0f64;
    let mut key_tasks = 0usize;

    for plan in plans {
        for task in &plan.tasks {
            tasks += 1;
            if task.progress.is_done() {
                completed_tasks += 1;
            }
            progress_sum += u64::from(task.progress.percent());
            planned_hours += task.hours;
            actual_hours += task.actual_hours;
            if task.is_key() {
                key_tasks += 1;
            }
        }
    }

    let avg_progress = if tasks > 0 {
        (progress_sum as f64 / tasks as f64).round() as u32
    } else {
        0
    };
    let key_task_rate = if tasks > 0 {
        (key_tasks as f64 / tasks as f64 * 100.0).round() as u32
    } else {
        0
    };

    SeedSummary {
        plans: plans.len(),
        approved_plans: plans
            .iter()
            .filter(|p| p.status == PlanStatus::Approved)
            .count(),
        tasks,
        completed_tasks,
        avg_progress,
        planned_hours: round1(planned_hours),
        actual_hours: round1(actual_hours),
        key_task_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Progress, TaskCategory, TaskPriority};

    fn task(category: TaskCategory, hours: f64, actual: f64, progress: Progress) -> Task {
        Task {
            id: uuid::Uuid::nil(),
            category,
            priority: TaskPriority::Medium,
            name: "執行專案開發任務".to_string(),
            outcome: "完成階段性功能".to_string(),
            hours,
            actual_hours: actual,
            progress,
            not_done_reason: None,
        }
    }

    fn plan(status: PlanStatus, tasks: Vec<Task>) -> WeeklyPlan {
        let total: f64 = tasks.iter().map(|t| t.hours).sum();
        WeeklyPlan {
            id: uuid::Uuid::nil(),
            user_id: uuid::Uuid::nil(),
            user_name: "Ken".to_string(),
            week_range: "1月1日 - 1月7日".to_string(),
            week_start: "2025-01-01".parse().unwrap(),
            submitted_at: "2024-12-31T10:00:00Z".parse().unwrap(),
            updated_at: "2024-12-31T10:00:00Z".parse().unwrap(),
            status,
            review_comment: String::new(),
            total_hours: round1(total),
            key_ratio: key_ratio(&tasks, total),
            tasks,
        }
    }

    // -- round1 tests --

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(31.25), 31.3);
        assert_eq!(round1(6.04), 6.0);
        assert_eq!(round1(9.96), 10.0);
        assert_eq!(round1(40.0), 40.0);
    }

    // -- key_ratio tests --

    #[test]
    fn key_ratio_mixes_categories() {
        let tasks = vec![
            task(TaskCategory::KeyResponsibility, 5.0, 5.0, Progress::Done),
            task(TaskCategory::Other, 11.0, 11.0, Progress::Done),
        ];
        assert_eq!(key_ratio(&tasks, 16.0), 31.3);
    }

    #[test]
    fn key_ratio_is_zero_without_hours() {
        let tasks = vec![task(TaskCategory::KeyResponsibility, 0.0, 0.0, Progress::Done)];
        assert_eq!(key_ratio(&tasks, 0.0), 0.0);
    }

    #[test]
    fn key_ratio_all_key_tasks_is_hundred() {
        let tasks = vec![
            task(TaskCategory::KeyResponsibility, 4.0, 4.0, Progress::Done),
            task(TaskCategory::KeyResponsibility, 6.0, 6.0, Progress::Halfway),
        ];
        assert_eq!(key_ratio(&tasks, 10.0), 100.0);
    }

    // -- summarize tests --

    #[test]
    fn summarize_counts_tasks_and_progress() {
        let plans = vec![
            plan(
                PlanStatus::Approved,
                vec![
                    task(TaskCategory::KeyResponsibility, 4.0, 4.5, Progress::Done),
                    task(TaskCategory::Other, 6.0, 5.5, Progress::Halfway),
                ],
            ),
            plan(
                PlanStatus::Pending,
                vec![task(TaskCategory::Other, 8.0, 8.0, Progress::NotStarted)],
            ),
        ];
        let summary = summarize(&plans);
        assert_eq!(summary.plans, 2);
        assert_eq!(summary.approved_plans, 1);
        assert_eq!(summary.tasks, 3);
        assert_eq!(summary.completed_tasks, 1);
        // (100 + 50 + 0) / 3 = 50
        assert_eq!(summary.avg_progress, 50);
        assert_eq!(summary.planned_hours, 18.0);
        assert_eq!(summary.actual_hours, 18.0);
        // 1 of 3 tasks is key -> 33%
        assert_eq!(summary.key_task_rate, 33);
    }

    #[test]
    fn summarize_empty_batch_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.plans, 0);
        assert_eq!(summary.tasks, 0);
        assert_eq!(summary.avg_progress, 0);
        assert_eq!(summary.key_task_rate, 0);
        assert_eq!(summary.planned_hours, 0.0);
    }
}
