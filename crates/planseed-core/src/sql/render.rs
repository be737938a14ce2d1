//! Renders plans and profiles as Postgres `INSERT` statements.
//!
//! One statement per row, terminated with `;`. String columns are
//! single-quoted with embedded quotes doubled, hour columns are rendered
//! with one decimal, and the task list is embedded as a JSON array in the
//! final column.

use thiserror::Error;

use crate::model::WeeklyPlan;
use crate::roster::Profile;

/// Table plans are inserted into unless configured otherwise.
pub const DEFAULT_PLANS_TABLE: &str = "weekly_plans";

/// Table profiles are inserted into unless configured otherwise.
pub const DEFAULT_PROFILES_TABLE: &str = "profiles";

/// Errors from rendering a row.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize tasks as JSON: {0}")]
    TasksJson(#[from] serde_json::Error),
}

/// Double embedded single quotes so a value can sit inside a quoted SQL
/// string.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render one plan as an `INSERT` statement against `table`.
pub fn render_plan_insert(plan: &WeeklyPlan, table: &str) -> Result<String, RenderError> {
    let tasks_json = serde_json::to_string(&plan.tasks)?;
    Ok(format!(
        "INSERT INTO {table} (id, user_id, user_name, week_range, week_start, \
         submitted_at, updated_at, status, review_comment, total_hours, key_ratio, tasks) \
         VALUES ('{}', '{}', '{}', '{}', '{}', '{}', '{}', '{}', '{}', {:.1}, {:.1}, '{}');",
        plan.id,
        plan.user_id,
        escape(&plan.user_name),
        escape(&plan.week_range),
        plan.week_start,
        plan.submitted_at.format("%Y-%m-%dT%H:%M:%SZ"),
        plan.updated_at.format("%Y-%m-%dT%H:%M:%SZ"),
        plan.status,
        escape(&plan.review_comment),
        plan.total_hours,
        plan.key_ratio,
        escape(&tasks_json),
    ))
}

/// Render one roster profile as an `INSERT` statement against `table`.
pub fn render_profile_insert(profile: &Profile, table: &str) -> String {
    format!(
        "INSERT INTO {table} (id, email, full_name, is_manager, is_admin) \
         VALUES ('{}', '{}', '{}', {}, {});",
        profile.id,
        escape(&profile.email),
        escape(&profile.name),
        profile.is_manager,
        profile.is_admin,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlanStatus, Progress, Task, TaskCategory, TaskPriority};
    use crate::roster;

    fn sample_plan() -> WeeklyPlan {
        let task = Task {
            id: "6f2a8e9c-5d27-4c5a-9b1e-3f4d8a7c6b50".parse().unwrap(),
            category: TaskCategory::KeyResponsibility,
            priority: TaskPriority::High,
            name: "執行專案開發任務 1 - 1月1日 - 1月7日".to_string(),
            outcome: "完成階段性功能 1 並通過測試".to_string(),
            hours: 6.5,
            actual_hours: 7.8,
            progress: Progress::Done,
            not_done_reason: None,
        };
        WeeklyPlan {
            id: "7c9e6679-7425-40de-944b-e07fc1f90ae7".parse().unwrap(),
            user_id: "a0000009-0000-0000-0000-000000000009".parse().unwrap(),
            user_name: "Ken".to_string(),
            week_range: "1月1日 - 1月7日".to_string(),
            week_start: "2025-01-01".parse().unwrap(),
            submitted_at: "2024-12-31T10:00:00Z".parse().unwrap(),
            updated_at: "2024-12-31T10:00:00Z".parse().unwrap(),
            status: PlanStatus::Approved,
            review_comment: "本週執行狀況良好，繼續保持。".to_string(),
            total_hours: 40.0,
            key_ratio: 31.3,
            tasks: vec![task],
        }
    }

    #[test]
    fn escape_doubles_single_quotes() {
        assert_eq!(escape("O'Brien"), "O''Brien");
        assert_eq!(escape("no quotes"), "no quotes");
        assert_eq!(escape("''"), "''''");
    }

    #[test]
    fn renders_the_exact_plan_statement() {
        let statement = render_plan_insert(&sample_plan(), DEFAULT_PLANS_TABLE).unwrap();
        assert_eq!(
            statement,
            "INSERT INTO weekly_plans (id, user_id, user_name, week_range, week_start, \
             submitted_at, updated_at, status, review_comment, total_hours, key_ratio, tasks) \
             VALUES ('7c9e6679-7425-40de-944b-e07fc1f90ae7', \
             'a0000009-0000-0000-0000-000000000009', 'Ken', '1月1日 - 1月7日', '2025-01-01', \
             '2024-12-31T10:00:00Z', '2024-12-31T10:00:00Z', 'approved', \
             '本週執行狀況良好，繼續保持。', 40.0, 31.3, \
             '[{\"id\":\"6f2a8e9c-5d27-4c5a-9b1e-3f4d8a7c6b50\",\"category\":\"關鍵職責\",\
             \"priority\":\"高\",\"name\":\"執行專案開發任務 1 - 1月1日 - 1月7日\",\
             \"outcome\":\"完成階段性功能 1 並通過測試\",\"hours\":6.5,\"actualHours\":7.8,\
             \"progress\":100}]');"
        );
    }

    #[test]
    fn pending_plan_renders_an_empty_comment() {
        let mut plan = sample_plan();
        plan.status = PlanStatus::Pending;
        plan.review_comment = String::new();
        let statement = render_plan_insert(&plan, DEFAULT_PLANS_TABLE).unwrap();
        assert!(statement.contains("'pending', '', 40.0"));
    }

    #[test]
    fn hours_always_render_with_one_decimal() {
        let mut plan = sample_plan();
        plan.total_hours = 38.0;
        plan.key_ratio = 100.0;
        let statement = render_plan_insert(&plan, DEFAULT_PLANS_TABLE).unwrap();
        assert!(statement.contains(", 38.0, 100.0, "));
    }

    #[test]
    fn quotes_in_free_text_are_doubled() {
        let mut plan = sample_plan();
        plan.user_name = "O'Brien".to_string();
        plan.tasks[0].outcome = "shipped the 'beta' build".to_string();
        let statement = render_plan_insert(&plan, DEFAULT_PLANS_TABLE).unwrap();
        assert!(statement.contains("'O''Brien'"));
        assert!(statement.contains("shipped the ''beta'' build"));
    }

    #[test]
    fn renders_against_a_custom_table() {
        let statement = render_plan_insert(&sample_plan(), "weekly_plans_staging").unwrap();
        assert!(statement.starts_with("INSERT INTO weekly_plans_staging (id, user_id"));
    }

    #[test]
    fn renders_the_exact_profile_statement() {
        let ken = roster::find_user("ken").unwrap();
        assert_eq!(
            render_profile_insert(&ken, DEFAULT_PROFILES_TABLE),
            "INSERT INTO profiles (id, email, full_name, is_manager, is_admin) \
             VALUES ('a0000009-0000-0000-0000-000000000009', 'ken@bridgecom.com.tw', 'Ken', \
             true, true);"
        );
    }

    #[test]
    fn unfinished_task_serializes_its_reason() {
        let mut plan = sample_plan();
        plan.tasks[0].progress = Progress::Halfway;
        plan.tasks[0].not_done_reason = Some("時間不足".to_string());
        let statement = render_plan_insert(&plan, DEFAULT_PLANS_TABLE).unwrap();
        assert!(statement.contains("\"progress\":50,\"notDoneReason\":\"時間不足\""));
    }
}
