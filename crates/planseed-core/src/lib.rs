//! Core library for planseed: the seed-data generator for a weekly
//! work-plan tracker.
//!
//! Covers the data model of a weekly plan and its tasks, week-by-week
//! calendar arithmetic, randomized generation of realistic plan batches,
//! rendering to (and re-parsing from) Postgres `INSERT` statements, and
//! invariant checks over existing seed files.

pub mod calendar;
pub mod check;
pub mod generate;
pub mod model;
pub mod roster;
pub mod sql;
pub mod stats;

pub use calendar::{CalendarError, WeekDates};
pub use check::{CheckFailure, CheckReport, check_plans};
pub use generate::{DEFAULT_WEEKS, GenerateError, Generator, SeedParams, default_start};
pub use model::{PlanStatus, Progress, Task, TaskCategory, TaskPriority, WeeklyPlan};
pub use roster::{DEFAULT_USER, Profile, find_user, load_roster, user_names};
pub use stats::{SeedSummary, key_ratio, round1, summarize};
