//! Week arithmetic for seeded plans.
//!
//! The downstream tracker's planning weeks run Wednesday through Tuesday;
//! the default series start (2025-01-01) is a Wednesday, and every further
//! week is exactly 7 days later. All date arithmetic is checked so that a
//! user-supplied start date near the calendar limits surfaces as an error
//! instead of a panic.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use thiserror::Error;

/// Fixed hour-of-day (UTC) at which seeded plans count as submitted.
const SUBMISSION_HOUR: u32 = 10;

/// Errors from deriving week dates.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("week {index} of series starting {start} falls outside the supported date range")]
    OutOfRange { start: NaiveDate, index: u32 },
}

/// The derived dates of one seeded week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDates {
    /// First day of the week (`series_start + 7 * index`).
    pub start: NaiveDate,
    /// Last day of the week (`start + 6`).
    pub end: NaiveDate,
    /// When the plan counts as submitted: the day before `start`, 10:00 UTC.
    pub submitted_at: DateTime<Utc>,
}

impl WeekDates {
    /// Derive the dates for week `index` of a series beginning at
    /// `series_start`.
    pub fn for_index(series_start: NaiveDate, index: u32) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OutOfRange {
            start: series_start,
            index,
        };

        let start = series_start
            .checked_add_days(Days::new(7 * u64::from(index)))
            .ok_or_else(out_of_range)?;
        let end = start.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?;
        let submitted_at = start
            .checked_sub_days(Days::new(1))
            .and_then(|d| d.and_hms_opt(SUBMISSION_HOUR, 0, 0))
            .ok_or_else(out_of_range)?
            .and_utc();

        Ok(Self {
            start,
            end,
            submitted_at,
        })
    }

    /// The display label for this week, e.g. "1月1日 - 1月7日".
    ///
    /// Months and days are not zero-padded, matching what the tracker shows.
    pub fn range_label(&self) -> String {
        format!(
            "{}月{}日 - {}月{}日",
            self.start.month(),
            self.start.day(),
            self.end.month(),
            self.end.day()
        )
    }
}

/// Recompute the range label for a bare week-start date.
///
/// Used when validating existing rows, where only `week_start` is stored.
pub fn range_label_for(week_start: NaiveDate) -> Option<String> {
    let end = week_start.checked_add_days(Days::new(6))?;
    Some(format!(
        "{}月{}日 - {}月{}日",
        week_start.month(),
        week_start.day(),
        end.month(),
        end.day()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
