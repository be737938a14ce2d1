//! Parses rendered plan `INSERT` statements back into [`WeeklyPlan`] values.
//!
//! The grammar is exactly what [`render_plan_insert`] emits: a fixed column
//! list, one `VALUES` tuple, quoted strings with doubled quotes, bare
//! numeric literals. Anything else is rejected with a descriptive error, so
//! a hand-edited seed file fails loudly instead of round-tripping wrong
//! data.
//!
//! [`render_plan_insert`]: super::render::render_plan_insert

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{PlanStatus, Task, WeeklyPlan};

/// Column list every plan statement must carry, in render order.
const PLAN_COLUMNS: &str = "(id, user_id, user_name, week_range, week_start, submitted_at, \
                            updated_at, status, review_comment, total_hours, key_ratio, tasks)";

/// Number of values in a plan statement.
const PLAN_VALUE_COUNT: usize = 12;

/// Errors that can occur while parsing a statement.
#[derive(Debug, Error)]
pub enum StatementParseError {
    #[error("not an INSERT statement")]
    NotAnInsert,

    #[error("statement targets table {found:?}, expected {expected:?}")]
    WrongTable { found: String, expected: String },

    #[error("unexpected column list {found:?}")]
    WrongColumns { found: String },

    #[error("statement does not end with ');'")]
    MissingTerminator,

    #[error("unterminated quoted value")]
    UnterminatedQuote,

    #[error("malformed values list: {0}")]
    MalformedValues(String),

    #[error("expected {expected} values, found {found}")]
    WrongValueCount { expected: usize, found: usize },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

fn invalid(field: &'static str, err: impl std::fmt::Display) -> StatementParseError {
    StatementParseError::InvalidValue {
        field,
        message: err.to_string(),
    }
}

/// Peek at the table name of an `INSERT` statement, without parsing it.
///
/// Returns `None` when the line is not an `INSERT` at all.
pub fn statement_table(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("INSERT INTO ")?;
    let end = rest.find([' ', '('])?;
    let table = &rest[..end];
    (!table.is_empty()).then_some(table)
}

/// Parse one rendered plan statement against `table` back into a
/// [`WeeklyPlan`].
pub fn parse_plan_insert(line: &str, table: &str) -> Result<WeeklyPlan, StatementParseError> {
    let rest = line
        .trim()
        .strip_prefix("INSERT INTO ")
        .ok_or(StatementParseError::NotAnInsert)?;

    let found_table = statement_table(line).ok_or(StatementParseError::NotAnInsert)?;
    if found_table != table {
        return Err(StatementParseError::WrongTable {
            found: found_table.to_string(),
            expected: table.to_string(),
        });
    }
    let rest = rest[found_table.len()..].trim_start();

    // Fixed column list.
    let columns_end = rest
        .find(')')
        .ok_or(StatementParseError::MissingTerminator)?;
    let columns = &rest[..=columns_end];
    if columns != PLAN_COLUMNS {
        return Err(StatementParseError::WrongColumns {
            found: columns.to_string(),
        });
    }

    let rest = rest[columns_end + 1..]
        .trim_start()
        .strip_prefix("VALUES (")
        .ok_or_else(|| StatementParseError::MalformedValues("missing VALUES tuple".to_string()))?;
    let body = rest
        .strip_suffix(");")
        .ok_or(StatementParseError::MissingTerminator)?;

    let values = split_values(body)?;
    if values.len() != PLAN_VALUE_COUNT {
        return Err(StatementParseError::WrongValueCount {
            expected: PLAN_VALUE_COUNT,
            found: values.len(),
        });
    }

    let id: Uuid = quoted(&values, 0, "id")?.parse().map_err(|e| invalid("id", e))?;
    let user_id: Uuid = quoted(&values, 1, "user_id")?
        .parse()
        .map_err(|e| invalid("user_id", e))?;
    let user_name = quoted(&values, 2, "user_name")?.to_string();
    let week_range = quoted(&values, 3, "week_range")?.to_string();
    let week_start: NaiveDate = quoted(&values, 4, "week_start")?
        .parse()
        .map_err(|e| invalid("week_start", e))?;
    let submitted_at: DateTime<Utc> = quoted(&values, 5, "submitted_at")?
        .parse()
        .map_err(|e| invalid("submitted_at", e))?;
    let updated_at: DateTime<Utc> = quoted(&values, 6, "updated_at")?
        .parse()
        .map_err(|e| invalid("updated_at", e))?;
    let status: PlanStatus = quoted(&values, 7, "status")?
        .parse()
        .map_err(|e| invalid("status", e))?;
    let review_comment = quoted(&values, 8, "review_comment")?.to_string();
    let total_hours = numeric(&values, 9, "total_hours")?;
    let key_ratio = numeric(&values, 10, "key_ratio")?;
    let tasks: Vec<Task> = serde_json::from_str(quoted(&values, 11, "tasks")?)
        .map_err(|e| invalid("tasks", e))?;

    Ok(WeeklyPlan {
        id,
        user_id,
        user_name,
        week_range,
        week_start,
        submitted_at,
        updated_at,
        status,
        review_comment,
        total_hours,
        key_ratio,
        tasks,
    })
}

/// One raw value from the `VALUES` tuple, with its quoting preserved.
struct RawValue {
    text: String,
    was_quoted: bool,
}

/// Split the inside of a `VALUES (...)` tuple into raw values, undoing the
/// doubled-quote escaping in quoted strings.
fn split_values(body: &str) -> Result<Vec<RawValue>, StatementParseError> {
    let mut values = Vec::new();
    let bytes = body.as_bytes();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(StatementParseError::MalformedValues(
                "expected a value".to_string(),
            ));
        }

        if bytes[pos] == b'\'' {
            pos += 1;
            let mut text = String::new();
            loop {
                let offset = body[pos..]
                    .find('\'')
                    .ok_or(StatementParseError::UnterminatedQuote)?;
                text.push_str(&body[pos..pos + offset]);
                pos += offset + 1;
                if bytes.get(pos) == Some(&b'\'') {
                    // Doubled quote inside the string.
                    text.push('\'');
                    pos += 1;
                } else {
                    break;
                }
            }
            values.push(RawValue {
                text,
                was_quoted: true,
            });
        } else {
            let end = body[pos..].find(',').map_or(body.len(), |o| pos + o);
            let text = body[pos..end].trim();
            if text.is_empty() {
                return Err(StatementParseError::MalformedValues(
                    "expected a value".to_string(),
                ));
            }
            values.push(RawValue {
                text: text.to_string(),
                was_quoted: false,
            });
            pos = end;
        }

        while pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        match bytes.get(pos) {
            None => return Ok(values),
            Some(b',') => pos += 1,
            Some(_) => {
                return Err(StatementParseError::MalformedValues(
                    "expected ',' between values".to_string(),
                ));
            }
        }
    }
}

fn quoted<'a>(
    values: &'a [RawValue],
    index: usize,
    field: &'static str,
) -> Result<&'a str, StatementParseError> {
    let value = &values[index];
    if !value.was_quoted {
        return Err(invalid(field, "expected a quoted string"));
    }
    Ok(&value.text)
}

fn numeric(
    values: &[RawValue],
    index: usize,
    field: &'static str,
) -> Result<f64, StatementParseError> {
    let value = &values[index];
    if value.was_quoted {
        return Err(invalid(field, "expected a bare numeric literal"));
    }
    value.text.parse().map_err(|e| invalid(field, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
