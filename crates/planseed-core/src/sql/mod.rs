//! SQL statement rendering and re-parsing for seeded rows.

pub mod parse;
pub mod render;

pub use parse::{StatementParseError, parse_plan_insert, statement_table};
pub use render::{
    DEFAULT_PLANS_TABLE, DEFAULT_PROFILES_TABLE, RenderError, escape, render_plan_insert,
    render_profile_insert,
};
