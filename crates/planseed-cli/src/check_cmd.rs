//! `planseed check` command: re-parse a seed file and verify every
//! generation invariant against what is actually in it.

use std::io::Read;

use anyhow::{Context, bail};
use chrono::NaiveDate;

use planseed_core::check::check_plans;
use planseed_core::model::WeeklyPlan;
use planseed_core::sql::{parse_plan_insert, statement_table};

use crate::config::PlanseedConfig;

/// Run the check command. `file` may be `-` to read stdin.
pub fn run_check(
    config: &PlanseedConfig,
    file: &str,
    expected_start: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let contents = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read seed file {file}"))?
    };

    let mut plans: Vec<WeeklyPlan> = Vec::new();
    let mut profiles = 0usize;
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        match statement_table(line) {
            Some(table) if table == config.plans_table => {
                let plan = parse_plan_insert(line, &config.plans_table)
                    .with_context(|| format!("line {}: bad plan statement", number + 1))?;
                plans.push(plan);
            }
            Some(table) if table == config.profiles_table => profiles += 1,
            _ => bail!(
                "line {}: not a {} or {} INSERT",
                number + 1,
                config.plans_table,
                config.profiles_table
            ),
        }
    }

    if plans.is_empty() {
        bail!("no {} statements found in {file}", config.plans_table);
    }

    let report = check_plans(&plans, expected_start);

    println!("Checked {} plans ({} tasks) from {file}", report.plans, report.tasks);
    if profiles > 0 {
        println!("Skipped {profiles} profile statement(s)");
    }

    if report.is_ok() {
        println!("All invariants hold.");
        return Ok(());
    }

    println!();
    for failure in &report.failures {
        println!(
            "plan {} ({}): {}",
            failure.plan_index, failure.plan_id, failure.message
        );
    }
    bail!("{} invariant violation(s) found", report.failures.len());
}
