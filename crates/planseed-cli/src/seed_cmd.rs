//! `planseed seed` command: generate a batch of weekly plans and write it
//! out as SQL or JSON.

use std::io::Write;

use anyhow::{Context, bail};

use planseed_core::generate::{Generator, SeedParams};
use planseed_core::roster;
use planseed_core::sql::{render_plan_insert, render_profile_insert};
use planseed_core::stats;

use crate::config::PlanseedConfig;

/// Run the seed command.
pub fn run_seed(
    config: &PlanseedConfig,
    seed: Option<u64>,
    out: Option<&str>,
    format: &str,
    with_profiles: bool,
) -> anyhow::Result<()> {
    let user = roster::find_user(&config.user).with_context(|| {
        format!(
            "unknown user {:?} (roster: {})",
            config.user,
            roster::user_names().join(", ")
        )
    })?;

    let params = SeedParams {
        user: user.clone(),
        start: config.start,
        weeks: config.weeks,
    };
    let mut generator = Generator::new(params, seed);
    let plans = generator.generate()?;

    let mut writer: Box<dyn Write> = if let Some(path) = out {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    match format {
        "sql" => {
            if with_profiles {
                writeln!(
                    writer,
                    "{}",
                    render_profile_insert(&user, &config.profiles_table)
                )?;
            }
            for plan in &plans {
                writeln!(writer, "{}", render_plan_insert(plan, &config.plans_table)?)?;
            }
        }
        "json" => {
            if with_profiles {
                bail!("--with-profiles only applies to the sql format");
            }
            serde_json::to_writer_pretty(&mut writer, &plans)?;
            writeln!(writer)?;
        }
        other => bail!("unknown format {other:?} (expected sql or json)"),
    }
    writer.flush()?;

    let summary = stats::summarize(&plans);
    if let Some(path) = out {
        println!(
            "Wrote {} plans ({} tasks) to {path}",
            summary.plans, summary.tasks
        );
    }
    tracing::info!(
        user = %user.name,
        plans = summary.plans,
        tasks = summary.tasks,
        approved = summary.approved_plans,
        avg_progress = summary.avg_progress,
        key_task_rate = summary.key_task_rate,
        "seed batch complete"
    );

    Ok(())
}
