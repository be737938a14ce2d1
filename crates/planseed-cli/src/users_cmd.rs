//! `planseed users` command: emit profile INSERT statements for the
//! whole built-in roster.

use std::io::Write;

use anyhow::Context;

use planseed_core::roster;
use planseed_core::sql::render_profile_insert;

use crate::config::PlanseedConfig;

/// Run the users command.
pub fn run_users(config: &PlanseedConfig, out: Option<&str>) -> anyhow::Result<()> {
    let roster = roster::load_roster();

    let mut writer: Box<dyn Write> = if let Some(path) = out {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    for profile in &roster {
        writeln!(
            writer,
            "{}",
            render_profile_insert(profile, &config.profiles_table)
        )?;
    }
    writer.flush()?;

    if let Some(path) = out {
        println!("Wrote {} profiles to {path}", roster.len());
    }

    Ok(())
}
