mod check_cmd;
mod config;
mod seed_cmd;
mod users_cmd;

#[cfg(test)]
mod test_util;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

use planseed_core::generate::{DEFAULT_WEEKS, default_start};
use planseed_core::roster::DEFAULT_USER;
use planseed_core::sql::{DEFAULT_PLANS_TABLE, DEFAULT_PROFILES_TABLE};

use config::PlanseedConfig;

#[derive(Parser)]
#[command(name = "planseed", about = "Seed-data generator for a weekly work-plan tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a planseed config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate INSERT statements for a batch of weekly plans
    Seed {
        /// Roster user the plans belong to (overrides PLANSEED_USER env var)
        #[arg(long)]
        user: Option<String>,
        /// Number of weeks to generate
        #[arg(long)]
        weeks: Option<u32>,
        /// First day of week 0
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: Option<NaiveDate>,
        /// RNG seed for reproducible batches, ids included
        #[arg(long)]
        seed: Option<u64>,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        out: Option<String>,
        /// Output format: sql or json
        #[arg(long, default_value = "sql")]
        format: String,
        /// Prepend the profile INSERT for the selected user
        #[arg(long)]
        with_profiles: bool,
    },
    /// Emit profile INSERT statements for the whole roster
    Users {
        /// Output file path (defaults to stdout)
        #[arg(long)]
        out: Option<String>,
    },
    /// Re-parse a seed file and verify every generation invariant
    Check {
        /// Seed file to check, or '-' for stdin
        file: String,
        /// Expected start of the first week; when omitted the first row
        /// anchors the cadence
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: Option<NaiveDate>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Execute the `planseed init` command: write config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        seed: config::SeedSection {
            user: Some(DEFAULT_USER.to_string()),
            weeks: Some(DEFAULT_WEEKS),
            start: Some(default_start()),
        },
        tables: config::TablesSection {
            weekly_plans: Some(DEFAULT_PLANS_TABLE.to_string()),
            profiles: Some(DEFAULT_PROFILES_TABLE.to_string()),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  seed.user = {DEFAULT_USER}");
    println!("  seed.weeks = {DEFAULT_WEEKS}");
    println!("  seed.start = {}", default_start());
    println!("  tables.weekly_plans = {DEFAULT_PLANS_TABLE}");
    println!("  tables.profiles = {DEFAULT_PROFILES_TABLE}");
    println!();
    println!("Next: run `planseed seed` to generate a batch of INSERT statements.");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `planseed seed | psql` stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Seed {
            user,
            weeks,
            start,
            seed,
            out,
            format,
            with_profiles,
        } => {
            let resolved = PlanseedConfig::resolve(user.as_deref(), weeks, start)?;
            seed_cmd::run_seed(&resolved, seed, out.as_deref(), &format, with_profiles)?;
        }
        Commands::Users { out } => {
            let resolved = PlanseedConfig::resolve(None, None, None)?;
            users_cmd::run_users(&resolved, out.as_deref())?;
        }
        Commands::Check { file, start } => {
            let resolved = PlanseedConfig::resolve(None, None, None)?;
            check_cmd::run_check(&resolved, &file, start)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
