//! Configuration file management for planseed.
//!
//! Provides a TOML-based config file at `~/.config/planseed/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use planseed_core::generate::{DEFAULT_WEEKS, default_start};
use planseed_core::roster::DEFAULT_USER;
use planseed_core::sql::{DEFAULT_PLANS_TABLE, DEFAULT_PROFILES_TABLE};

/// Upper bound on the number of weeks in one batch (ten years).
pub const MAX_WEEKS: u32 = 520;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub seed: SeedSection,
    #[serde(default)]
    pub tables: TablesSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedSection {
    /// Roster name the plans belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Number of weeks per batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<u32>,
    /// First day of week 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TablesSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_plans: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the planseed config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/planseed` or
/// `~/.config/planseed`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("planseed");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("planseed")
}

/// Return the path to the planseed config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved seeding configuration, ready for use.
#[derive(Debug, Clone)]
pub struct PlanseedConfig {
    pub user: String,
    pub weeks: u32,
    pub start: NaiveDate,
    pub plans_table: String,
    pub profiles_table: String,
}

impl PlanseedConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - user: `cli_user` > `PLANSEED_USER` env > `seed.user` > `"ken"`
    /// - weeks: `cli_weeks` > `seed.weeks` > 52 (must be 1..=520)
    /// - start: `cli_start` > `seed.start` > 2025-01-01
    /// - tables: `[tables]` section > `weekly_plans` / `profiles`
    pub fn resolve(
        cli_user: Option<&str>,
        cli_weeks: Option<u32>,
        cli_start: Option<NaiveDate>,
    ) -> Result<Self> {
        let file_config = load_config().ok();
        let seed = file_config.as_ref().map(|c| &c.seed);

        // User resolution.
        let user = if let Some(user) = cli_user {
            user.to_string()
        } else if let Ok(user) = std::env::var("PLANSEED_USER") {
            user
        } else if let Some(user) = seed.and_then(|s| s.user.clone()) {
            user
        } else {
            DEFAULT_USER.to_string()
        };

        // Weeks resolution and bounds.
        let weeks = cli_weeks
            .or_else(|| seed.and_then(|s| s.weeks))
            .unwrap_or(DEFAULT_WEEKS);
        if !(1..=MAX_WEEKS).contains(&weeks) {
            bail!("weeks must be between 1 and {MAX_WEEKS}, got {weeks}");
        }

        // Start resolution.
        let start = cli_start
            .or_else(|| seed.and_then(|s| s.start))
            .unwrap_or_else(default_start);

        // Table names come from the config file only.
        let tables = file_config.as_ref().map(|c| &c.tables);
        let plans_table = tables
            .and_then(|t| t.weekly_plans.clone())
            .unwrap_or_else(|| DEFAULT_PLANS_TABLE.to_string());
        let profiles_table = tables
            .and_then(|t| t.profiles.clone())
            .unwrap_or_else(|| DEFAULT_PROFILES_TABLE.to_string());
        for table in [&plans_table, &profiles_table] {
            if !is_bare_identifier(table) {
                bail!("table name {table:?} must be a bare SQL identifier");
            }
        }

        Ok(Self {
            user,
            weeks,
            start,
            plans_table,
            profiles_table,
        })
    }
}

/// True for names that can be spliced into a statement without quoting.
fn is_bare_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
