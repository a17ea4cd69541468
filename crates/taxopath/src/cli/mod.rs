//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `levels`: add a depth column to an entity table
//! - `paths`: expand an entity table into one row per upward path
//! - `stats`: print level, path and relation statistics
//! - `cycles`: report cycles in a relation table
//! - `view`: show the key columns of a levelled table
//!
//! # Global Flags
//!
//! - `--config <FILE>`: YAML column mapping (defaults match ESCO exports)
//! - `--json`: Output in JSON format (applies to all commands)
//! - `-v`: More log output (repeatable)
//!
//! # Example
//!
//! ```bash
//! taxopath levels -e skills.csv -r skill_hierarchy.csv -o skills_with_levels.csv
//! taxopath paths -e skills.csv -r skill_hierarchy.csv -l skill_groups.csv -o paths.csv
//! taxopath --config onet.yaml stats -e tasks.txt -r tasks_to_dwas.txt
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CyclesArgs, LevelsArgs, PathsArgs, StatsArgs, ViewArgs};

/// Taxopath - hierarchy levels and upward paths for taxonomy tables
///
/// Reads an entity table and a parent/child relation table, resolves each
/// entity's depth and every path up to a root, and writes enriched tables.
#[derive(Parser, Debug)]
#[command(name = "taxopath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML configuration with column names and delimiters
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a level column to an entity table
    ///
    /// Roots are level 1; every other node is one deeper than its deepest
    /// parent.
    Levels(LevelsArgs),

    /// Expand an entity table into one row per upward path
    ///
    /// Adds ID and label columns for every level, root first, plus the
    /// whole path as a delimited string.
    Paths(PathsArgs),

    /// Show level, path and relation statistics without writing
    Stats(StatsArgs),

    /// Report cycles in a relation table
    Cycles(CyclesArgs),

    /// Show the key columns of a levelled table
    View(ViewArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter matching the `-v` count.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the command
    /// fails.
    pub fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let app = App::from_config_path(self.config.as_deref())?;

        match &self.command {
            Commands::Levels(args) => execute::execute_levels(&app, args, output_mode),
            Commands::Paths(args) => execute::execute_paths(&app, args, output_mode),
            Commands::Stats(args) => execute::execute_stats(&app, args, output_mode),
            Commands::Cycles(args) => execute::execute_cycles(&app, args, output_mode),
            Commands::View(args) => execute::execute_view(&app, args, output_mode),
        }
    }
}
