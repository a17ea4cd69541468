//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `levels` command
#[derive(Parser, Debug, Clone)]
pub struct LevelsArgs {
    /// Entity table (one row per skill or task)
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Relation table (parent/child ID pairs)
    #[arg(short, long)]
    pub relations: PathBuf,

    /// Where to write the entity table with the level column added
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the `paths` command
#[derive(Parser, Debug, Clone)]
pub struct PathsArgs {
    /// Entity table (one row per skill or task)
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Relation table (parent/child ID pairs)
    #[arg(short, long)]
    pub relations: PathBuf,

    /// Where to write the expanded table (one row per path)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Extra label tables, e.g. skill groups (repeatable)
    ///
    /// Read after the entity table; later tables overwrite earlier labels
    /// for the same ID.
    #[arg(short, long = "labels")]
    pub labels: Vec<PathBuf>,
}

/// Arguments for the `stats` command
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Entity table (one row per skill or task)
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Relation table (parent/child ID pairs)
    #[arg(short, long)]
    pub relations: PathBuf,
}

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone)]
pub struct CyclesArgs {
    /// Relation table (parent/child ID pairs)
    #[arg(short, long)]
    pub relations: PathBuf,
}

/// Arguments for the `view` command
#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    /// Levelled table written by `taxopath levels`
    #[arg(short, long)]
    pub file: PathBuf,

    /// Number of rows to display
    #[arg(short = 'n', long = "num", default_value = "20")]
    pub num: usize,

    /// Only show rows at this level
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub level: Option<u32>,

    /// Extra columns to display between the label and the level (repeatable;
    /// defaults to `entities.view_columns` from the configuration)
    #[arg(short, long = "column")]
    pub columns: Vec<String>,
}
