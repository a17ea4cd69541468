//! Command execution logic.

use anyhow::{Context, Result};

use super::args::{CyclesArgs, LevelsArgs, PathsArgs, StatsArgs, ViewArgs};
use crate::app::App;
use crate::output::{self, OutputMode};

/// Execute the levels command
pub fn execute_levels(app: &App, args: &LevelsArgs, output_mode: OutputMode) -> Result<()> {
    let report = app
        .levels(&args.entities, &args.relations, &args.output)
        .with_context(|| format!("failed to write levels to {}", args.output.display()))?;
    output::print_levels_report(&report, output_mode)?;
    Ok(())
}

/// Execute the paths command
pub fn execute_paths(app: &App, args: &PathsArgs, output_mode: OutputMode) -> Result<()> {
    let report = app
        .paths(&args.entities, &args.relations, &args.labels, &args.output)
        .with_context(|| format!("failed to write paths to {}", args.output.display()))?;
    output::print_paths_report(&report, output_mode)?;
    Ok(())
}

/// Execute the stats command
pub fn execute_stats(app: &App, args: &StatsArgs, output_mode: OutputMode) -> Result<()> {
    let report = app.stats(&args.entities, &args.relations)?;
    output::print_stats_report(&report, output_mode)?;
    Ok(())
}

/// Execute the cycles command
pub fn execute_cycles(app: &App, args: &CyclesArgs, output_mode: OutputMode) -> Result<()> {
    let report = app.cycles(&args.relations)?;
    output::print_cycle_report(&report, output_mode)?;
    Ok(())
}

/// Execute the view command
pub fn execute_view(app: &App, args: &ViewArgs, output_mode: OutputMode) -> Result<()> {
    let level = args.level.map(|l| l as usize);
    let report = app
        .view(&args.file, args.num, level, &args.columns)
        .with_context(|| format!("failed to view {}", args.file.display()))?;
    output::print_view_report(&report, output_mode)?;
    Ok(())
}
