//! Output formatting for CLI commands.
//!
//! Every report can be printed as human-readable text or as JSON for
//! programmatic use. Text printers take any writer so they can be tested
//! against a buffer.

use crate::app::{LevelsReport, PathsReport, StatsReport, ViewReport};
use crate::hierarchy::{CycleBreak, CycleReport};
use crate::stats::{LevelDistribution, PathStats, RelationStats};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Widest a single `view` cell may get before it wraps.
const MAX_CELL_WIDTH: usize = 60;

/// Longest rule line printed around `view` output.
const MAX_RULE_WIDTH: usize = 100;

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

/// Print a report either as text through `text` or as JSON.
fn print_report<T, F>(report: &T, mode: OutputMode, text: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&mut io::StdoutLock<'static>, &T) -> io::Result<()>,
{
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => text(&mut handle, report),
        OutputMode::Json => write_json(&mut handle, report),
    }
}

/// Print the result of the `levels` command.
pub fn print_levels_report(report: &LevelsReport, mode: OutputMode) -> io::Result<()> {
    print_report(report, mode, write_levels_report)
}

/// Print the result of the `paths` command.
pub fn print_paths_report(report: &PathsReport, mode: OutputMode) -> io::Result<()> {
    print_report(report, mode, write_paths_report)
}

/// Print the result of the `stats` command.
pub fn print_stats_report(report: &StatsReport, mode: OutputMode) -> io::Result<()> {
    print_report(report, mode, write_stats_report)
}

/// Print the result of the `cycles` command.
pub fn print_cycle_report(report: &CycleReport, mode: OutputMode) -> io::Result<()> {
    print_report(report, mode, write_cycle_report)
}

/// Print the result of the `view` command.
pub fn print_view_report(report: &ViewReport, mode: OutputMode) -> io::Result<()> {
    print_report(report, mode, |w, r| write_view_report(w, r, get_terminal_width()))
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_heading<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    writeln!(w, "{}", title.cyan().bold())
}

fn write_field<W: Write>(w: &mut W, name: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(w, "  {}: {}", name.white().bold(), value)
}

fn write_level_distribution<W: Write>(
    w: &mut W,
    distribution: &LevelDistribution,
) -> io::Result<()> {
    write_heading(w, "Level distribution")?;
    if distribution.levels.is_empty() {
        writeln!(w, "  {}", "no nodes".dimmed())?;
    }
    for (level, count) in &distribution.levels {
        writeln!(w, "  Level {level}: {}", count.to_string().green())?;
    }
    Ok(())
}

fn write_path_stats<W: Write>(w: &mut W, stats: &PathStats) -> io::Result<()> {
    write_heading(w, "Path statistics")?;
    write_field(w, "Input entities", stats.input_entities)?;
    write_field(w, "Output rows", stats.output_rows)?;
    write_field(w, "Average paths per entity", format!("{:.2}", stats.average_paths()))?;
    write_field(w, "Entities with 1 path", stats.single_path)?;
    write_field(w, "Entities with 2+ paths", stats.multi_path)?;
    write_field(w, "Max paths for one entity", stats.max_paths)?;
    write_field(w, "Max path length", stats.max_path_length)?;
    writeln!(w)?;
    write_heading(w, "Paths per entity")?;
    writeln!(w, "  1 path: {}", stats.buckets.one)?;
    writeln!(w, "  2-5 paths: {}", stats.buckets.two_to_five)?;
    writeln!(w, "  6-10 paths: {}", stats.buckets.six_to_ten)?;
    writeln!(w, "  >10 paths: {}", stats.buckets.over_ten)?;
    Ok(())
}

fn write_relation_stats<W: Write>(w: &mut W, stats: &RelationStats) -> io::Result<()> {
    write_heading(w, "Relations")?;
    write_field(w, "Rows", stats.relations)?;
    write_field(w, "Distinct edges", stats.edges)?;
    write_field(w, "Duplicates ignored", stats.duplicates)?;
    write_field(w, "Nodes", stats.nodes)?;
    write_field(w, "Roots", stats.roots)?;
    write_field(w, "Nodes with parents", stats.children)?;
    write_field(w, "Max parents of one node", stats.max_parents)?;
    if stats.group_nodes + stats.leaf_nodes > 0 {
        write_field(w, "Group nodes", stats.group_nodes)?;
        write_field(w, "Leaf nodes", stats.leaf_nodes)?;
    }
    for pair in &stats.type_pairs {
        writeln!(
            w,
            "    {} -> {}: {}",
            pair.parent_type,
            pair.child_type,
            pair.count.to_string().green()
        )?;
    }
    Ok(())
}

fn write_cycle_breaks<W: Write>(w: &mut W, breaks: &[CycleBreak]) -> io::Result<()> {
    if breaks.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(
        w,
        "{} {} parent edges were cut to break cycles (see `taxopath cycles`)",
        "warning:".yellow().bold(),
        breaks.len()
    )
}

fn write_levels_report<W: Write>(w: &mut W, report: &LevelsReport) -> io::Result<()> {
    writeln!(
        w,
        "Wrote {} entities to {}",
        report.entities.to_string().green(),
        report.output.display()
    )?;
    writeln!(w)?;
    write_level_distribution(w, &report.levels)?;
    write_cycle_breaks(w, &report.cycle_breaks)
}

fn write_paths_report<W: Write>(w: &mut W, report: &PathsReport) -> io::Result<()> {
    writeln!(
        w,
        "Wrote {} rows to {}",
        report.paths.output_rows.to_string().green(),
        report.output.display()
    )?;
    writeln!(w)?;
    write_path_stats(w, &report.paths)?;
    write_cycle_breaks(w, &report.cycle_breaks)
}

fn write_stats_report<W: Write>(w: &mut W, report: &StatsReport) -> io::Result<()> {
    write_relation_stats(w, &report.relations)?;
    writeln!(w)?;
    write_level_distribution(w, &report.levels)?;
    writeln!(w)?;
    write_path_stats(w, &report.paths)?;
    write_cycle_breaks(w, &report.cycle_breaks)
}

fn write_cycle_report<W: Write>(w: &mut W, report: &CycleReport) -> io::Result<()> {
    if report.is_empty() {
        writeln!(w, "{}", "No cycles detected.".green())?;
        return Ok(());
    }

    writeln!(
        w,
        "Found {} cycles:",
        report.cycles.len().to_string().red().bold()
    )?;
    writeln!(w)?;

    for (i, cycle) in report.cycles.iter().enumerate() {
        writeln!(w, "  {} {}:", "Cycle".yellow().bold(), i + 1)?;

        // Close the loop: a -> b -> a
        let mut rendered = cycle
            .nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        if let Some(first) = cycle.nodes.first() {
            rendered.push_str(" -> ");
            rendered.push_str(first.as_str());
        }
        writeln!(w, "    {}", rendered.dimmed())?;
    }

    if !report.breaks.is_empty() {
        writeln!(w)?;
        write_heading(w, "Edges cut during traversal (child -> parent)")?;
        for cycle_break in &report.breaks {
            writeln!(w, "  {cycle_break}")?;
        }
    }
    Ok(())
}

/// Wrap a cell to `width`, always yielding at least one line.
fn wrap_cell(text: &str, width: usize) -> Vec<String> {
    let lines: Vec<String> = textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn write_view_report<W: Write>(
    w: &mut W,
    report: &ViewReport,
    terminal_width: usize,
) -> io::Result<()> {
    match report.level {
        Some(level) => writeln!(w, "Showing rows at level {level}")?,
        None => writeln!(w, "Showing first {} rows", report.rows.len())?,
    }

    let widths: Vec<usize> = report
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            report
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count()])
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let rule = "=".repeat(terminal_width.clamp(1, MAX_RULE_WIDTH));
    writeln!(w)?;
    writeln!(w, "{rule}")?;

    let header_line = report
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, width)| format!("{h:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(w, "{}", header_line.trim_end().bold())?;

    for row in &report.rows {
        let cells: Vec<Vec<String>> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| wrap_cell(cell, (*width).max(1)))
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let rendered = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let text = cell.get(line).map_or("", String::as_str);
                    format!("{text:<width$}")
                })
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(w, "{}", rendered.trim_end())?;
        }
    }

    writeln!(w, "{rule}")?;
    writeln!(w)?;
    write_field(w, "Total rows", report.total)?;
    writeln!(w)?;
    write_level_distribution(w, &report.levels)
}
