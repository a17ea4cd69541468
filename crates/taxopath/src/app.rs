//! Application context for CLI command execution.
//!
//! [`App`] owns the run configuration and wires the pieces together: read
//! the tables, build the hierarchy, run a resolver, write the result
//! atomically and hand a serializable report back to the command layer.
//!
//! # Example
//!
//! ```no_run
//! use taxopath::app::App;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::from_config_path(None)?;
//!     let report = app.levels(
//!         Path::new("skills.csv"),
//!         Path::new("skill_hierarchy.csv"),
//!         Path::new("skills_with_levels.csv"),
//!     )?;
//!     println!("{} skills", report.entities);
//!     Ok(())
//! }
//! ```

use crate::config::Config;
use crate::domain::{HierarchyPath, NodeId, Relation};
use crate::error::Result;
use crate::hierarchy::{
    self, CycleBreak, CycleReport, DepthResolver, Hierarchy, PathEnumerator, build_hierarchy,
    find_cycles, read_relations,
};
use crate::materialize::{Labels, RowMaterializer, annotate_levels, entity_ids};
use crate::stats::{LevelDistribution, PathStats, RelationStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use taxopath_table::{Table, TableReader, write_table_atomic};

/// Result of the `levels` command.
#[derive(Debug, Clone, Serialize)]
pub struct LevelsReport {
    /// Where the levelled table was written
    pub output: PathBuf,
    /// Entity rows written
    pub entities: usize,
    /// Nodes per level, ancestors of the entities included
    pub levels: LevelDistribution,
    /// Edges cut while resolving depths
    pub cycle_breaks: Vec<CycleBreak>,
}

/// Result of the `paths` command.
#[derive(Debug, Clone, Serialize)]
pub struct PathsReport {
    /// Where the expanded table was written
    pub output: PathBuf,
    /// Expansion statistics
    pub paths: PathStats,
    /// Number of labels available for path rendering
    pub labels: usize,
    /// Edges cut while enumerating paths
    pub cycle_breaks: Vec<CycleBreak>,
}

/// Result of the `stats` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    /// Shape of the relation table
    pub relations: RelationStats,
    /// Nodes per level, ancestors of the entities included
    pub levels: LevelDistribution,
    /// What a path expansion would produce
    pub paths: PathStats,
    /// Edges cut while resolving depths and paths
    pub cycle_breaks: Vec<CycleBreak>,
}

/// Result of the `view` command.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    /// Level the rows were filtered on, if any
    pub level: Option<usize>,
    /// Displayed column names
    pub headers: Vec<String>,
    /// Displayed rows, at most the requested number
    pub rows: Vec<Vec<String>>,
    /// Rows matching the filter
    pub total: usize,
    /// Level distribution of the matching rows
    pub levels: LevelDistribution,
}

/// Application context for CLI operations.
#[derive(Debug, Clone, Default)]
pub struct App {
    config: Config,
}

impl App {
    /// Create an App from an already validated configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create an App from an optional configuration file.
    ///
    /// Without a file the built-in defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        Ok(Self::new(config))
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a table, logging every repaired row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_table(&self, path: &Path) -> Result<Table> {
        let reader = TableReader::new().with_delimiter(self.config.table_delimiter()?);
        let (table, warnings) = reader.read_path(path)?;

        for warning in &warnings {
            tracing::warn!(
                path = %path.display(),
                line = warning.line_number(),
                kind = warning.kind(),
                "{}",
                warning.description()
            );
        }
        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            warnings = warnings.len(),
            "Read table"
        );
        Ok(table)
    }

    /// Read a relation table and build the hierarchy from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a relation row is
    /// malformed.
    pub fn load_hierarchy(&self, path: &Path) -> Result<Hierarchy> {
        let table = self.read_table(path)?;
        hierarchy::load_hierarchy(&table, &self.config.relations)
    }

    /// Read a relation table, keeping the parsed rows alongside the
    /// hierarchy for relation statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a relation row is
    /// malformed.
    pub fn load_relations(&self, path: &Path) -> Result<(Vec<Relation>, Hierarchy)> {
        let table = self.read_table(path)?;
        let relations = read_relations(&table, &self.config.relations)?;
        let hierarchy = build_hierarchy(&relations);
        Ok((relations, hierarchy))
    }

    fn read_entities(&self, path: &Path) -> Result<(Table, Vec<NodeId>)> {
        let table = self.read_table(path)?;
        let ids = entity_ids(&table, &self.config.entities)?;
        Ok((table, ids))
    }

    fn write_table(&self, path: &Path, table: &Table) -> Result<()> {
        write_table_atomic(path, table, self.config.table_delimiter()?)?;
        tracing::info!(path = %path.display(), rows = table.len(), "Wrote table");
        Ok(())
    }

    /// Write the entity table with a depth column added.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read, a row is malformed, or
    /// the output cannot be written.
    pub fn levels(&self, entities: &Path, relations: &Path, output: &Path) -> Result<LevelsReport> {
        let hierarchy = self.load_hierarchy(relations)?;
        let (table, ids) = self.read_entities(entities)?;

        let mut resolver = DepthResolver::new(&hierarchy);
        let (levelled, levels) = annotate_levels(
            &table,
            &ids,
            &mut resolver,
            &self.config.output.level_column,
        )?;
        self.write_table(output, &levelled)?;

        Ok(LevelsReport {
            output: output.to_path_buf(),
            entities: levelled.len(),
            levels,
            cycle_breaks: resolver.cycle_breaks().iter().cloned().collect(),
        })
    }

    /// Write one row per upward path of every entity.
    ///
    /// Labels come from the entity table first, then from each of
    /// `label_tables` in order, later tables overwriting earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read, a row is malformed, an
    /// ID contains the path delimiter, or the output cannot be written.
    pub fn paths(
        &self,
        entities: &Path,
        relations: &Path,
        label_tables: &[PathBuf],
        output: &Path,
    ) -> Result<PathsReport> {
        let hierarchy = self.load_hierarchy(relations)?;
        let (table, ids) = self.read_entities(entities)?;
        let labels = self.load_labels(&table, label_tables)?;

        let mut enumerator = PathEnumerator::new(&hierarchy);
        let (expanded, paths) = RowMaterializer::new(&self.config.output, &labels).expand(
            &table,
            &ids,
            &mut enumerator,
        )?;
        self.write_table(output, &expanded)?;

        Ok(PathsReport {
            output: output.to_path_buf(),
            paths,
            labels: labels.len(),
            cycle_breaks: enumerator.cycle_breaks().iter().cloned().collect(),
        })
    }

    fn load_labels(&self, entities: &Table, label_tables: &[PathBuf]) -> Result<Labels> {
        let columns = &self.config.entities;
        let mut labels = Labels::new();

        if entities.column_index(&columns.label).is_some() {
            labels.extend_from_table(entities, columns)?;
        } else {
            tracing::debug!(column = %columns.label, "Entity table has no label column");
        }

        for path in label_tables {
            let table = self.read_table(path)?;
            let taken = labels.extend_from_table(&table, columns)?;
            tracing::debug!(path = %path.display(), labels = taken, "Loaded labels");
        }

        Ok(labels)
    }

    /// Compute every report without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or a row is malformed.
    pub fn stats(&self, entities: &Path, relations: &Path) -> Result<StatsReport> {
        let (relation_list, hierarchy) = self.load_relations(relations)?;
        let (_, ids) = self.read_entities(entities)?;

        let mut resolver = DepthResolver::new(&hierarchy);
        for id in &ids {
            resolver.depth(id);
        }
        let levels = resolver.level_distribution();

        let mut enumerator = PathEnumerator::new(&hierarchy);
        let mut paths = PathStats::default();
        for id in &ids {
            let list = enumerator.paths(id);
            let longest = list.iter().map(HierarchyPath::len).max().unwrap_or(1);
            paths.record(list.len(), longest);
        }

        let mut cycle_breaks: Vec<CycleBreak> = resolver.cycle_breaks().iter().cloned().collect();
        cycle_breaks.extend(enumerator.cycle_breaks().iter().cloned());
        cycle_breaks.sort();
        cycle_breaks.dedup();

        Ok(StatsReport {
            relations: RelationStats::collect(&relation_list, &hierarchy),
            levels,
            paths,
            cycle_breaks,
        })
    }

    /// Report cycles in a relation table.
    ///
    /// The cut edges are those a full depth pass over every node applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or a row is malformed.
    pub fn cycles(&self, relations: &Path) -> Result<CycleReport> {
        let hierarchy = self.load_hierarchy(relations)?;

        let mut resolver = DepthResolver::new(&hierarchy);
        for id in hierarchy.nodes() {
            resolver.depth(id);
        }

        Ok(CycleReport {
            cycles: find_cycles(&hierarchy),
            breaks: resolver.cycle_breaks().iter().cloned().collect(),
        })
    }

    /// Select the key columns of a levelled table.
    ///
    /// Shows the ID, label and level columns with `extra_columns` in
    /// between, or the configured view columns when `extra_columns` is
    /// empty. Columns the table lacks are left out, except the level column
    /// which is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or has no level column.
    pub fn view(
        &self,
        file: &Path,
        limit: usize,
        level: Option<usize>,
        extra_columns: &[String],
    ) -> Result<ViewReport> {
        let table = self.read_table(file)?;
        let level_column = table.require_column(&self.config.output.level_column)?;

        let extra = if extra_columns.is_empty() {
            self.config.entities.view_columns.as_slice()
        } else {
            extra_columns
        };
        let wanted = [&self.config.entities.id, &self.config.entities.label]
            .into_iter()
            .chain(extra)
            .chain([&self.config.output.level_column]);
        let mut columns: Vec<(String, usize)> = Vec::new();
        for name in wanted {
            if let Some(idx) = table.column_index(name)
                && !columns.iter().any(|(_, i)| *i == idx)
            {
                columns.push((name.clone(), idx));
            }
        }

        let mut levels = LevelDistribution::default();
        let mut rows = Vec::new();
        for record in table.records() {
            let row_level = record
                .non_empty_at(level_column)
                .and_then(|v| v.parse::<usize>().ok());
            if level.is_some() && row_level != level {
                continue;
            }
            if let Some(row_level) = row_level {
                levels.record(row_level);
            }
            if rows.len() < limit {
                rows.push(
                    columns
                        .iter()
                        .map(|(_, idx)| record.get_at(*idx).unwrap_or_default().to_string())
                        .collect(),
                );
            }
        }

        let total = if level.is_some() {
            levels.total
        } else {
            table.len()
        };

        Ok(ViewReport {
            level,
            headers: columns.into_iter().map(|(name, _)| name).collect(),
            rows,
            total,
            levels,
        })
    }
}
