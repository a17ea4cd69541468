//! Turning hierarchy results into output tables.
//!
//! Two output modes share the entity table as input:
//!
//! - [`annotate_levels`] keeps one row per entity and adds the depth.
//! - [`RowMaterializer::expand`] writes one row per upward path, with
//!   per-level ID/label column pairs and the rendered path.
//!
//! In both, every original field is carried over unchanged.

use crate::config::{EntityColumns, OutputConfig};
use crate::domain::{HierarchyPath, NodeId};
use crate::error::{Error, Result};
use crate::hierarchy::{DepthResolver, PathEnumerator, PathList};
use crate::stats::{LevelDistribution, PathStats};
use std::collections::HashMap;
use taxopath_table::{Row, Table};

/// Entities between progress log lines.
const PROGRESS_INTERVAL: usize = 1000;

/// The node ID of every entity row, in row order.
///
/// # Errors
///
/// Returns [`Error::Table`] if the ID column is missing and
/// [`Error::MalformedEntity`] for the first row with a blank ID.
pub fn entity_ids(table: &Table, columns: &EntityColumns) -> Result<Vec<NodeId>> {
    let id_column = table.require_column(&columns.id)?;
    table
        .records()
        .map(|record| {
            record
                .non_empty_at(id_column)
                .map(NodeId::from)
                .ok_or_else(|| Error::MalformedEntity {
                    line: record.line(),
                    reason: format!("missing {}", columns.id),
                })
        })
        .collect()
}

/// Human-readable labels by node ID.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    labels: HashMap<NodeId, String>,
}

impl Labels {
    /// Create an empty label map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label of `id`, replacing any earlier one.
    pub fn insert(&mut self, id: NodeId, label: impl Into<String>) {
        self.labels.insert(id, label.into());
    }

    /// Merge the labels of an entity table.
    ///
    /// Later calls overwrite earlier ones on the same ID. Blank labels are
    /// skipped and never replace a known one. Returns the number of labels
    /// taken from this table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Table`] if the ID or label column is missing and
    /// [`Error::MalformedEntity`] for a row with a blank ID.
    pub fn extend_from_table(&mut self, table: &Table, columns: &EntityColumns) -> Result<usize> {
        let id_column = table.require_column(&columns.id)?;
        let label_column = table.require_column(&columns.label)?;

        let mut taken = 0;
        for record in table.records() {
            let id = record
                .non_empty_at(id_column)
                .ok_or_else(|| Error::MalformedEntity {
                    line: record.line(),
                    reason: format!("missing {}", columns.id),
                })?;
            if let Some(label) = record.non_empty_at(label_column) {
                self.insert(NodeId::from(id), label);
                taken += 1;
            }
        }
        Ok(taken)
    }

    /// Label of `id`, if known.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Label of `id`, or the ID itself when unknown.
    #[must_use]
    pub fn label_or_id<'a>(&'a self, id: &'a NodeId) -> &'a str {
        self.get(id).unwrap_or(id.as_str())
    }

    /// Number of known labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no label is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Copy `entities` with the depth of each row written to `level_column`.
///
/// The column is appended, or overwritten in place when the table already
/// has it. `ids` must hold one ID per entity row. The distribution counts
/// every distinct node the resolver reached, ancestors included.
///
/// # Errors
///
/// Returns [`Error::Table`] if the rebuilt rows do not fit the table.
pub fn annotate_levels(
    entities: &Table,
    ids: &[NodeId],
    resolver: &mut DepthResolver<'_>,
    level_column: &str,
) -> Result<(Table, LevelDistribution)> {
    let existing = entities.column_index(level_column);
    let mut headers = entities.headers().to_vec();
    if existing.is_none() {
        headers.push(level_column.to_string());
    }

    let mut output = Table::new(headers);

    for (processed, (row, id)) in entities.rows().iter().zip(ids).enumerate() {
        let level = resolver.depth(id);

        let mut values = row.values().to_vec();
        match existing.and_then(|idx| values.get_mut(idx)) {
            Some(slot) => *slot = level.to_string(),
            None => values.push(level.to_string()),
        }
        output.push_row(Row::new(row.line(), values))?;

        if (processed + 1) % PROGRESS_INTERVAL == 0 {
            tracing::debug!(processed = processed + 1, "Resolving levels");
        }
    }

    let distribution = resolver.level_distribution();
    tracing::info!(
        entities = output.len(),
        nodes = distribution.total,
        max_level = distribution.max_level().unwrap_or(0),
        "Levels resolved"
    );
    Ok((output, distribution))
}

/// Expands entity rows into one row per upward path.
#[derive(Debug, Clone, Copy)]
pub struct RowMaterializer<'a> {
    output: &'a OutputConfig,
    labels: &'a Labels,
}

impl<'a> RowMaterializer<'a> {
    /// Create a materializer writing columns named by `output`.
    #[must_use]
    pub fn new(output: &'a OutputConfig, labels: &'a Labels) -> Self {
        Self { output, labels }
    }

    /// Headers of the expanded table for paths up to `max_len` nodes.
    #[must_use]
    pub fn headers(&self, source: &[String], max_len: usize) -> Vec<String> {
        let prefix = &self.output.level_prefix;
        let mut headers = source.to_vec();
        for level in 1..=max_len {
            headers.push(format!("{prefix}{level}_ID"));
            headers.push(format!("{prefix}{level}_LABEL"));
        }
        headers.push(self.output.path_column.clone());
        headers.push(self.output.path_labels_column.clone());
        headers
    }

    /// Output values for one path: source fields, `max_len` ID/label pairs
    /// root first (blank beyond the path's end), the ID path and the label
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelimiterInId`] if any ID on the path contains the
    /// path delimiter.
    pub fn path_values(
        &self,
        source: &[String],
        path: &HierarchyPath,
        max_len: usize,
    ) -> Result<Vec<String>> {
        let delimiter = &self.output.path_delimiter;
        if let Some(id) = path.nodes().iter().find(|id| id.as_str().contains(delimiter.as_str())) {
            return Err(Error::DelimiterInId {
                id: id.to_string(),
                delimiter: delimiter.clone(),
            });
        }

        let mut values = Vec::with_capacity(source.len() + 2 * max_len + 2);
        values.extend_from_slice(source);

        let mut levels = path.root_first();
        for _ in 0..max_len {
            match levels.next() {
                Some(id) => {
                    values.push(id.to_string());
                    values.push(self.labels.get(id).unwrap_or_default().to_string());
                }
                None => {
                    values.push(String::new());
                    values.push(String::new());
                }
            }
        }

        values.push(path.join(delimiter));
        values.push(
            path.root_first()
                .map(|id| self.labels.label_or_id(id))
                .collect::<Vec<_>>()
                .join(&self.output.label_delimiter),
        );
        Ok(values)
    }

    /// Expand every entity row into one output row per path of its ID.
    ///
    /// `ids` must hold one ID per entity row. IDs unknown to the hierarchy
    /// expand to a single row whose path is the ID alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelimiterInId`] if an ID on any path contains the
    /// path delimiter.
    pub fn expand(
        &self,
        entities: &Table,
        ids: &[NodeId],
        paths: &mut PathEnumerator<'_>,
    ) -> Result<(Table, PathStats)> {
        let mut stats = PathStats::default();
        let mut resolved: Vec<PathList> = Vec::with_capacity(ids.len());

        for (processed, id) in ids.iter().enumerate() {
            let list = paths.paths(id);
            let longest = list.iter().map(HierarchyPath::len).max().unwrap_or(1);
            stats.record(list.len(), longest);
            resolved.push(list);

            if (processed + 1) % PROGRESS_INTERVAL == 0 {
                tracing::debug!(processed = processed + 1, "Enumerating paths");
            }
        }

        let max_len = stats.max_path_length;
        let mut output = Table::new(self.headers(entities.headers(), max_len));

        for (row, list) in entities.rows().iter().zip(&resolved) {
            for path in list.iter() {
                let values = self.path_values(row.values(), path, max_len)?;
                output.push_row(Row::new(row.line(), values))?;
            }
        }

        tracing::info!(
            entities = stats.input_entities,
            rows = stats.output_rows,
            max_path_length = max_len,
            "Paths expanded"
        );
        Ok((output, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Relation;
    use crate::hierarchy::Hierarchy;
    use taxopath_table::TableReader;

    fn table(csv: &str) -> Table {
        TableReader::new().read(csv.as_bytes()).unwrap().0
    }

    fn diamond() -> Hierarchy {
        Hierarchy::from_relations([
            Relation::new("A", "B"),
            Relation::new("A", "C"),
            Relation::new("B", "D"),
            Relation::new("C", "D"),
        ])
    }

    fn labels() -> Labels {
        let mut labels = Labels::new();
        labels.insert(NodeId::from("A"), "all skills");
        labels.insert(NodeId::from("B"), "communication");
        labels.insert(NodeId::from("D"), "negotiate");
        labels
    }

    #[test]
    fn entity_ids_follow_row_order() {
        let t = table("ID,PREFERREDLABEL\nD,negotiate\nU,unlinked\n");

        let ids = entity_ids(&t, &EntityColumns::default()).unwrap();
        assert_eq!(ids, vec![NodeId::from("D"), NodeId::from("U")]);
    }

    #[test]
    fn blank_entity_id_is_a_hard_stop() {
        let t = table("ID,PREFERREDLABEL\nD,negotiate\n ,nothing\n");

        let err = entity_ids(&t, &EntityColumns::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedEntity { line: 3, .. }));
    }

    #[test]
    fn later_label_tables_overwrite() {
        let mut labels = Labels::new();
        let columns = EntityColumns::default();
        labels
            .extend_from_table(&table("ID,PREFERREDLABEL\ng1,old\ng2,kept\n"), &columns)
            .unwrap();
        labels
            .extend_from_table(&table("ID,PREFERREDLABEL\ng1,new\ng2,\n"), &columns)
            .unwrap();

        assert_eq!(labels.get(&NodeId::from("g1")), Some("new"));
        assert_eq!(labels.get(&NodeId::from("g2")), Some("kept"));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn annotate_appends_level_column() {
        let h = diamond();
        let entities = table("ID,PREFERREDLABEL\nD,negotiate\nA,all skills\nU,unlinked\n");
        let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();
        let mut resolver = DepthResolver::new(&h);

        let (out, distribution) = annotate_levels(&entities, &ids, &mut resolver, "LEVEL").unwrap();

        assert_eq!(out.headers(), ["ID", "PREFERREDLABEL", "LEVEL"]);
        let levels: Vec<&str> = out.records().filter_map(|r| r.get("LEVEL")).collect();
        assert_eq!(levels, vec!["3", "1", "1"]);
        assert_eq!(distribution.levels.get(&1), Some(&2));
        assert_eq!(distribution.total, 5);
        assert_eq!(out.rows()[0].line(), 2);
    }

    #[test]
    fn annotate_distribution_counts_group_ancestors() {
        let h = diamond();
        let entities = table("ID\nD\nD\n");
        let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();
        let mut resolver = DepthResolver::new(&h);

        let (out, distribution) = annotate_levels(&entities, &ids, &mut resolver, "LEVEL").unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(
            distribution.levels.into_iter().collect::<Vec<_>>(),
            vec![(1, 1), (2, 2), (3, 1)]
        );
    }

    #[test]
    fn annotate_overwrites_existing_level_column() {
        let h = diamond();
        let entities = table("ID,LEVEL\nB,9\n");
        let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();
        let mut resolver = DepthResolver::new(&h);

        let (out, _) = annotate_levels(&entities, &ids, &mut resolver, "LEVEL").unwrap();

        assert_eq!(out.headers(), ["ID", "LEVEL"]);
        assert_eq!(out.rows()[0].values(), ["B", "2"]);
    }

    #[test]
    fn expand_emits_one_row_per_path() {
        let h = diamond();
        let labels = labels();
        let output = OutputConfig::default();
        let entities = table("ID,PREFERREDLABEL,SKILLTYPE\nD,negotiate,skill\nU,unlinked,skill\n");
        let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();
        let mut paths = PathEnumerator::new(&h);

        let (out, stats) = RowMaterializer::new(&output, &labels)
            .expand(&entities, &ids, &mut paths)
            .unwrap();

        assert_eq!(
            out.headers(),
            [
                "ID",
                "PREFERREDLABEL",
                "SKILLTYPE",
                "LEVEL_1_ID",
                "LEVEL_1_LABEL",
                "LEVEL_2_ID",
                "LEVEL_2_LABEL",
                "LEVEL_3_ID",
                "LEVEL_3_LABEL",
                "HIERARCHY_PATH",
                "HIERARCHY_PATH_LABELS",
            ]
        );
        assert_eq!(out.len(), 3);
        assert_eq!(
            out.rows()[0].values(),
            [
                "D",
                "negotiate",
                "skill",
                "A",
                "all skills",
                "B",
                "communication",
                "D",
                "negotiate",
                "A;B;D",
                "all skills ; communication ; negotiate",
            ]
        );
        // C has no label: blank label column, ID in the label path.
        assert_eq!(out.rows()[1].values()[5..7], ["C", ""]);
        assert_eq!(out.rows()[1].values()[10], "all skills ; C ; negotiate");
        // The unlinked entity keeps a single trivial row, padded to width.
        assert_eq!(
            out.rows()[2].values()[3..],
            ["U", "", "", "", "", "", "U", "U"]
        );

        assert_eq!(stats.input_entities, 2);
        assert_eq!(stats.output_rows, 3);
        assert_eq!(stats.max_path_length, 3);
    }

    #[test]
    fn delimiter_inside_id_is_rejected() {
        let h = Hierarchy::from_relations([Relation::new("A;1", "B")]);
        let labels = Labels::new();
        let output = OutputConfig::default();
        let entities = table("ID\nB\n");
        let ids = entity_ids(&entities, &EntityColumns::default()).unwrap();
        let mut paths = PathEnumerator::new(&h);

        let err = RowMaterializer::new(&output, &labels)
            .expand(&entities, &ids, &mut paths)
            .unwrap_err();

        assert!(matches!(err, Error::DelimiterInId { ref id, .. } if id == "A;1"));
    }
}
