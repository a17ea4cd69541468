//! Reading relation records out of a parsed table.

use crate::config::RelationColumns;
use crate::domain::{NodeId, ObjectType, Relation};
use crate::error::{Error, Result};
use crate::hierarchy::graph::Hierarchy;
use taxopath_table::{Record, Table};

/// Resolved column positions for one relation table.
#[derive(Debug, Clone, Copy)]
struct Columns {
    parent_id: usize,
    child_id: usize,
    parent_type: Option<usize>,
    child_type: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table, names: &RelationColumns) -> Result<Self> {
        Ok(Self {
            parent_id: table.require_column(&names.parent_id)?,
            child_id: table.require_column(&names.child_id)?,
            parent_type: optional_column(table, &names.parent_type),
            child_type: optional_column(table, &names.child_type),
        })
    }
}

fn optional_column(table: &Table, name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    let idx = table.column_index(name);
    if idx.is_none() {
        tracing::debug!(column = name, "Type column not present; relations are untyped");
    }
    idx
}

fn parse_record(record: &Record<'_>, columns: Columns, names: &RelationColumns) -> Result<Relation> {
    let parent = record
        .non_empty_at(columns.parent_id)
        .ok_or_else(|| Error::MalformedRelation {
            line: record.line(),
            reason: format!("missing {}", names.parent_id),
        })?;
    let child = record
        .non_empty_at(columns.child_id)
        .ok_or_else(|| Error::MalformedRelation {
            line: record.line(),
            reason: format!("missing {}", names.child_id),
        })?;

    let tag = |idx: Option<usize>| {
        idx.and_then(|i| record.non_empty_at(i))
            .map(ObjectType::parse)
    };

    Ok(Relation {
        parent: NodeId::from(parent),
        child: NodeId::from(child),
        parent_type: tag(columns.parent_type),
        child_type: tag(columns.child_type),
    })
}

/// Parse every row of a relation table, in row order.
///
/// IDs are trimmed. The type columns are read only when configured and
/// present in the table.
///
/// # Errors
///
/// Returns [`Error::Table`] if an ID column is missing and
/// [`Error::MalformedRelation`] for the first row with a blank parent or
/// child ID.
pub fn read_relations(table: &Table, names: &RelationColumns) -> Result<Vec<Relation>> {
    let columns = Columns::resolve(table, names)?;
    table
        .records()
        .map(|record| parse_record(&record, columns, names))
        .collect()
}

/// Build the hierarchy from already parsed relations.
#[must_use]
pub fn build_hierarchy(relations: &[Relation]) -> Hierarchy {
    let hierarchy = Hierarchy::from_relations(relations.iter().cloned());
    tracing::info!(
        relations = relations.len(),
        nodes = hierarchy.nodes().len(),
        edges = hierarchy.edge_count(),
        roots = hierarchy.roots().count(),
        duplicates = hierarchy.duplicate_count(),
        "Loaded hierarchy"
    );
    hierarchy
}

/// Build the hierarchy from a relation table.
///
/// # Errors
///
/// See [`read_relations`]; no hierarchy is produced if any row is malformed.
pub fn load_hierarchy(table: &Table, names: &RelationColumns) -> Result<Hierarchy> {
    let relations = read_relations(table, names)?;
    Ok(build_hierarchy(&relations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxopath_table::{Row, TableReader};

    fn table(csv: &str) -> Table {
        TableReader::new().read(csv.as_bytes()).unwrap().0
    }

    #[test]
    fn reads_typed_relations_in_order() {
        let t = table(
            "PARENTOBJECTTYPE,PARENTID,CHILDID,CHILDOBJECTTYPE\n\
             skillgroup,g1,s1,skill\n\
             skillgroup,g1,s2,skill\n",
        );

        let relations = read_relations(&t, &RelationColumns::default()).unwrap();

        assert_eq!(relations.len(), 2);
        assert_eq!(relations[0].parent.as_str(), "g1");
        assert_eq!(relations[1].child.as_str(), "s2");
        assert_eq!(relations[0].parent_type, Some(ObjectType::SkillGroup));
        assert_eq!(relations[0].child_type, Some(ObjectType::Skill));
    }

    #[test]
    fn missing_type_columns_yield_untyped_relations() {
        let t = table("PARENTID,CHILDID\nA,B\n");

        let relations = read_relations(&t, &RelationColumns::default()).unwrap();
        assert_eq!(relations, vec![Relation::new("A", "B")]);
    }

    #[test]
    fn ids_are_trimmed() {
        let t = table("PARENTID,CHILDID\n A , B\n");

        let relations = read_relations(&t, &RelationColumns::default()).unwrap();
        assert_eq!(relations, vec![Relation::new("A", "B")]);
    }

    #[test]
    fn blank_child_is_a_hard_stop() {
        let t = table("PARENTID,CHILDID\nA,B\nC,\n");

        let err = read_relations(&t, &RelationColumns::default()).unwrap_err();
        match err {
            Error::MalformedRelation { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("CHILDID"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_id_column_is_reported() {
        let t = table("PARENT,CHILDID\nA,B\n");

        let err = load_hierarchy(&t, &RelationColumns::default()).unwrap_err();
        assert!(err.to_string().contains("PARENTID"));
    }

    #[test]
    fn custom_columns() {
        let mut t = Table::new(vec!["DWA ID".to_string(), "Task ID".to_string()]);
        t.push_row(Row::new(2, vec!["4.A.1".to_string(), "8823".to_string()]))
            .unwrap();
        let names = RelationColumns {
            parent_id: "DWA ID".to_string(),
            child_id: "Task ID".to_string(),
            parent_type: String::new(),
            child_type: String::new(),
        };

        let h = load_hierarchy(&t, &names).unwrap();
        assert_eq!(h.parents_of(&NodeId::from("8823")), [NodeId::from("4.A.1")]);
    }
}
