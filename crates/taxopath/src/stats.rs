//! Summary reports over a run.

use crate::domain::Relation;
use crate::hierarchy::Hierarchy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of entities at each depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelDistribution {
    /// Entities counted
    pub total: usize,
    /// Level -> entity count, ascending by level
    pub levels: BTreeMap<usize, usize>,
}

impl LevelDistribution {
    /// Count one entity at `level`.
    pub fn record(&mut self, level: usize) {
        self.total += 1;
        *self.levels.entry(level).or_insert(0) += 1;
    }

    /// Deepest level seen, if any.
    #[must_use]
    pub fn max_level(&self) -> Option<usize> {
        self.levels.keys().next_back().copied()
    }
}

impl FromIterator<usize> for LevelDistribution {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut distribution = Self::default();
        for level in iter {
            distribution.record(level);
        }
        distribution
    }
}

/// Entities grouped by how many paths they expanded into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathBuckets {
    /// Exactly one path
    pub one: usize,
    /// Two to five paths
    pub two_to_five: usize,
    /// Six to ten paths
    pub six_to_ten: usize,
    /// More than ten paths
    pub over_ten: usize,
}

/// Statistics of a path expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathStats {
    /// Entity rows read
    pub input_entities: usize,
    /// Rows written, one per path
    pub output_rows: usize,
    /// Entities with exactly one path
    pub single_path: usize,
    /// Entities with two or more paths
    pub multi_path: usize,
    /// Largest number of paths for one entity
    pub max_paths: usize,
    /// Longest path, in nodes
    pub max_path_length: usize,
    /// Entity counts by path count
    pub buckets: PathBuckets,
}

impl PathStats {
    /// Account for one entity that expanded into `paths` paths, the longest
    /// of which has `longest` nodes.
    pub fn record(&mut self, paths: usize, longest: usize) {
        self.input_entities += 1;
        self.output_rows += paths;
        self.max_paths = self.max_paths.max(paths);
        self.max_path_length = self.max_path_length.max(longest);

        if paths > 1 {
            self.multi_path += 1;
        } else {
            self.single_path += 1;
        }

        match paths {
            0 | 1 => self.buckets.one += 1,
            2..=5 => self.buckets.two_to_five += 1,
            6..=10 => self.buckets.six_to_ten += 1,
            _ => self.buckets.over_ten += 1,
        }
    }

    /// Mean paths per entity; 0 when nothing was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_paths(&self) -> f64 {
        if self.input_entities == 0 {
            0.0
        } else {
            self.output_rows as f64 / self.input_entities as f64
        }
    }
}

/// Relation count for one (parent type, child type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypePairCount {
    /// Parent object type, `untyped` when absent
    pub parent_type: String,
    /// Child object type, `untyped` when absent
    pub child_type: String,
    /// Number of relation rows
    pub count: usize,
}

/// Shape of the relation table and the hierarchy built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationStats {
    /// Relation rows read
    pub relations: usize,
    /// Distinct edges kept
    pub edges: usize,
    /// Rows ignored as duplicate edges
    pub duplicates: usize,
    /// Distinct nodes mentioned
    pub nodes: usize,
    /// Nodes without a parent
    pub roots: usize,
    /// Nodes with at least one parent
    pub children: usize,
    /// Most parents of any single node
    pub max_parents: usize,
    /// Nodes tagged with a grouping type (skill groups, work activities)
    pub group_nodes: usize,
    /// Nodes tagged with any other type
    pub leaf_nodes: usize,
    /// Rows per type pair, most frequent first
    pub type_pairs: Vec<TypePairCount>,
}

impl RelationStats {
    /// Summarize `relations` and the hierarchy that was built from them.
    #[must_use]
    pub fn collect(relations: &[Relation], hierarchy: &Hierarchy) -> Self {
        const UNTYPED: &str = "untyped";

        let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();
        for relation in relations {
            let parent = relation
                .parent_type
                .as_ref()
                .map_or(UNTYPED, |t| t.as_str())
                .to_string();
            let child = relation
                .child_type
                .as_ref()
                .map_or(UNTYPED, |t| t.as_str())
                .to_string();
            *pairs.entry((parent, child)).or_insert(0) += 1;
        }

        let mut type_pairs: Vec<TypePairCount> = pairs
            .into_iter()
            .map(|((parent_type, child_type), count)| TypePairCount {
                parent_type,
                child_type,
                count,
            })
            .collect();
        // Stable sort keeps alphabetical order within equal counts.
        type_pairs.sort_by(|a, b| b.count.cmp(&a.count));

        let (group_nodes, leaf_nodes) = hierarchy
            .nodes()
            .iter()
            .filter_map(|id| hierarchy.object_type(id))
            .fold((0, 0), |(groups, leaves), tag| {
                if tag.is_group() {
                    (groups + 1, leaves)
                } else {
                    (groups, leaves + 1)
                }
            });

        Self {
            relations: relations.len(),
            edges: hierarchy.edge_count(),
            duplicates: hierarchy.duplicate_count(),
            nodes: hierarchy.nodes().len(),
            roots: hierarchy.roots().count(),
            children: hierarchy.child_count(),
            max_parents: hierarchy.max_parent_count(),
            group_nodes,
            leaf_nodes,
            type_pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObjectType;
    use rstest::rstest;

    #[test]
    fn level_distribution_counts_and_orders() {
        let distribution: LevelDistribution = [3, 1, 3, 2].into_iter().collect();

        assert_eq!(distribution.total, 4);
        assert_eq!(
            distribution.levels.into_iter().collect::<Vec<_>>(),
            vec![(1, 1), (2, 1), (3, 2)]
        );
    }

    #[test]
    fn empty_distribution_has_no_max() {
        assert_eq!(LevelDistribution::default().max_level(), None);
    }

    #[rstest]
    #[case::one(1, PathBuckets { one: 1, ..PathBuckets::default() })]
    #[case::two(2, PathBuckets { two_to_five: 1, ..PathBuckets::default() })]
    #[case::five(5, PathBuckets { two_to_five: 1, ..PathBuckets::default() })]
    #[case::six(6, PathBuckets { six_to_ten: 1, ..PathBuckets::default() })]
    #[case::ten(10, PathBuckets { six_to_ten: 1, ..PathBuckets::default() })]
    #[case::eleven(11, PathBuckets { over_ten: 1, ..PathBuckets::default() })]
    fn path_buckets(#[case] paths: usize, #[case] expected: PathBuckets) {
        let mut stats = PathStats::default();
        stats.record(paths, 3);

        assert_eq!(stats.buckets, expected);
    }

    #[test]
    fn path_stats_accumulate() {
        let mut stats = PathStats::default();
        stats.record(1, 1);
        stats.record(2, 3);
        stats.record(3, 4);

        assert_eq!(stats.input_entities, 3);
        assert_eq!(stats.output_rows, 6);
        assert_eq!(stats.single_path, 1);
        assert_eq!(stats.multi_path, 2);
        assert_eq!(stats.max_paths, 3);
        assert_eq!(stats.max_path_length, 4);
        assert!((stats.average_paths() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn relation_stats_group_type_pairs() {
        let relations = vec![
            Relation::new("g1", "s1").with_types(ObjectType::SkillGroup, ObjectType::Skill),
            Relation::new("g1", "s2").with_types(ObjectType::SkillGroup, ObjectType::Skill),
            Relation::new("g0", "g1").with_types(ObjectType::SkillGroup, ObjectType::SkillGroup),
            Relation::new("g1", "s1").with_types(ObjectType::SkillGroup, ObjectType::Skill),
            Relation::new("s1", "s3"),
        ];
        let hierarchy = Hierarchy::from_relations(relations.clone());

        let stats = RelationStats::collect(&relations, &hierarchy);

        assert_eq!(stats.relations, 5);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.group_nodes, 2);
        assert_eq!(stats.leaf_nodes, 2);
        assert_eq!(stats.type_pairs[0].count, 3);
        assert_eq!(stats.type_pairs[0].child_type, "skill");
        assert_eq!(stats.type_pairs.len(), 3);
        assert!(
            stats
                .type_pairs
                .iter()
                .any(|p| p.parent_type == "untyped" && p.child_type == "untyped")
        );
    }
}
