//! Parent adjacency built from relation records.
//!
//! # Representation
//!
//! Only the upward direction is stored: `parents[child]` is an ordered,
//! duplicate-free list of parent IDs in first-insertion order. Downstream
//! traversal only ever walks child -> parent, and the insertion order makes
//! path enumeration deterministic.
//!
//! Referential integrity is not checked. A parent that never appears as a
//! child simply has no entry and behaves as a root, which lets partial or
//! incomplete taxonomies be processed.

use crate::domain::{NodeId, ObjectType, Relation};
use std::collections::{HashMap, HashSet};

/// Read-only parent adjacency of a taxonomy.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    /// Child -> parents, parents in first-insertion order.
    parents: HashMap<NodeId, Vec<NodeId>>,

    /// Every edge already inserted, for idempotent loading.
    edges: HashSet<(NodeId, NodeId)>,

    /// Every node mentioned by a relation, in first-seen order.
    nodes: Vec<NodeId>,

    /// Membership index over `nodes`.
    known: HashSet<NodeId>,

    /// Object-type tag per node, first tag seen wins.
    object_types: HashMap<NodeId, ObjectType>,

    /// Relations offered to [`insert`](Self::insert) that were already present.
    duplicates: usize,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hierarchy from relations in order.
    pub fn from_relations<I>(relations: I) -> Self
    where
        I: IntoIterator<Item = Relation>,
    {
        let mut hierarchy = Self::new();
        for relation in relations {
            hierarchy.insert(relation);
        }
        hierarchy
    }

    /// Add one relation.
    ///
    /// Returns `false` if the same (parent, child) edge was already present;
    /// the adjacency is unchanged in that case.
    pub fn insert(&mut self, relation: Relation) -> bool {
        let Relation {
            parent,
            child,
            parent_type,
            child_type,
        } = relation;

        self.register(&parent, parent_type);
        self.register(&child, child_type);

        if !self.edges.insert((parent.clone(), child.clone())) {
            self.duplicates += 1;
            return false;
        }

        self.parents.entry(child).or_default().push(parent);
        true
    }

    fn register(&mut self, id: &NodeId, object_type: Option<ObjectType>) {
        if self.known.insert(id.clone()) {
            self.nodes.push(id.clone());
        }
        if let Some(object_type) = object_type {
            self.object_types.entry(id.clone()).or_insert(object_type);
        }
    }

    /// Parents of `id` in insertion order; empty for roots and unknown IDs.
    #[must_use]
    pub fn parents_of(&self, id: &NodeId) -> &[NodeId] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `id` has no parent entry.
    #[must_use]
    pub fn is_root(&self, id: &NodeId) -> bool {
        self.parents_of(id).is_empty()
    }

    /// Returns `true` if any relation mentions `id`.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.known.contains(id)
    }

    /// Every node mentioned by a relation, in first-seen order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Nodes mentioned by a relation that have no parent, in first-seen order.
    pub fn roots(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().filter(|id| self.is_root(id))
    }

    /// Object-type tag of `id`, if any relation carried one.
    #[must_use]
    pub fn object_type(&self, id: &NodeId) -> Option<&ObjectType> {
        self.object_types.get(id)
    }

    /// Number of nodes that have at least one parent.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.parents.len()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of duplicate relations that were ignored.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Largest number of parents of any single node.
    #[must_use]
    pub fn max_parent_count(&self) -> usize {
        self.parents.values().map(Vec::len).max().unwrap_or(0)
    }

    /// All distinct edges as `(parent, child)` pairs, grouped by child in
    /// first-seen node order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.nodes.iter().flat_map(move |child| {
            self.parents_of(child)
                .iter()
                .map(move |parent| (parent, child))
        })
    }
}
