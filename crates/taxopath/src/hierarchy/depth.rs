//! Depth of a node: 1 for roots, otherwise 1 + the deepest parent.

use crate::domain::NodeId;
use crate::hierarchy::graph::Hierarchy;
use crate::hierarchy::walk::{CycleBreak, UpwardFold, Walker};
use crate::stats::LevelDistribution;
use std::collections::BTreeSet;

struct DepthFold;

impl UpwardFold for DepthFold {
    type Value = usize;

    fn terminal(&self, _node: &NodeId) -> usize {
        1
    }

    fn combine(&self, _node: &NodeId, parents: Vec<usize>) -> usize {
        1 + parents.into_iter().max().unwrap_or(0)
    }
}

/// Memoized depth lookups over one hierarchy.
///
/// Unknown IDs are roots and resolve to depth 1. Cycles are cut where
/// they close; see [`CycleBreak`].
pub struct DepthResolver<'h> {
    walker: Walker<'h, DepthFold>,
}

impl<'h> DepthResolver<'h> {
    /// Create a resolver with an empty memo.
    #[must_use]
    pub fn new(hierarchy: &'h Hierarchy) -> Self {
        Self {
            walker: Walker::new(hierarchy, DepthFold),
        }
    }

    /// Depth of `id`; always at least 1.
    pub fn depth(&mut self, id: &NodeId) -> usize {
        self.walker.resolve(id)
    }

    /// Edges cut so far because they closed a cycle.
    #[must_use]
    pub fn cycle_breaks(&self) -> &BTreeSet<CycleBreak> {
        self.walker.breaks()
    }

    /// Depth of every node reached so far, queried or ancestor, in the
    /// order the nodes were first resolved.
    ///
    /// Cycle members are not memoized, so each is resolved again on its
    /// own to keep the result independent of query order.
    pub fn resolved_depths(&mut self) -> Vec<(NodeId, usize)> {
        let mut depths = Vec::new();
        let mut next = 0;
        while let Some(node) = self.walker.visited().get(next).cloned() {
            let depth = self.walker.resolve(&node);
            depths.push((node, depth));
            next += 1;
        }
        depths
    }

    /// Nodes per level over every node reached so far.
    pub fn level_distribution(&mut self) -> LevelDistribution {
        self.resolved_depths()
            .into_iter()
            .map(|(_, depth)| depth)
            .collect()
    }

    /// Number of nodes whose depth is memoized.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.walker.memo_len()
    }
}
