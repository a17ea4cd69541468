//! Cycle detection over the parent adjacency.
//!
//! The traversal engine tolerates cycles by cutting edges as it meets
//! them. This module answers the static question instead: which groups of
//! nodes are mutually reachable. It also supplies the component index the
//! walker uses to decide when a memoized value may be reused.

use crate::domain::NodeId;
use crate::hierarchy::graph::Hierarchy;
use crate::hierarchy::walk::CycleBreak;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

/// A set of nodes that reach each other through parent edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Members in first-seen order
    pub nodes: Vec<NodeId>,
}

impl Cycle {
    /// Returns `true` for a node that is its own parent.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.nodes.len() == 1
    }
}

/// Static cycles plus the edges the traversal actually cut.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    /// Strongly connected groups, ordered by their first-seen member
    pub cycles: Vec<Cycle>,
    /// Edges cut while resolving depths and paths
    pub breaks: Vec<CycleBreak>,
}

impl CycleReport {
    /// Returns `true` if the hierarchy is acyclic.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

fn build_graph(hierarchy: &Hierarchy) -> DiGraph<NodeId, ()> {
    let mut graph = DiGraph::with_capacity(hierarchy.nodes().len(), hierarchy.edge_count());
    let mut node_map: HashMap<&NodeId, NodeIndex> = HashMap::new();

    for id in hierarchy.nodes() {
        node_map.insert(id, graph.add_node(id.clone()));
    }

    for (parent, child) in hierarchy.edges() {
        if let (Some(&from), Some(&to)) = (node_map.get(child), node_map.get(parent)) {
            graph.add_edge(from, to, ());
        }
    }

    graph
}

/// Find every cycle in the hierarchy, self-loops included.
#[must_use]
pub fn find_cycles(hierarchy: &Hierarchy) -> Vec<Cycle> {
    let graph = build_graph(hierarchy);

    let mut components: Vec<Vec<NodeIndex>> = algo::tarjan_scc(&graph)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => graph.contains_edge(*single, *single),
            _ => true,
        })
        .collect();

    // Node indices follow first-seen order, so sorting by index restores it.
    for component in &mut components {
        component.sort_unstable();
    }
    components.sort_unstable_by_key(|component| component.first().copied());

    let cycles: Vec<Cycle> = components
        .into_iter()
        .map(|component| Cycle {
            nodes: component.into_iter().map(|ix| graph[ix].clone()).collect(),
        })
        .collect();

    tracing::debug!(count = cycles.len(), "Detected cycles");
    cycles
}

/// Map each node of a multi-node cycle to the index of its cycle.
///
/// Nodes outside any multi-node cycle are absent. Self-loops are left out
/// because the walker always cuts them at the node itself.
pub(crate) fn component_index(hierarchy: &Hierarchy) -> HashMap<NodeId, usize> {
    find_cycles(hierarchy)
        .into_iter()
        .filter(|cycle| !cycle.is_self_loop())
        .enumerate()
        .flat_map(|(ix, cycle)| cycle.nodes.into_iter().map(move |id| (id, ix)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Relation;

    fn ids(cycle: &Cycle) -> Vec<&str> {
        cycle.nodes.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn acyclic_hierarchy_has_no_cycles() {
        let h = Hierarchy::from_relations([
            Relation::new("A", "B"),
            Relation::new("A", "C"),
            Relation::new("B", "D"),
            Relation::new("C", "D"),
        ]);

        assert!(find_cycles(&h).is_empty());
        assert!(component_index(&h).is_empty());
    }

    #[test]
    fn two_node_cycle_is_found() {
        let h = Hierarchy::from_relations([
            Relation::new("R", "X"),
            Relation::new("X", "Y"),
            Relation::new("Y", "X"),
        ]);

        let cycles = find_cycles(&h);
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["X", "Y"]);
        assert!(!cycles[0].is_self_loop());

        let index = component_index(&h);
        assert_eq!(index.get(&NodeId::from("X")), Some(&0));
        assert_eq!(index.get(&NodeId::from("Y")), Some(&0));
        assert_eq!(index.get(&NodeId::from("R")), None);
    }

    #[test]
    fn self_loop_is_a_cycle_but_not_a_component() {
        let h = Hierarchy::from_relations([Relation::new("A", "A")]);

        let cycles = find_cycles(&h);
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].is_self_loop());
        assert!(component_index(&h).is_empty());
    }

    #[test]
    fn separate_cycles_are_ordered_by_first_seen_member() {
        let h = Hierarchy::from_relations([
            Relation::new("P", "Q"),
            Relation::new("Q", "P"),
            Relation::new("A", "B"),
            Relation::new("B", "C"),
            Relation::new("C", "A"),
        ]);

        let cycles = find_cycles(&h);
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["P", "Q"]);
        assert_eq!(ids(&cycles[1]), vec!["A", "B", "C"]);
    }
}
