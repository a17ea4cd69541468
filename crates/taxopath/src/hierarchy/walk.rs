//! Memoized upward traversal with an explicit work stack.
//!
//! Both the depth resolver and the path enumerator compute a value for a
//! node from the values of its parents. [`Walker`] drives that computation
//! in post-order without native recursion, memoizes finished values per
//! node, and breaks cycles.
//!
//! # Cycle breaks
//!
//! The walker tracks the active path (the nodes currently on the work
//! stack). A parent that is already on the active path is not followed;
//! the edge is recorded as a [`CycleBreak`] instead. A node whose parents
//! are all breaks is terminal for that branch.
//!
//! # Memo safety
//!
//! Each frame carries a `low` mark: the smallest stack index targeted by a
//! break anywhere below it. A finished value is memoized only when `low`
//! is not above the frame's own index, i.e. when the node was the first
//! member of its cycle on the active path. That value is the same for
//! every walk entering the cycle from outside, so it is reused only across
//! cycle boundaries. Inside a cycle, members are always walked again and a
//! truncated branch seen by one query never leaks into another.

use crate::domain::NodeId;
use crate::hierarchy::cycles;
use crate::hierarchy::graph::Hierarchy;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// A parent edge that was not followed because it would close a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CycleBreak {
    /// The node whose parent edge was cut
    pub node: NodeId,
    /// The parent that was already on the active path
    pub parent: NodeId,
}

impl fmt::Display for CycleBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.node, self.parent)
    }
}

/// How a per-node value is built from parent values.
pub(crate) trait UpwardFold {
    /// The per-node value. Cloned out of the memo on every hit.
    type Value: Clone;

    /// Value of a node with no followed parents.
    fn terminal(&self, node: &NodeId) -> Self::Value;

    /// Value of a node from its followed parents' values, in parent order.
    /// `parents` is never empty.
    fn combine(&self, node: &NodeId, parents: Vec<Self::Value>) -> Self::Value;
}

struct Frame<V> {
    node: NodeId,
    /// Position on the work stack.
    index: usize,
    /// Next parent to visit.
    next_parent: usize,
    /// Smallest stack index reached by a cycle break below this frame.
    low: usize,
    values: Vec<V>,
}

impl<V> Frame<V> {
    fn new(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            next_parent: 0,
            low: index,
            values: Vec::new(),
        }
    }
}

/// Run-scoped traversal state over one hierarchy.
pub(crate) struct Walker<'h, F: UpwardFold> {
    hierarchy: &'h Hierarchy,
    fold: F,
    /// Cycle index of every node in a multi-node cycle.
    components: HashMap<NodeId, usize>,
    memo: HashMap<NodeId, F::Value>,
    breaks: BTreeSet<CycleBreak>,
    /// Every node whose value was computed, in first-finished order.
    visited: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl<'h, F: UpwardFold> Walker<'h, F> {
    pub(crate) fn new(hierarchy: &'h Hierarchy, fold: F) -> Self {
        Self {
            hierarchy,
            fold,
            components: cycles::component_index(hierarchy),
            memo: HashMap::new(),
            breaks: BTreeSet::new(),
            visited: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Value for `start`, computing and memoizing whatever is missing.
    pub(crate) fn resolve(&mut self, start: &NodeId) -> F::Value {
        if let Some(value) = self.memo.get(start) {
            return value.clone();
        }

        let hierarchy = self.hierarchy;
        let mut on_path: HashMap<NodeId, usize> = HashMap::new();
        let mut stack: Vec<Frame<F::Value>> = vec![Frame::new(start.clone(), 0)];
        on_path.insert(start.clone(), 0);
        let mut result = None;

        while let Some(frame) = stack.last_mut() {
            let parents = hierarchy.parents_of(&frame.node);

            if let Some(parent) = parents.get(frame.next_parent) {
                frame.next_parent += 1;

                if let Some(&index) = on_path.get(parent) {
                    frame.low = frame.low.min(index);
                    let node = frame.node.clone();
                    self.record_break(node, parent.clone());
                    continue;
                }

                if !self.same_cycle(&frame.node, parent)
                    && let Some(value) = self.memo.get(parent)
                {
                    frame.values.push(value.clone());
                    continue;
                }

                let index = stack.len();
                on_path.insert(parent.clone(), index);
                stack.push(Frame::new(parent.clone(), index));
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            on_path.remove(&done.node);
            if self.seen.insert(done.node.clone()) {
                self.visited.push(done.node.clone());
            }

            let value = if done.values.is_empty() {
                self.fold.terminal(&done.node)
            } else {
                self.fold.combine(&done.node, done.values)
            };

            if done.low >= done.index {
                self.memo.insert(done.node, value.clone());
            }

            match stack.last_mut() {
                Some(caller) => {
                    caller.low = caller.low.min(done.low);
                    caller.values.push(value);
                }
                None => result = Some(value),
            }
        }

        result.unwrap_or_else(|| self.fold.terminal(start))
    }

    fn same_cycle(&self, a: &NodeId, b: &NodeId) -> bool {
        match (self.components.get(a), self.components.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    fn record_break(&mut self, node: NodeId, parent: NodeId) {
        let cycle_break = CycleBreak { node, parent };
        if !self.breaks.contains(&cycle_break) {
            tracing::warn!(
                node = %cycle_break.node,
                parent = %cycle_break.parent,
                "Cycle in hierarchy; parent edge not followed"
            );
            self.breaks.insert(cycle_break);
        }
    }

    /// Every distinct cycle break applied so far, ordered by node then parent.
    pub(crate) fn breaks(&self) -> &BTreeSet<CycleBreak> {
        &self.breaks
    }

    /// Every distinct node walked so far, including cycle members that are
    /// never memoized.
    pub(crate) fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    /// Number of memoized nodes.
    pub(crate) fn memo_len(&self) -> usize {
        self.memo.len()
    }
}
