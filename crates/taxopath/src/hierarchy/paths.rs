//! Every distinct upward path from a node to a root.
//!
//! A root's only path is itself. Any other node's paths are its own ID
//! prepended to each path of each parent, parents taken in insertion
//! order, duplicates dropped while keeping first occurrence.

use crate::domain::{HierarchyPath, NodeId};
use crate::hierarchy::graph::Hierarchy;
use crate::hierarchy::walk::{CycleBreak, UpwardFold, Walker};
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

/// Path list shared between the memo and every caller that asked for it.
pub type PathList = Rc<Vec<HierarchyPath>>;

struct PathFold;

impl UpwardFold for PathFold {
    type Value = PathList;

    fn terminal(&self, node: &NodeId) -> PathList {
        Rc::new(vec![HierarchyPath::single(node.clone())])
    }

    fn combine(&self, node: &NodeId, parents: Vec<PathList>) -> PathList {
        let mut seen: HashSet<HierarchyPath> = HashSet::new();
        let mut paths = Vec::new();

        for parent_paths in &parents {
            for parent_path in parent_paths.iter() {
                let path = parent_path.extend_from(node);
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }

        Rc::new(paths)
    }
}

/// Memoized path enumeration over one hierarchy.
pub struct PathEnumerator<'h> {
    walker: Walker<'h, PathFold>,
}

impl<'h> PathEnumerator<'h> {
    /// Create an enumerator with an empty memo.
    #[must_use]
    pub fn new(hierarchy: &'h Hierarchy) -> Self {
        Self {
            walker: Walker::new(hierarchy, PathFold),
        }
    }

    /// All distinct upward paths of `id`, in discovery order.
    ///
    /// Never empty: unknown IDs and roots yield the single path `[id]`.
    pub fn paths(&mut self, id: &NodeId) -> PathList {
        self.walker.resolve(id)
    }

    /// Edges cut so far because they closed a cycle.
    #[must_use]
    pub fn cycle_breaks(&self) -> &BTreeSet<CycleBreak> {
        self.walker.breaks()
    }
}
