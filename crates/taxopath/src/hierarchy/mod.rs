//! The hierarchy traversal engine.
//!
//! - [`Hierarchy`]: parent adjacency built once from relation records
//! - [`DepthResolver`]: memoized 1-based depth of any node
//! - [`PathEnumerator`]: memoized list of every distinct upward path
//! - [`find_cycles`]: static cycle report over the adjacency
//!
//! Resolvers borrow the hierarchy and own their memo, so independent runs
//! over different graphs never share state.

mod cycles;
mod depth;
mod graph;
mod load;
mod paths;
mod walk;

pub use cycles::{Cycle, CycleReport, find_cycles};
pub use depth::DepthResolver;
pub use graph::Hierarchy;
pub use load::{build_hierarchy, load_hierarchy, read_relations};
pub use paths::{PathEnumerator, PathList};
pub use walk::CycleBreak;
