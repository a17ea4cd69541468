//! Taxopath - hierarchy levels and upward paths for taxonomy tables.
//!
//! This crate provides both a CLI application and a library that loads a
//! taxonomy's parent/child relations (ESCO skills, O*NET tasks and work
//! activities, ...), resolves the depth of every node and every distinct
//! path from a node up to a root, and materializes those results as extra
//! table columns or rows.
//!
//! ```
//! use taxopath::domain::{NodeId, Relation};
//! use taxopath::hierarchy::{DepthResolver, Hierarchy, PathEnumerator};
//!
//! let hierarchy = Hierarchy::from_relations([
//!     Relation::new("A", "B"),
//!     Relation::new("A", "C"),
//!     Relation::new("B", "D"),
//!     Relation::new("C", "D"),
//! ]);
//!
//! let d = NodeId::from("D");
//! assert_eq!(DepthResolver::new(&hierarchy).depth(&d), 3);
//!
//! let paths = PathEnumerator::new(&hierarchy).paths(&d);
//! let rendered: Vec<String> = paths.iter().map(|p| p.join(";")).collect();
//! assert_eq!(rendered, ["A;B;D", "A;C;D"]);
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod hierarchy;
pub mod materialize;
pub mod stats;

// Application context and output formatting used by the CLI
pub mod app;
pub mod output;

// Public CLI module (needed by binary)
pub mod cli;

pub use error::{Error, Result};
