//! Domain types for taxonomy hierarchies.
//!
//! This module contains the core value types shared by the hierarchy
//! engine and the row materializer: node identifiers, object-type tags,
//! relations and upward paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a taxonomy node (skill, skill group, task, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Object-type tag carried on each side of a relation.
///
/// Group tags (skill groups, work activities) mark intermediate taxonomy
/// nodes; the rest are leaf-taxonomy entries. Unknown tags are kept
/// verbatim so no information from the source table is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    /// An ESCO skill or knowledge concept
    Skill,
    /// An ESCO skill group
    SkillGroup,
    /// An O*NET task statement
    Task,
    /// An O*NET work activity (GWA, IWA or DWA)
    WorkActivity,
    /// Any other tag, as written in the source
    Other(String),
}

impl ObjectType {
    /// Parse a tag, case-insensitively, ignoring spaces, `-` and `_`.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "skill" | "knowledge" => Self::Skill,
            "skillgroup" => Self::SkillGroup,
            "task" => Self::Task,
            "workactivity" | "gwa" | "iwa" | "dwa" => Self::WorkActivity,
            _ => Self::Other(tag.trim().to_string()),
        }
    }

    /// Returns `true` for grouping nodes rather than leaf-taxonomy entries.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::SkillGroup | Self::WorkActivity)
    }

    /// Canonical lowercase tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Skill => "skill",
            Self::SkillGroup => "skillgroup",
            Self::Task => "task",
            Self::WorkActivity => "workactivity",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed parent -> child edge of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The parent (broader) node
    pub parent: NodeId,
    /// The child (narrower) node
    pub child: NodeId,
    /// Object type of the parent, when the source table provides one
    pub parent_type: Option<ObjectType>,
    /// Object type of the child, when the source table provides one
    pub child_type: Option<ObjectType>,
}

impl Relation {
    /// Create an untyped relation.
    pub fn new(parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            parent_type: None,
            child_type: None,
        }
    }

    /// Attach object-type tags to both ends.
    #[must_use]
    pub fn with_types(mut self, parent_type: ObjectType, child_type: ObjectType) -> Self {
        self.parent_type = Some(parent_type);
        self.child_type = Some(child_type);
        self
    }
}

/// One complete ancestor chain from a node up to a root.
///
/// Stored leaf first: `nodes()[0]` is the node the path was computed for and
/// the last element is the root (or the node where a cycle truncated the
/// walk). Rendering for output is root first, see [`join`](Self::join).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyPath(Vec<NodeId>);

impl HierarchyPath {
    /// The trivial path containing only `node`.
    #[must_use]
    pub fn single(node: NodeId) -> Self {
        Self(vec![node])
    }

    /// Build a path from leaf-first nodes. Returns `None` for an empty list.
    #[must_use]
    pub fn from_leaf_first(nodes: Vec<NodeId>) -> Option<Self> {
        if nodes.is_empty() {
            None
        } else {
            Some(Self(nodes))
        }
    }

    /// `[node] + self`.
    #[must_use]
    pub fn extend_from(&self, node: &NodeId) -> Self {
        let mut nodes = Vec::with_capacity(self.0.len() + 1);
        nodes.push(node.clone());
        nodes.extend(self.0.iter().cloned());
        Self(nodes)
    }

    /// Nodes from the leaf up to the root.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Nodes from the root down to the leaf.
    pub fn root_first(&self) -> impl Iterator<Item = &NodeId> {
        self.0.iter().rev()
    }

    /// Number of nodes, both endpoints included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a path holds at least its own node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The node the path was computed for.
    #[must_use]
    pub fn leaf(&self) -> &NodeId {
        &self.0[0]
    }

    /// The top-most node of the path.
    #[must_use]
    pub fn root(&self) -> &NodeId {
        &self.0[self.0.len() - 1]
    }

    /// Render root first, IDs joined by `delimiter`.
    #[must_use]
    pub fn join(&self, delimiter: &str) -> String {
        self.root_first()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Parse a root-first string produced by [`join`](Self::join).
    ///
    /// Returns `None` for an empty string or an empty delimiter.
    #[must_use]
    pub fn split(rendered: &str, delimiter: &str) -> Option<Self> {
        if rendered.is_empty() || delimiter.is_empty() {
            return None;
        }
        let mut nodes: Vec<NodeId> = rendered.split(delimiter).map(NodeId::from).collect();
        nodes.reverse();
        Self::from_leaf_first(nodes)
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .root_first()
            .map(NodeId::as_str)
            .collect::<Vec<_>>()
            .join(" > ");
        f.write_str(&rendered)
    }
}
