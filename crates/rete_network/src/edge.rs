//! Edge types for discrimination networks.
//!
//! Edges point in flow direction, from parent to child. Single-input nodes
//! have exactly one incoming edge; merge nodes have a left and a right one.

use serde::Serialize;

use crate::node::NodeIndex;

/// Which input of the child an edge feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    /// The only input of a single-input node.
    Single,
    /// Left input of a merge node.
    Left,
    /// Right input of a merge node.
    Right,
}

/// A parent -> child connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Parent node.
    pub from: NodeIndex,
    /// Child node.
    pub to: NodeIndex,
    /// Input of `to` fed by this edge.
    pub port: Port,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(from: NodeIndex, to: NodeIndex, port: Port) -> Self {
        Self { from, to, port }
    }
}
