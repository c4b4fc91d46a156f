//! Read-only export of a network for visualization and debugging.
//!
//! Nodes are labelled `"(<ordinal>) <signature>"`, where the ordinal is the
//! node's creation order. The export can be rendered as GML (directed graph)
//! or JSON.

use core::fmt;

use serde::Serialize;

use crate::edge::Port;
use crate::network::Network;
use crate::node::Archetype;

/// Snapshot of a network's nodes and edges.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkExport {
    /// Nodes in creation order.
    pub nodes: Vec<ExportNode>,
    /// Parent -> child edges in creation order.
    pub edges: Vec<ExportEdge>,
}

/// An exported node.
#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    /// Creation order of the node.
    pub ordinal: usize,
    /// The node's identifier.
    pub id: String,
    /// The node's archetype.
    pub archetype: Archetype,
    /// `"(<ordinal>) <signature>"`.
    pub label: String,
}

/// An exported edge, by ordinal.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEdge {
    /// Parent ordinal.
    pub source: usize,
    /// Child ordinal.
    pub target: usize,
    /// Input of the child fed by this edge.
    pub port: Port,
}

impl Network {
    /// Takes a snapshot of the network for export.
    #[must_use]
    pub fn export(&self) -> NetworkExport {
        let nodes = self
            .nodes()
            .map(|(index, node)| ExportNode {
                ordinal: index.index(),
                id: node.id().to_string(),
                archetype: node.archetype(),
                label: format!("({}) {}", index.index(), node.signature()),
            })
            .collect();
        let edges = self
            .edges()
            .iter()
            .map(|edge| ExportEdge {
                source: edge.from.index(),
                target: edge.to.index(),
                port: edge.port,
            })
            .collect();
        NetworkExport { nodes, edges }
    }
}

impl NetworkExport {
    /// Renders the export as a directed GML graph.
    #[must_use]
    pub fn to_gml(&self) -> String {
        self.gml().to_string()
    }

    /// Returns a [`Display`](fmt::Display) adapter writing the export as GML,
    /// for streaming into any [`fmt::Write`] sink.
    #[must_use]
    pub fn gml(&self) -> Gml<'_> {
        Gml(self)
    }

    /// Renders the export as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Renders the export as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// GML rendering of a [`NetworkExport`], see [`NetworkExport::gml`].
#[derive(Debug, Clone, Copy)]
pub struct Gml<'a>(&'a NetworkExport);

impl fmt::Display for Gml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph [")?;
        writeln!(f, "  directed 1")?;
        for node in &self.0.nodes {
            writeln!(f, "  node [")?;
            writeln!(f, "    id {}", node.ordinal)?;
            writeln!(f, "    label \"{}\"", escape_gml(&node.label))?;
            writeln!(f, "    archetype \"{}\"", node.archetype)?;
            writeln!(f, "  ]")?;
        }
        for edge in &self.0.edges {
            writeln!(f, "  edge [")?;
            writeln!(f, "    source {}", edge.source)?;
            writeln!(f, "    target {}", edge.target)?;
            writeln!(f, "  ]")?;
        }
        writeln!(f, "]")
    }
}

/// GML strings cannot contain `"`; escape as XML character entities.
fn escape_gml(label: &str) -> String {
    label.replace('&', "&amp;").replace('"', "&quot;")
}
