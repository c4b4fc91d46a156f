//! Network structure and the sharing gateway.
//!
//! The [`Network`] is an arena of [`ReteNode`]s with adjacency lists of
//! [`NodeIndex`]es. It grows monotonically: nodes and edges are added, never
//! removed or mutated.
//!
//! Two invariants hold for every network built through this API:
//!
//! - **Single root**: exactly one [`Root`](ReteNode::Root), at index 0, from
//!   which every node is reachable.
//! - **Sharing**: for any parent and any [`Discriminator`], at most one child
//!   carries that discriminator.
//!
//! All discriminated children are created by
//! [`Network::get_or_create_child`], which is what makes two structurally
//! identical sub-patterns end up on the very same nodes.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::discriminator::Discriminator;
use crate::edge::{Edge, Port};
use crate::error::NetworkError;
use crate::id::{IdAllocator, SequentialIds};
use crate::node::{Archetype, MergeNode, NodeId, NodeIndex, ReteNode, RootNode, VarTuple};

/// A discrimination network.
///
/// # Example
///
/// ```
/// use rete_network::discriminator::Discriminator;
/// use rete_network::network::Network;
/// use rete_network::node::{ReteNode, StoreNode};
///
/// let mut network = Network::new();
/// let root = network.root();
///
/// let store = network
///     .get_or_create_child(root, Discriminator::Store, |id| {
///         ReteNode::Store(StoreNode { id })
///     })
///     .unwrap();
///
/// // The second request reuses the existing child.
/// let again = network
///     .get_or_create_child(root, Discriminator::Store, |id| {
///         ReteNode::Store(StoreNode { id })
///     })
///     .unwrap();
///
/// assert_eq!(store, again);
/// assert_eq!(network.node_count(), 2);
/// ```
#[derive(Debug)]
pub struct Network {
    /// Node arena. Index 0 is the root.
    nodes: Vec<ReteNode>,
    /// Children of each node, in creation order.
    children: Vec<Vec<NodeIndex>>,
    /// Parents of each node, in port order.
    parents: Vec<Vec<NodeIndex>>,
    /// All edges, in creation order.
    edges: Vec<Edge>,
    /// Identifier lookup.
    index: HashMap<NodeId, NodeIndex>,
    /// Source of fresh identifiers for non-root nodes.
    allocator: Box<dyn IdAllocator>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Index of the root node in every network.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Creates a network containing only the root, using [`SequentialIds`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_allocator(Box::new(SequentialIds::new()))
    }

    /// Creates a network containing only the root, drawing identifiers from
    /// `allocator`.
    #[must_use]
    pub fn with_allocator(allocator: Box<dyn IdAllocator>) -> Self {
        let root = ReteNode::Root(RootNode::default());
        let mut index = HashMap::new();
        index.insert(root.id().clone(), Self::ROOT);
        Self {
            nodes: vec![root],
            children: vec![Vec::new()],
            parents: vec![Vec::new()],
            edges: Vec::new(),
            index,
            allocator,
        }
    }

    /// Returns the root's index.
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        Self::ROOT
    }

    /// Gets a node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&ReteNode> {
        self.nodes.get(index.0)
    }

    /// Gets a node by identifier.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&ReteNode> {
        self.index_of(id).and_then(|index| self.node(index))
    }

    /// Resolves an identifier to its arena index.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Iterates over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ReteNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Returns all edges in creation order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Counts nodes of the given archetype.
    #[must_use]
    pub fn count_archetype(&self, archetype: Archetype) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.archetype() == archetype)
            .count()
    }

    /// Returns the children of `node`, in creation order.
    ///
    /// Unknown indices have no children.
    #[must_use]
    pub fn successors(&self, node: NodeIndex) -> &[NodeIndex] {
        self.children.get(node.0).map_or(&[], Vec::as_slice)
    }

    /// Returns the parents of `node`. Merge nodes list their left input first.
    #[must_use]
    pub fn predecessors(&self, node: NodeIndex) -> &[NodeIndex] {
        self.parents.get(node.0).map_or(&[], Vec::as_slice)
    }

    /// Returns the children of `node` that carry `discriminator`.
    #[must_use]
    pub fn filter_successors(
        &self,
        node: NodeIndex,
        discriminator: Discriminator<'_>,
    ) -> Vec<NodeIndex> {
        self.successors(node)
            .iter()
            .copied()
            .filter(|child| discriminator.matches(&self.nodes[child.0]))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation API
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the child of `parent` carrying `discriminator`, creating it
    /// with `factory` if there is none.
    ///
    /// `factory` receives the freshly allocated identifier and must build a
    /// node carrying `discriminator`. It is only called when no matching
    /// child exists; reuse performs no mutation at all.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownNode`] if `parent` is not in this network.
    /// - [`NetworkError::InvariantViolation`] if more than one child already
    ///   matches. This can only happen if the gateway was bypassed.
    /// - [`NetworkError::DiscriminatorMismatch`] if `factory` built a node with
    ///   a different payload.
    pub fn get_or_create_child<F>(
        &mut self,
        parent: NodeIndex,
        discriminator: Discriminator<'_>,
        factory: F,
    ) -> Result<NodeIndex, NetworkError>
    where
        F: FnOnce(NodeId) -> ReteNode,
    {
        let parent_id = self
            .node(parent)
            .ok_or(NetworkError::UnknownNode(parent))?
            .id()
            .clone();

        match self.filter_successors(parent, discriminator).as_slice() {
            [] => {
                let node = factory(self.allocator.generate_id());
                if !discriminator.matches(&node) {
                    return Err(NetworkError::DiscriminatorMismatch {
                        parent: parent_id,
                        expected: discriminator.to_string(),
                        found: node.signature(),
                    });
                }
                let child = self.insert_node(node)?;
                self.connect(parent, child, Port::Single);
                tracing::trace!(
                    parent = %parent_id,
                    node = %self.nodes[child.0].id(),
                    signature = %self.nodes[child.0].signature(),
                    "created node"
                );
                Ok(child)
            }
            [child] => {
                tracing::trace!(
                    parent = %parent_id,
                    node = %self.nodes[child.0].id(),
                    "reused node"
                );
                Ok(*child)
            }
            duplicates => {
                tracing::error!(
                    parent = %parent_id,
                    discriminator = %discriminator,
                    count = duplicates.len(),
                    "duplicate children on the network"
                );
                Err(NetworkError::InvariantViolation {
                    parent: parent_id,
                    discriminator: discriminator.to_string(),
                    count: duplicates.len(),
                })
            }
        }
    }

    /// Joins `left` and `right` under a fresh [`MergeNode`].
    ///
    /// The merge binds the sorted union of both inputs' variable names. Merge
    /// nodes carry no discriminator, so this always creates a new node.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::UnknownNode`] if either input is not in this network.
    /// - [`NetworkError::InvalidMergeInputs`] if an input binds no variables or
    ///   both inputs are the same node.
    pub fn add_merge(
        &mut self,
        left: NodeIndex,
        right: NodeIndex,
    ) -> Result<NodeIndex, NetworkError> {
        let invalid = |reason| NetworkError::InvalidMergeInputs {
            left,
            right,
            reason,
        };

        if left == right {
            return Err(invalid("inputs are the same node"));
        }
        let left_vars = self
            .bound_variables(left)?
            .ok_or(invalid("left input binds no variables"))?;
        let right_vars = self
            .bound_variables(right)?
            .ok_or(invalid("right input binds no variables"))?;
        let vars = VarTuple::union(left_vars, right_vars);

        let id = self.allocator.generate_id();
        let merge = self.insert_node(ReteNode::Merge(MergeNode { id, vars }))?;
        self.connect(left, merge, Port::Left);
        self.connect(right, merge, Port::Right);

        tracing::trace!(
            node = %self.nodes[merge.0].id(),
            vars = %self.nodes[merge.0].signature(),
            "created merge"
        );
        Ok(merge)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn bound_variables(&self, node: NodeIndex) -> Result<Option<&VarTuple>, NetworkError> {
        self.node(node)
            .map(ReteNode::variable_names)
            .ok_or(NetworkError::UnknownNode(node))
    }

    fn insert_node(&mut self, node: ReteNode) -> Result<NodeIndex, NetworkError> {
        if self.index.contains_key(node.id()) {
            return Err(NetworkError::DuplicateNodeId(node.id().clone()));
        }
        let index = NodeIndex(self.nodes.len());
        self.index.insert(node.id().clone(), index);
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        Ok(index)
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex, port: Port) {
        self.children[from.0].push(to);
        self.parents[to.0].push(from);
        self.edges.push(Edge::new(from, to, port));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation API
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates the network structure.
    ///
    /// Checks performed:
    /// - index 0 holds the only root
    /// - every edge references existing nodes and points forward in the arena
    ///   (which rules out cycles)
    /// - every node is reachable from the root
    /// - merge nodes have exactly two parents, other non-root nodes one
    /// - no parent has two children with the same discriminator
    ///
    /// # Errors
    ///
    /// Returns every violation found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !matches!(self.nodes.first(), Some(ReteNode::Root(_))) {
            errors.push(ValidationError::MissingRoot);
        }
        for node in self.nodes.iter().skip(1) {
            if let ReteNode::Root(_) = node {
                errors.push(ValidationError::ExtraRoot(node.id().clone()));
            }
        }

        for edge in &self.edges {
            if edge.from.0 >= self.nodes.len() || edge.to.0 >= self.nodes.len() {
                errors.push(ValidationError::DanglingEdge {
                    from: edge.from,
                    to: edge.to,
                });
            } else if edge.to <= edge.from {
                errors.push(ValidationError::BackwardEdge {
                    from: self.nodes[edge.from.0].id().clone(),
                    to: self.nodes[edge.to.0].id().clone(),
                });
            }
        }

        let reachable = self.reachable_from_root();
        for (i, node) in self.nodes.iter().enumerate() {
            if !reachable[i] {
                errors.push(ValidationError::Unreachable(node.id().clone()));
            }

            let expected = match node {
                ReteNode::Root(_) => 0,
                ReteNode::Merge(_) => 2,
                _ => 1,
            };
            let found = self.parents[i].len();
            if found != expected {
                errors.push(ValidationError::InvalidParentCount {
                    node: node.id().clone(),
                    expected,
                    found,
                });
            }

            self.validate_children(NodeIndex(i), &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_children(&self, parent: NodeIndex, errors: &mut Vec<ValidationError>) {
        let children = self.successors(parent);
        for (pos, child) in children.iter().enumerate() {
            let Some(discriminator) = self.nodes[child.0].discriminator() else {
                continue;
            };
            // Report each duplicate group once, at its first member.
            let earlier = children[..pos]
                .iter()
                .any(|c| discriminator.matches(&self.nodes[c.0]));
            if earlier {
                continue;
            }
            let count = children[pos..]
                .iter()
                .filter(|c| discriminator.matches(&self.nodes[c.0]))
                .count();
            if count > 1 {
                errors.push(ValidationError::DuplicateChildren {
                    parent: self.nodes[parent.0].id().clone(),
                    discriminator: discriminator.to_string(),
                    count,
                });
            }
        }
    }

    fn reachable_from_root(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        if self.nodes.is_empty() {
            return seen;
        }
        let mut queue = VecDeque::from([Self::ROOT]);
        seen[Self::ROOT.0] = true;
        while let Some(next) = queue.pop_front() {
            for child in self.successors(next) {
                if !seen[child.0] {
                    seen[child.0] = true;
                    queue.push_back(*child);
                }
            }
        }
        seen
    }
}

/// Structural problems reported by [`Network::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Index 0 does not hold the root.
    MissingRoot,
    /// A second root exists.
    ExtraRoot(NodeId),
    /// An edge references a node outside the arena.
    DanglingEdge {
        /// Edge source.
        from: NodeIndex,
        /// Edge target.
        to: NodeIndex,
    },
    /// An edge points to an older node.
    BackwardEdge {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
    },
    /// A node cannot be reached from the root.
    Unreachable(NodeId),
    /// A node has the wrong number of parents for its archetype.
    InvalidParentCount {
        /// The offending node.
        node: NodeId,
        /// Parents required by the archetype.
        expected: usize,
        /// Parents found.
        found: usize,
    },
    /// Several children of one parent share a discriminator.
    DuplicateChildren {
        /// The parent.
        parent: NodeId,
        /// Rendered discriminator.
        discriminator: String,
        /// Number of matching children.
        count: usize,
    },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::MissingRoot => write!(f, "network has no root at index 0"),
            ValidationError::ExtraRoot(id) => write!(f, "node {id} is a second root"),
            ValidationError::DanglingEdge { from, to } => {
                write!(f, "edge {from} -> {to} references a missing node")
            }
            ValidationError::BackwardEdge { from, to } => {
                write!(f, "edge {from} -> {to} points to an older node")
            }
            ValidationError::Unreachable(id) => {
                write!(f, "node {id} is not reachable from the root")
            }
            ValidationError::InvalidParentCount {
                node,
                expected,
                found,
            } => {
                write!(f, "node {node} has {found} parents, expected {expected}")
            }
            ValidationError::DuplicateChildren {
                parent,
                discriminator,
                count,
            } => {
                write!(
                    f,
                    "node {parent} has {count} children matching {discriminator}"
                )
            }
        }
    }
}

impl core::error::Error for ValidationError {}
