//! Error types for network mutation.

use crate::node::{NodeId, NodeIndex};

/// Errors raised while extending a [`Network`](crate::network::Network).
///
/// None of these are user errors: each one means a caller bypassed or misused
/// the mutation API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// More than one child of `parent` carries the same discriminator.
    #[error("sharing invariant violated: {count} children of {parent} match {discriminator}")]
    InvariantViolation {
        /// The parent whose children are duplicated.
        parent: NodeId,
        /// Rendered discriminator.
        discriminator: String,
        /// Number of matching children found.
        count: usize,
    },

    /// The index does not belong to this network.
    #[error("unknown node: {0}")]
    UnknownNode(NodeIndex),

    /// A node factory produced a node that does not carry the requested
    /// discriminator.
    #[error("factory for {expected} under {parent} produced '{found}'")]
    DiscriminatorMismatch {
        /// The parent the node was meant for.
        parent: NodeId,
        /// Rendered requested discriminator.
        expected: String,
        /// Signature of the node actually produced.
        found: String,
    },

    /// A merge was requested on inputs that cannot be joined.
    #[error("cannot merge {left} and {right}: {reason}")]
    InvalidMergeInputs {
        /// Left input.
        left: NodeIndex,
        /// Right input.
        right: NodeIndex,
        /// Why the inputs were rejected.
        reason: &'static str,
    },

    /// The allocator handed out an identifier that is already in use.
    #[error("node id {0} is already in use")]
    DuplicateNodeId(NodeId),
}
