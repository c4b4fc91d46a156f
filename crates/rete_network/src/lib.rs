//! Discrimination network primitives for wc_rete (Layer 1).
//!
//! `rete_network` provides the data structure that pattern compilation
//! extends: a Rete-style DAG of test, store, alias and merge nodes in which
//! common sub-tests are physically shared between patterns.
//!
//! # Core Concepts
//!
//! - [`Network`] - Arena of nodes with parent -> child adjacency
//! - [`ReteNode`] - Closed set of node variants, tagged by [`Archetype`]
//! - [`Discriminator`] - The payload compared when sharing children
//! - [`IdAllocator`] - Injected source of fresh node identifiers
//!
//! # Example
//!
//! ```
//! use rete_network::prelude::*;
//!
//! let mut network = Network::new();
//! let class = ClassRef::new("Molecule");
//!
//! let check = network
//!     .get_or_create_child(network.root(), Discriminator::Type(&class), |id| {
//!         ReteNode::CheckType(CheckTypeNode { id, class: class.clone() })
//!     })
//!     .unwrap();
//!
//! assert_eq!(network.node(check).unwrap().signature(), "is-instance-of(Molecule)");
//! ```
//!
//! # Architecture
//!
//! - **Layer 1** (`rete_network`): network structure and sharing (this crate)
//! - **Layer 2** (`rete_compiler`): pattern compilation and registry

/// Payload discriminators used by the sharing gateway.
pub mod discriminator;

/// Edge types.
pub mod edge;

/// Error types for network mutation.
pub mod error;

/// Diagnostic export (GML, JSON).
pub mod export;

/// Node identifier allocation.
pub mod id;

/// Network structure, sharing gateway and validation.
pub mod network;

/// Node types.
pub mod node;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::discriminator::Discriminator;
    pub use crate::edge::{Edge, Port};
    pub use crate::error::NetworkError;
    pub use crate::export::{ExportEdge, ExportNode, Gml, NetworkExport};
    pub use crate::id::{IdAllocator, NanoIds, SequentialIds};
    pub use crate::network::{Network, ValidationError};
    pub use crate::node::{
        AliasNode, Archetype, AttrCheck, AttrValue, CheckAttrNode, CheckEdgeTypeNode,
        CheckTypeNode, ClassRef, EdgePair, MergeNode, NodeId, NodeIndex, Operator, ROOT_ID,
        ReteNode, RootNode, StoreNode, VarTuple,
    };
}

// Re-export key types at crate root for convenience
pub use discriminator::Discriminator;
pub use error::NetworkError;
pub use id::IdAllocator;
pub use network::{Network, ValidationError};
pub use node::{Archetype, NodeId, NodeIndex, ReteNode};
