//! Node identifier allocation.
//!
//! Every non-root node receives a fresh identifier from an [`IdAllocator`]
//! held by its network. [`SequentialIds`] is deterministic and is the default;
//! [`NanoIds`] produces random, globally unique identifiers.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::node::NodeId;

/// Source of fresh node identifiers.
///
/// Implementations must never return the same identifier twice, and must
/// never return [`ROOT_ID`](crate::node::ROOT_ID).
pub trait IdAllocator: fmt::Debug + Send + Sync {
    /// Returns a fresh identifier.
    fn generate_id(&self) -> NodeId;
}

/// Monotonic counter allocator producing `node_0`, `node_1`, ...
///
/// Clones share the same counter.
///
/// # Example
///
/// ```
/// use rete_network::id::{IdAllocator, SequentialIds};
///
/// let ids = SequentialIds::new();
/// assert_eq!(ids.generate_id().as_str(), "node_0");
///
/// let shared = ids.clone();
/// assert_eq!(shared.generate_id().as_str(), "node_1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: Arc<AtomicUsize>,
}

impl SequentialIds {
    /// Creates a new allocator starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current counter value (for debugging).
    #[must_use]
    pub fn current(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

impl IdAllocator for SequentialIds {
    fn generate_id(&self) -> NodeId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        NodeId::from_string(format!("node_{n}"))
    }
}

/// Random allocator backed by nanoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIds;

impl IdAllocator for NanoIds {
    fn generate_id(&self) -> NodeId {
        NodeId::from_string(nanoid::nanoid!())
    }
}
