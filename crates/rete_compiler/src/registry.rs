//! Pattern registry.

use std::sync::Arc;

use indexmap::IndexMap;
use rete_network::NodeId;

use crate::error::CompileError;
use crate::query::Pattern;

/// A compiled pattern and the node that terminates it.
#[derive(Clone)]
pub struct RegisteredPattern {
    /// The pattern as handed to the compiler.
    pub pattern: Arc<dyn Pattern>,
    /// Identifier of the pattern's terminal alias node.
    pub terminal: NodeId,
}

impl core::fmt::Debug for RegisteredPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisteredPattern")
            .field("pattern", &self.pattern.id())
            .field("terminal", &self.terminal)
            .finish()
    }
}

/// Registry of compiled patterns, in registration order.
///
/// Identifiers are unique: a second registration under the same identifier
/// is rejected.
#[derive(Default)]
pub struct PatternRegistry {
    patterns: IndexMap<String, RegisteredPattern>,
}

impl core::fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("patterns", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

impl PatternRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: IndexMap::new(),
        }
    }

    /// Registers a compiled pattern.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::DuplicatePatternId`] if the identifier is
    /// taken; the registry is left unchanged.
    pub fn insert(&mut self, pattern: Arc<dyn Pattern>, terminal: NodeId) -> Result<(), CompileError> {
        let id = pattern.id().to_string();
        if self.patterns.contains_key(&id) {
            return Err(CompileError::DuplicatePatternId(id));
        }
        self.patterns
            .insert(id, RegisteredPattern { pattern, terminal });
        Ok(())
    }

    /// Checks if a pattern is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.patterns.contains_key(id)
    }

    /// Returns a registered pattern.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegisteredPattern> {
        self.patterns.get(id)
    }

    /// Returns the terminal node of a registered pattern.
    #[must_use]
    pub fn terminal(&self, id: &str) -> Option<&NodeId> {
        self.patterns.get(id).map(|entry| &entry.terminal)
    }

    /// Lists registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// Returns the number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
