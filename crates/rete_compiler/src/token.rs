//! Match tokens.
//!
//! A [`Token`] is the shape of one match: pattern variables bound to
//! working-memory instance identifiers, tagged with provenance. The compiler
//! never produces tokens; they are what a runtime propagating data through a
//! compiled network would emit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One match of a pattern against working memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Provenance tag.
    pub tag: String,
    /// Species label.
    pub species: String,
    /// Qualified pattern variable -> instance identifier.
    pub bindings: BTreeMap<String, String>,
}

impl Token {
    /// Creates a token with no bindings.
    #[must_use]
    pub fn new(tag: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            species: species.into(),
            bindings: BTreeMap::new(),
        }
    }

    /// Binds `var` to `instance`, replacing any previous binding.
    #[must_use]
    pub fn bind(mut self, var: impl Into<String>, instance: impl Into<String>) -> Self {
        self.bindings.insert(var.into(), instance.into());
        self
    }

    /// Returns the instance bound to `var`.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<&str> {
        self.bindings.get(var).map(String::as_str)
    }
}
