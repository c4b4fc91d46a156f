//! Error types for pattern compilation.

use rete_network::{NetworkError, ValidationError};

use crate::query::QueryError;

/// Errors returned by [`Matcher::add_pattern`](crate::Matcher::add_pattern).
///
/// Only [`NetworkInvariantViolation`](Self::NetworkInvariantViolation) and
/// [`InvalidNetwork`](Self::InvalidNetwork) can leave a partially extended
/// network behind; every other variant is raised before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A pattern with this identifier is already registered.
    #[error("pattern '{0}' is already registered")]
    DuplicatePatternId(String),

    /// The sharing invariant was violated while extending the network.
    #[error("network invariant violated: {0}")]
    NetworkInvariantViolation(#[from] NetworkError),

    /// Post-compilation validation found structural problems.
    #[error("network failed validation after compiling '{pattern}' ({} problems)", .errors.len())]
    InvalidNetwork {
        /// The pattern just compiled.
        pattern: String,
        /// Every problem found.
        errors: Vec<ValidationError>,
    },

    /// The pattern could not describe its own queries.
    #[error("pattern '{pattern}' produced a malformed query: {source}")]
    Query {
        /// The offending pattern.
        pattern: String,
        /// Error raised by the pattern.
        #[source]
        source: QueryError,
    },

    /// A relation or attribute constraint names a variable without type
    /// constraints.
    #[error("pattern '{pattern}' references undeclared variable '{variable}'")]
    UndeclaredVariable {
        /// The offending pattern.
        pattern: String,
        /// The undeclared variable.
        variable: String,
    },

    /// A pattern identifier or variable name contains the qualifier
    /// separator, so its qualified names could collide with another
    /// pattern's.
    #[error("pattern '{pattern}': name '{name}' contains the reserved separator ':'")]
    ReservedSeparator {
        /// The offending pattern.
        pattern: String,
        /// The pattern identifier or variable name.
        name: String,
    },

    /// The pattern declares no variables.
    #[error("pattern '{0}' declares no variables")]
    EmptyPattern(String),
}
