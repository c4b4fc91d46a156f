//! Pattern compilation for wc_rete (Layer 2).
//!
//! Compiles declarative graph patterns (typed variables plus directed
//! relations between them) into one shared discrimination network, reusing
//! every common sub-test between patterns.
//!
//! # Overview
//!
//! - [`query`]: the [`Pattern`] interface and the [`QueryDescription`] it
//!   produces.
//! - [`Matcher`]: owns the network and the [`PatternRegistry`]; compiles
//!   patterns into one terminal node each.
//! - [`config`]: identifier strategy and validation switches.
//! - [`token`]: the shape of a match, for runtimes built on the network.
//!
//! # Example
//!
//! ```
//! use rete_compiler::prelude::*;
//!
//! let query = QueryDescription::new()
//!     .with_type("x", "Site")
//!     .with_type("y", "Site")
//!     .with_relation(Relation::new("x", "bond", "bond", "y"));
//!
//! let mut matcher = Matcher::new();
//! matcher.add_pattern(StaticPattern::new("bound-pair", query))?;
//!
//! assert!(matcher.contains_pattern("bound-pair"));
//! # Ok::<(), CompileError>(())
//! ```

mod compile;
pub mod config;
pub mod error;
mod matcher;
pub mod query;
mod registry;
pub mod token;

pub use config::{IdStrategy, MatcherConfig};
pub use error::CompileError;
pub use matcher::Matcher;
pub use query::{Pattern, QueryDescription, QueryError, Relation, StaticPattern};
pub use registry::{PatternRegistry, RegisteredPattern};
pub use token::Token;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::config::{IdStrategy, MatcherConfig};
    pub use crate::error::CompileError;
    pub use crate::matcher::Matcher;
    pub use crate::query::{Pattern, QueryDescription, QueryError, Relation, StaticPattern};
    pub use crate::registry::{PatternRegistry, RegisteredPattern};
    pub use crate::token::Token;
    pub use rete_network::prelude::*;
}
