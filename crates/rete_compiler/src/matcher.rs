//! The pattern compiler front end.
//!
//! A [`Matcher`] owns one [`Network`] and one [`PatternRegistry`]. Both grow
//! monotonically for the matcher's lifetime. Compilation is synchronous and
//! requires `&mut self`, so callers sharing a matcher across threads must
//! serialize access (e.g. behind a mutex).

use std::sync::Arc;

use rete_network::export::NetworkExport;
use rete_network::{Archetype, IdAllocator, Network, NodeId, ReteNode};

use crate::compile::{PatternCompiler, check_query};
use crate::config::MatcherConfig;
use crate::error::CompileError;
use crate::query::Pattern;
use crate::registry::{PatternRegistry, RegisteredPattern};

/// Compiles patterns into a shared discrimination network.
///
/// # Example
///
/// ```
/// use rete_compiler::Matcher;
/// use rete_compiler::query::{QueryDescription, StaticPattern};
/// use rete_network::node::{AttrCheck, Operator};
///
/// let query = QueryDescription::new()
///     .with_type("x", "ClassA")
///     .with_attr("x", AttrCheck::new("ph", Operator::Eq, true));
///
/// let mut matcher = Matcher::new();
/// matcher
///     .add_pattern(StaticPattern::new("p1", query.clone()))?
///     .add_pattern(StaticPattern::new("p2", query))?;
///
/// let terminal = matcher.pattern_terminal("p1").unwrap();
/// assert_eq!(matcher.get_node(terminal.as_str()).unwrap().signature(), "p1");
/// # Ok::<(), rete_compiler::CompileError>(())
/// ```
#[derive(Debug)]
pub struct Matcher {
    network: Network,
    registry: PatternRegistry,
    config: MatcherConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    /// Creates a matcher using the allocator selected by `config`.
    #[must_use]
    pub fn with_config(config: MatcherConfig) -> Self {
        let allocator = config.allocator();
        Self::with_allocator(config, allocator)
    }

    /// Creates a matcher drawing node identifiers from `allocator`.
    ///
    /// `config.id_strategy` is ignored.
    #[must_use]
    pub fn with_allocator(config: MatcherConfig, allocator: Box<dyn IdAllocator>) -> Self {
        Self {
            network: Network::with_allocator(allocator),
            registry: PatternRegistry::new(),
            config,
        }
    }

    /// Compiles `pattern` into the network and registers it.
    ///
    /// Returns `self` so calls can be chained.
    ///
    /// # Errors
    ///
    /// - [`CompileError::DuplicatePatternId`] if the identifier is taken.
    /// - [`CompileError::Query`] if the pattern cannot describe its queries.
    /// - [`CompileError::EmptyPattern`] / [`CompileError::UndeclaredVariable`]
    ///   if the description is unusable.
    /// - [`CompileError::ReservedSeparator`] if the identifier or a variable
    ///   name contains `:`.
    ///
    /// None of the above mutate the matcher. The following abort an
    /// in-progress compilation and should be treated as fatal:
    ///
    /// - [`CompileError::NetworkInvariantViolation`]
    /// - [`CompileError::InvalidNetwork`] (only with `validate_on_add`)
    pub fn add_pattern<P>(&mut self, pattern: P) -> Result<&mut Self, CompileError>
    where
        P: Pattern + 'static,
    {
        self.add_shared_pattern(Arc::new(pattern))
    }

    /// Like [`add_pattern`](Self::add_pattern), for an already shared pattern.
    ///
    /// # Errors
    ///
    /// See [`add_pattern`](Self::add_pattern).
    pub fn add_shared_pattern(
        &mut self,
        pattern: Arc<dyn Pattern>,
    ) -> Result<&mut Self, CompileError> {
        let id = pattern.id().to_string();
        let span = tracing::info_span!("add_pattern", pattern = %id);
        let _enter = span.enter();

        if self.registry.contains(&id) {
            tracing::warn!("rejected duplicate pattern id");
            return Err(CompileError::DuplicatePatternId(id));
        }

        let query = pattern
            .generate_queries()
            .map_err(|source| CompileError::Query {
                pattern: id.clone(),
                source,
            })?;
        check_query(&id, &query)?;

        let nodes_before = self.network.node_count();
        let terminal = PatternCompiler::new(&mut self.network, &id)
            .compile(&query)
            .inspect_err(|err| tracing::error!(error = %err, "compilation aborted"))?;

        if self.config.validate_on_add
            && let Err(errors) = self.network.validate()
        {
            tracing::error!(problems = errors.len(), "network failed validation");
            return Err(CompileError::InvalidNetwork {
                pattern: id,
                errors,
            });
        }

        let terminal_id = self
            .network
            .node(terminal)
            .map(|node| node.id().clone())
            .ok_or(rete_network::NetworkError::UnknownNode(terminal))?;

        tracing::debug!(
            terminal = %terminal_id,
            new_nodes = self.network.node_count() - nodes_before,
            total_nodes = self.network.node_count(),
            "compiled pattern"
        );

        self.registry.insert(pattern, terminal_id)?;
        Ok(self)
    }

    /// Gets a node by identifier.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&ReteNode> {
        self.network.get_node(id)
    }

    /// Returns the terminal node identifier of a compiled pattern.
    #[must_use]
    pub fn pattern_terminal(&self, pattern_id: &str) -> Option<&NodeId> {
        self.registry.terminal(pattern_id)
    }

    /// Returns a compiled pattern.
    #[must_use]
    pub fn pattern(&self, pattern_id: &str) -> Option<&RegisteredPattern> {
        self.registry.get(pattern_id)
    }

    /// Checks if a pattern is compiled.
    #[must_use]
    pub fn contains_pattern(&self, pattern_id: &str) -> bool {
        self.registry.contains(pattern_id)
    }

    /// Lists compiled pattern identifiers in compilation order.
    pub fn pattern_ids(&self) -> impl Iterator<Item = &str> {
        self.registry.ids()
    }

    /// Returns the network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Counts nodes of the given archetype.
    #[must_use]
    pub fn count_archetype(&self, archetype: Archetype) -> usize {
        self.network.count_archetype(archetype)
    }

    /// Snapshots the network for diagnostic export.
    #[must_use]
    pub fn export(&self) -> NetworkExport {
        self.network.export()
    }
}
