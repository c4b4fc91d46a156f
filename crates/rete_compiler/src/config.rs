//! Compiler configuration.
//!
//! [`MatcherConfig`] can be built in code or deserialized from JSON:
//!
//! ```
//! use rete_compiler::config::{IdStrategy, MatcherConfig};
//!
//! let config = MatcherConfig::from_json(r#"{ "id_strategy": "nanoid" }"#).unwrap();
//! assert_eq!(config.id_strategy, IdStrategy::Nanoid);
//! assert!(!config.validate_on_add);
//! ```

use rete_network::IdAllocator;
use rete_network::id::{NanoIds, SequentialIds};
use serde::{Deserialize, Serialize};

/// How node identifiers are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `node_0`, `node_1`, ... (deterministic).
    #[default]
    Sequential,
    /// Random nanoid identifiers.
    Nanoid,
}

/// Configuration of a [`Matcher`](crate::Matcher).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Identifier generation strategy.
    pub id_strategy: IdStrategy,
    /// Run full structural validation after every compiled pattern.
    pub validate_on_add: bool,
}

impl MatcherConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier generation strategy.
    #[must_use]
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Enables or disables validation after every compiled pattern.
    #[must_use]
    pub fn with_validate_on_add(mut self, enabled: bool) -> Self {
        self.validate_on_add = enabled;
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Builds the allocator selected by [`id_strategy`](Self::id_strategy).
    #[must_use]
    pub fn allocator(&self) -> Box<dyn IdAllocator> {
        match self.id_strategy {
            IdStrategy::Sequential => Box::new(SequentialIds::new()),
            IdStrategy::Nanoid => Box::new(NanoIds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_without_validation() {
        let config = MatcherConfig::default();
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert!(!config.validate_on_add);
        assert_eq!(config.allocator().generate_id().as_str(), "node_0");
    }

    #[test]
    fn builder_sets_fields() {
        let config = MatcherConfig::new()
            .with_id_strategy(IdStrategy::Nanoid)
            .with_validate_on_add(true);
        assert_eq!(config.id_strategy, IdStrategy::Nanoid);
        assert!(config.validate_on_add);
    }

    #[test]
    fn json_round_trips_field_names() {
        let config = MatcherConfig::from_json(r#"{"validate_on_add": true}"#).unwrap();
        assert!(config.validate_on_add);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"id_strategy":"sequential","validate_on_add":true}"#);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(MatcherConfig::from_json(r#"{"id_strategy": "uuid"}"#).is_err());
    }
}
