//! Demo patterns over a small molecule/site/bond model.
//!
//! Molecules own sites through `sites`/`molecule`; bonds join sites through
//! `bond`/`sites`. Types are listed from general to specific, so patterns on
//! the same class share the `Molecule` or `Site` check before diverging.

use std::fs;
use std::path::{Path, PathBuf};

use rete_compiler::prelude::*;

/// Errors raised by the demo binary.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// A pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The matcher configuration file is unreadable.
    #[error("invalid config file {path}: {source}")]
    Config {
        /// File that was read.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the network failed.
    #[error("failed to serialize network: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}

fn site(query: QueryDescription, var: &str) -> QueryDescription {
    query.with_type(var, "Site").with_type(var, "X")
}

fn molecule(query: QueryDescription, var: &str) -> QueryDescription {
    query.with_type(var, "Molecule").with_type(var, "A")
}

fn owns(query: QueryDescription, mol: &str, var: &str) -> QueryDescription {
    query.with_relation(Relation::new(mol, "sites", "molecule", var))
}

/// The four demo patterns.
///
/// - `p1`: molecule `A` with a site `x` where `ph == true` and `v == 0`
/// - `p2`: as `p1` without the `v` check
/// - `p3`: as `p1` without attribute checks
/// - `p4`: two such molecules whose sites are bonded
#[must_use]
pub fn demo_patterns() -> Vec<StaticPattern> {
    let ph = || AttrCheck::new("ph", Operator::Eq, true);

    let p1 = owns(site(molecule(QueryDescription::new(), "A"), "x"), "A", "x")
        .with_attr("x", ph())
        .with_attr("x", AttrCheck::new("v", Operator::Eq, 0));
    let p2 =
        owns(site(molecule(QueryDescription::new(), "A"), "x"), "A", "x").with_attr("x", ph());
    let p3 = owns(site(molecule(QueryDescription::new(), "A"), "x"), "A", "x");

    let mut p4 = QueryDescription::new();
    for (mol, var, v) in [("A1", "x1", 0), ("A2", "x2", 1)] {
        p4 = owns(site(molecule(p4, mol), var), mol, var)
            .with_attr(var, ph())
            .with_attr(var, AttrCheck::new("v", Operator::Eq, v));
    }
    let p4 = p4
        .with_type("bnd", "Bond")
        .with_relation(Relation::new("x1", "bond", "sites", "bnd"))
        .with_relation(Relation::new("bnd", "sites", "bond", "x2"));

    vec![
        StaticPattern::new("p1", p1),
        StaticPattern::new("p2", p2),
        StaticPattern::new("p3", p3),
        StaticPattern::new("p4", p4),
    ]
}

/// Loads a matcher configuration from a JSON file.
///
/// # Errors
///
/// Returns [`DemoError::Io`] or [`DemoError::Config`].
pub fn load_config(path: &Path) -> Result<MatcherConfig, DemoError> {
    let json = fs::read_to_string(path).map_err(|source| DemoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MatcherConfig::from_json(&json).map_err(|source| DemoError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Compiles the demo patterns into a fresh matcher.
///
/// # Errors
///
/// Propagates the first compilation failure.
pub fn build_matcher(config: MatcherConfig) -> Result<Matcher, DemoError> {
    let mut matcher = Matcher::with_config(config);
    for pattern in demo_patterns() {
        matcher.add_pattern(pattern)?;
    }
    Ok(matcher)
}

/// Writes `rete.gml` and `rete.json` into `dir` and returns their paths.
///
/// # Errors
///
/// Returns [`DemoError::Io`] if a file cannot be written.
pub fn write_exports(matcher: &Matcher, dir: &Path) -> Result<[PathBuf; 2], DemoError> {
    let export = matcher.export();
    let gml = dir.join("rete.gml");
    let json = dir.join("rete.json");

    for (path, contents) in [(&gml, export.to_gml()), (&json, export.to_json_pretty()?)] {
        fs::write(path, contents).map_err(|source| DemoError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok([gml, json])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_patterns_share_molecule_and_site_checks() {
        let matcher = build_matcher(MatcherConfig::default()).unwrap();

        // Molecule, A, Site, X, Bond
        assert_eq!(
            matcher
                .network()
                .nodes()
                .filter(|(_, node)| matches!(node, ReteNode::CheckType(_)))
                .count(),
            5
        );
        assert_eq!(matcher.pattern_ids().collect::<Vec<_>>(), ["p1", "p2", "p3", "p4"]);
        assert!(matcher.network().validate().is_ok());
    }

    #[test]
    fn exports_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = build_matcher(MatcherConfig::default()).unwrap();

        let [gml, json] = write_exports(&matcher, dir.path()).unwrap();

        let gml = fs::read_to_string(gml).unwrap();
        assert!(gml.starts_with("graph [\n  directed 1\n"));
        assert!(gml.contains("label \"(0) root\""));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(
            json["nodes"].as_array().unwrap().len(),
            matcher.network().node_count()
        );
    }

    #[test]
    fn config_is_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matcher.json");
        fs::write(&path, r#"{"id_strategy": "nanoid", "validate_on_add": true}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.id_strategy, IdStrategy::Nanoid);
        assert!(config.validate_on_add);

        fs::write(&path, "{").unwrap();
        assert!(matches!(load_config(&path), Err(DemoError::Config { .. })));
    }
}
