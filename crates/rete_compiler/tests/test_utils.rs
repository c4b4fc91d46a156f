//! Shared test utilities for `rete_compiler` integration tests.
//!
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::collections::{BTreeMap, HashMap};

use rete_compiler::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════════
// PATTERN BUILDERS
// ═══════════════════════════════════════════════════════════════════════════════

/// `x: ClassA, ph == true`, the pattern used throughout the scenarios.
pub fn phospho_site(id: &str) -> StaticPattern {
    StaticPattern::new(
        id,
        QueryDescription::new()
            .with_type("x", "ClassA")
            .with_attr("x", AttrCheck::new("ph", Operator::Eq, true)),
    )
}

/// Two independently typed variables joined by one relation.
pub fn bonded_pair(id: &str, attr1: &str, attr2: &str) -> StaticPattern {
    StaticPattern::new(
        id,
        QueryDescription::new()
            .with_type("x", "ClassA")
            .with_type("y", "ClassB")
            .with_relation(Relation::new("x", attr1, attr2, "y")),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK INSPECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Finds the unique non-merge node with the given signature.
///
/// Merges are skipped since they share signatures with the aliases they join.
pub fn find_by_signature(network: &Network, signature: &str) -> NodeIndex {
    let matches: Vec<NodeIndex> = network
        .nodes()
        .filter(|(_, node)| !matches!(node, ReteNode::Merge(_)))
        .filter(|(_, node)| node.signature() == signature)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(matches.len(), 1, "expected exactly one '{signature}' node");
    matches[0]
}

/// Identifiers of the single-parent chain from the root down to `node`,
/// root excluded.
pub fn chain_ids(network: &Network, node: NodeIndex) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut current = node;
    while current != network.root() {
        chain.push(network.node(current).unwrap().id().clone());
        let parents = network.predecessors(current);
        assert_eq!(parents.len(), 1, "chain crosses a merge");
        current = parents[0];
    }
    chain.reverse();
    chain
}

/// Signatures of the parents of `node`, in port order.
pub fn parent_signatures(network: &Network, node: NodeIndex) -> Vec<String> {
    network
        .predecessors(node)
        .iter()
        .map(|p| network.node(*p).unwrap().signature())
        .collect()
}

/// Port of the unique edge `from -> to`.
pub fn port_into(network: &Network, from: NodeIndex, to: NodeIndex) -> Port {
    let ports: Vec<Port> = network
        .edges()
        .iter()
        .filter(|edge| edge.from == from && edge.to == to)
        .map(|edge| edge.port)
        .collect();
    assert_eq!(ports.len(), 1, "expected exactly one edge {from} -> {to}");
    ports[0]
}

/// Counts nodes by variant name.
pub fn variant_counts(network: &Network) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for (_, node) in network.nodes() {
        let name = match node {
            ReteNode::Root(_) => "root",
            ReteNode::CheckType(_) => "check_type",
            ReteNode::CheckAttr(_) => "check_attr",
            ReteNode::CheckEdgeType(_) => "check_edge_type",
            ReteNode::Store(_) => "store",
            ReteNode::Alias(_) => "alias",
            ReteNode::Merge(_) => "merge",
        };
        *counts.entry(name).or_default() += 1;
    }
    counts
}

/// Identifier-free description of a network: the multiset of node shapes
/// and of edges between them.
///
/// A node's shape is its signature followed by its parents' shapes in port
/// order, so two networks have the same description exactly when they are
/// equal up to identifier renaming.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub nodes: BTreeMap<String, usize>,
    pub edges: BTreeMap<(String, String, String), usize>,
}

pub fn shape(network: &Network) -> Shape {
    let mut memo: HashMap<NodeIndex, String> = HashMap::new();
    for (index, _) in network.nodes() {
        node_shape(network, index, &mut memo);
    }

    let mut nodes = BTreeMap::new();
    for form in memo.values() {
        *nodes.entry(form.clone()).or_default() += 1;
    }
    let mut edges = BTreeMap::new();
    for edge in network.edges() {
        let key = (
            memo[&edge.from].clone(),
            memo[&edge.to].clone(),
            format!("{:?}", edge.port),
        );
        *edges.entry(key).or_default() += 1;
    }
    Shape { nodes, edges }
}

fn node_shape(
    network: &Network,
    index: NodeIndex,
    memo: &mut HashMap<NodeIndex, String>,
) -> String {
    if let Some(form) = memo.get(&index) {
        return form.clone();
    }
    let parents: Vec<String> = network
        .predecessors(index)
        .iter()
        .map(|p| node_shape(network, *p, memo))
        .collect();
    let form = format!(
        "{}[{}]",
        network.node(index).unwrap().signature(),
        parents.join("|")
    );
    memo.insert(index, form.clone());
    form
}

/// Compiles `patterns` in order into a fresh matcher.
pub fn compile_all(patterns: &[StaticPattern]) -> Matcher {
    let mut matcher = Matcher::new();
    for pattern in patterns {
        matcher.add_pattern(pattern.clone()).expect("compile");
    }
    matcher
}
