//! Translation of one pattern's query description into network nodes.
//!
//! Per pattern:
//!
//! 1. Variables are qualified as `"<pattern>:<var>"`.
//! 2. Each variable gets a chain from the root: its type checks in declared
//!    order, its attribute checks in canonical (sorted) order, a store, and
//!    an alias for the qualified name.
//! 3. Each relation gets a chain from the root: an edge-type check, a store,
//!    and an alias for the ordered pair of qualified names.
//! 4. For each variable, every alias whose key contains it is folded into
//!    merges (keys sorted, left to right).
//! 5. The per-variable results are folded into one terminal merge.
//! 6. An alias keyed by the bare pattern identifier is attached to it.
//!
//! Every discriminated node goes through
//! [`Network::get_or_create_child`], so equal chains land on equal nodes.

use std::collections::BTreeMap;

use rete_network::Network;
use rete_network::discriminator::Discriminator;
use rete_network::node::{
    AliasNode, AttrCheck, CheckAttrNode, CheckEdgeTypeNode, CheckTypeNode, ClassRef, EdgePair,
    NodeIndex, ReteNode, StoreNode, VarTuple,
};

use crate::error::CompileError;
use crate::query::QueryDescription;

/// Joins a pattern identifier and a variable name into a qualified name.
pub(crate) const QUALIFIER: char = ':';

/// Checks a description before anything touches the network.
///
/// # Errors
///
/// - [`CompileError::ReservedSeparator`] if the pattern identifier or a
///   declared variable contains [`QUALIFIER`].
/// - [`CompileError::EmptyPattern`] if no variable is declared.
/// - [`CompileError::UndeclaredVariable`] if a relation or attribute
///   constraint names an undeclared variable.
pub(crate) fn check_query(pattern_id: &str, query: &QueryDescription) -> Result<(), CompileError> {
    let reserved = core::iter::once(pattern_id)
        .chain(query.variables())
        .find(|name| name.contains(QUALIFIER));
    if let Some(name) = reserved {
        return Err(CompileError::ReservedSeparator {
            pattern: pattern_id.to_string(),
            name: name.to_string(),
        });
    }
    if query.variables().next().is_none() {
        return Err(CompileError::EmptyPattern(pattern_id.to_string()));
    }

    let referenced = query
        .relations()
        .iter()
        .flat_map(|rel| [rel.var1.as_str(), rel.var2.as_str()])
        .chain(query.constrained_variables());
    for var in referenced {
        if !query.is_declared(var) {
            return Err(CompileError::UndeclaredVariable {
                pattern: pattern_id.to_string(),
                variable: var.to_string(),
            });
        }
    }
    Ok(())
}

/// Extends a network with one pattern.
pub(crate) struct PatternCompiler<'a> {
    network: &'a mut Network,
    pattern_id: &'a str,
}

impl<'a> PatternCompiler<'a> {
    pub(crate) fn new(network: &'a mut Network, pattern_id: &'a str) -> Self {
        Self {
            network,
            pattern_id,
        }
    }

    /// Compiles `query` and returns the pattern's terminal alias.
    ///
    /// `query` must have passed [`check_query`].
    pub(crate) fn compile(mut self, query: &QueryDescription) -> Result<NodeIndex, CompileError> {
        let qualified: BTreeMap<&str, String> = query
            .variables()
            .map(|var| (var, format!("{}{QUALIFIER}{}", self.pattern_id, var)))
            .collect();

        // Alias key -> distinct alias nodes, in first-seen order.
        let mut aliases: BTreeMap<VarTuple, Vec<NodeIndex>> = BTreeMap::new();

        for (var, name) in &qualified {
            let root = self.network.root();
            let current = self.add_type_path(root, query.types(var))?;
            let current = self.add_attr_path(current, query.attrs(var))?;
            let current = self.add_store(current)?;
            let key = VarTuple::single(name.clone());
            let alias = self.add_alias(current, &key)?;
            record(&mut aliases, key, alias);
        }

        for rel in query.relations() {
            let var1 = self.qualified(&qualified, &rel.var1)?;
            let var2 = self.qualified(&qualified, &rel.var2)?;
            let root = self.network.root();
            let current = self.add_edge_type(root, &EdgePair::new(&rel.attr1, &rel.attr2))?;
            let current = self.add_store(current)?;
            let key = VarTuple::new([var1, var2]);
            let alias = self.add_alias(current, &key)?;
            record(&mut aliases, key, alias);
        }

        let mut local_joins = Vec::with_capacity(qualified.len());
        for name in qualified.values() {
            let inputs = aliases
                .iter()
                .filter(|(key, _)| key.contains(name))
                .flat_map(|(_, nodes)| nodes.iter().copied())
                .collect();
            local_joins.push(self.fold_merges(inputs)?);
        }

        let joined = self.fold_merges(local_joins)?;
        self.add_alias(joined, &VarTuple::single(self.pattern_id))
    }

    fn qualified(
        &self,
        qualified: &BTreeMap<&str, String>,
        var: &str,
    ) -> Result<String, CompileError> {
        qualified
            .get(var)
            .cloned()
            .ok_or_else(|| CompileError::UndeclaredVariable {
                pattern: self.pattern_id.to_string(),
                variable: var.to_string(),
            })
    }

    /// Chains type checks in declared order.
    fn add_type_path(
        &mut self,
        mut current: NodeIndex,
        classes: &[ClassRef],
    ) -> Result<NodeIndex, CompileError> {
        for class in classes {
            current = self
                .network
                .get_or_create_child(current, Discriminator::Type(class), |id| {
                    ReteNode::CheckType(CheckTypeNode {
                        id,
                        class: class.clone(),
                    })
                })?;
        }
        Ok(current)
    }

    /// Chains attribute checks in canonical order, so declaration order does
    /// not affect sharing.
    fn add_attr_path(
        &mut self,
        mut current: NodeIndex,
        checks: &[AttrCheck],
    ) -> Result<NodeIndex, CompileError> {
        let mut sorted = checks.to_vec();
        sorted.sort();
        for check in &sorted {
            current = self
                .network
                .get_or_create_child(current, Discriminator::Attr(check), |id| {
                    ReteNode::CheckAttr(CheckAttrNode {
                        id,
                        check: check.clone(),
                    })
                })?;
        }
        Ok(current)
    }

    fn add_edge_type(
        &mut self,
        current: NodeIndex,
        pair: &EdgePair,
    ) -> Result<NodeIndex, CompileError> {
        let node = self
            .network
            .get_or_create_child(current, Discriminator::EdgeType(pair), |id| {
                ReteNode::CheckEdgeType(CheckEdgeTypeNode {
                    id,
                    pair: pair.clone(),
                })
            })?;
        Ok(node)
    }

    fn add_store(&mut self, current: NodeIndex) -> Result<NodeIndex, CompileError> {
        let node = self
            .network
            .get_or_create_child(current, Discriminator::Store, |id| {
                ReteNode::Store(StoreNode { id })
            })?;
        Ok(node)
    }

    fn add_alias(&mut self, current: NodeIndex, vars: &VarTuple) -> Result<NodeIndex, CompileError> {
        let node = self
            .network
            .get_or_create_child(current, Discriminator::Alias(vars), |id| {
                ReteNode::Alias(AliasNode {
                    id,
                    vars: vars.clone(),
                })
            })?;
        Ok(node)
    }

    /// Left-folds `inputs` into merges. A single input is returned unchanged.
    fn fold_merges(&mut self, inputs: Vec<NodeIndex>) -> Result<NodeIndex, CompileError> {
        let mut inputs = inputs.into_iter();
        let first = inputs
            .next()
            .ok_or_else(|| CompileError::EmptyPattern(self.pattern_id.to_string()))?;
        let network = &mut *self.network;
        let joined = inputs.try_fold(first, |acc, next| network.add_merge(acc, next))?;
        Ok(joined)
    }
}

fn record(aliases: &mut BTreeMap<VarTuple, Vec<NodeIndex>>, key: VarTuple, node: NodeIndex) {
    let nodes = aliases.entry(key).or_default();
    if !nodes.contains(&node) {
        nodes.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Relation;
    use rete_network::node::Operator;

    #[test]
    fn empty_query_is_rejected() {
        let err = check_query("p", &QueryDescription::new()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyPattern(id) if id == "p"));
    }

    #[test]
    fn relation_on_undeclared_variable_is_rejected() {
        let query = QueryDescription::new()
            .with_type("x", "A")
            .with_relation(Relation::new("x", "bond", "bond", "y"));
        let err = check_query("p", &query).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UndeclaredVariable { variable, .. } if variable == "y"
        ));
    }

    #[test]
    fn separator_in_names_is_rejected() {
        let query = QueryDescription::new().with_type("b:c", "A");
        let err = check_query("a", &query).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ReservedSeparator { ref name, .. } if name == "b:c"
        ));

        let query = QueryDescription::new().with_type("c", "A");
        let err = check_query("a:b", &query).unwrap_err();
        assert!(matches!(
            err,
            CompileError::ReservedSeparator { ref name, .. } if name == "a:b"
        ));
        assert_eq!(
            err.to_string(),
            "pattern 'a:b': name 'a:b' contains the reserved separator ':'"
        );
    }

    #[test]
    fn attr_on_undeclared_variable_is_rejected() {
        let query = QueryDescription::new()
            .with_type("x", "A")
            .with_attr("z", AttrCheck::new("ph", Operator::Eq, true));
        assert!(check_query("p", &query).is_err());
    }

    #[test]
    fn declared_without_types_compiles_to_store_and_alias() {
        let mut query = QueryDescription::new();
        query.declare("x");
        check_query("p", &query).unwrap();

        let mut network = Network::new();
        let terminal = PatternCompiler::new(&mut network, "p")
            .compile(&query)
            .unwrap();

        // root -> store -> alias(p:x) -> alias(p)
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.node(terminal).unwrap().signature(), "p");
    }

    #[test]
    fn repeated_relation_is_joined_once() {
        let query = QueryDescription::new()
            .with_type("x", "A")
            .with_type("y", "A")
            .with_relation(Relation::new("x", "bond", "bond", "y"))
            .with_relation(Relation::new("x", "bond", "bond", "y"));

        let mut network = Network::new();
        PatternCompiler::new(&mut network, "p")
            .compile(&query)
            .unwrap();

        // x: alias(x) + alias(x,y); y: alias(x,y) + alias(y); plus the global join.
        assert_eq!(network.count_archetype(rete_network::Archetype::Merge), 3);
    }
}
