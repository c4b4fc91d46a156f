//! Payload discriminators used by the sharing gateway.
//!
//! A [`Discriminator`] names an archetype together with the payload that
//! distinguishes siblings of that archetype. Two children of the same parent
//! with equal discriminators would be duplicates, which the network forbids.

use core::fmt;

use crate::node::{AttrCheck, ClassRef, EdgePair, ReteNode, VarTuple};

/// Borrowed (archetype, payload) pair compared against existing children.
///
/// Merge nodes have no discriminator and are never shared through the
/// gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator<'a> {
    /// A `CheckType` child for the given class.
    Type(&'a ClassRef),
    /// A `CheckAttr` child for the given comparison.
    Attr(&'a AttrCheck),
    /// A `CheckEdgeType` child for the given attribute pair.
    EdgeType(&'a EdgePair),
    /// The (payload-free) `Store` child.
    Store,
    /// An `Alias` child for the given variable tuple.
    Alias(&'a VarTuple),
}

impl Discriminator<'_> {
    /// Returns true if `node` has this discriminator.
    #[must_use]
    pub fn matches(&self, node: &ReteNode) -> bool {
        node.discriminator().is_some_and(|other| other == *self)
    }

    /// Returns a short name for the archetype being discriminated.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Discriminator::Type(_) => "check-type",
            Discriminator::Attr(_) => "check-attr",
            Discriminator::EdgeType(_) => "check-edge-type",
            Discriminator::Store => "store",
            Discriminator::Alias(_) => "alias",
        }
    }
}

impl fmt::Display for Discriminator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())?;
        match self {
            Discriminator::Type(class) => write!(f, "({class})"),
            Discriminator::Attr(check) => write!(f, "({check})"),
            Discriminator::EdgeType(pair) => write!(f, "({},{})", pair.attr1, pair.attr2),
            Discriminator::Store => Ok(()),
            Discriminator::Alias(vars) => write!(f, "({vars})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AliasNode, CheckEdgeTypeNode, MergeNode, NodeId, StoreNode};

    #[test]
    fn store_matches_any_store() {
        let store = ReteNode::Store(StoreNode {
            id: NodeId::from_string("s"),
        });
        assert!(Discriminator::Store.matches(&store));
    }

    #[test]
    fn edge_pair_order_is_significant() {
        let node = ReteNode::CheckEdgeType(CheckEdgeTypeNode {
            id: NodeId::from_string("e"),
            pair: EdgePair::new("a", "b"),
        });
        assert!(Discriminator::EdgeType(&EdgePair::new("a", "b")).matches(&node));
        assert!(!Discriminator::EdgeType(&EdgePair::new("b", "a")).matches(&node));
    }

    #[test]
    fn merge_never_matches() {
        let vars = VarTuple::single("p:x");
        let merge = ReteNode::Merge(MergeNode {
            id: NodeId::from_string("m"),
            vars: vars.clone(),
        });
        assert!(!Discriminator::Alias(&vars).matches(&merge));

        let alias = ReteNode::Alias(AliasNode {
            id: NodeId::from_string("a"),
            vars: vars.clone(),
        });
        assert!(Discriminator::Alias(&vars).matches(&alias));
    }

    #[test]
    fn display_names_archetype_and_payload() {
        let vars = VarTuple::new(["p:x", "p:y"]);
        assert_eq!(Discriminator::Alias(&vars).to_string(), "alias(p:x,p:y)");
        assert_eq!(Discriminator::Store.to_string(), "store");
        let pair = EdgePair::new("bond", "sites");
        assert_eq!(
            Discriminator::EdgeType(&pair).to_string(),
            "check-edge-type(bond,sites)"
        );
    }
}
