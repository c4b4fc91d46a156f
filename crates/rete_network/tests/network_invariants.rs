//! Integration tests for the sharing gateway and structural validation.
//!
//! These tests verify that networks built only through the public mutation
//! API always satisfy the single-root and sharing invariants:
//! - Repeated chains collapse onto the same nodes
//! - Custom allocators are honoured
//! - Random sequences of gateway calls never produce duplicate children

use rete_network::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// One step of a chain hanging off the root.
#[derive(Debug, Clone)]
enum Step {
    Type(&'static str),
    Attr(&'static str, i64),
    Edge(&'static str, &'static str),
    Store,
    Alias(&'static str),
}

fn extend(network: &mut Network, parent: NodeIndex, step: &Step) -> NodeIndex {
    let result = match step {
        Step::Type(name) => {
            let class = ClassRef::new(*name);
            network.get_or_create_child(parent, Discriminator::Type(&class), |id| {
                ReteNode::CheckType(CheckTypeNode {
                    id,
                    class: class.clone(),
                })
            })
        }
        Step::Attr(name, value) => {
            let check = AttrCheck::new(*name, Operator::Eq, *value);
            network.get_or_create_child(parent, Discriminator::Attr(&check), |id| {
                ReteNode::CheckAttr(CheckAttrNode {
                    id,
                    check: check.clone(),
                })
            })
        }
        Step::Edge(a, b) => {
            let pair = EdgePair::new(*a, *b);
            network.get_or_create_child(parent, Discriminator::EdgeType(&pair), |id| {
                ReteNode::CheckEdgeType(CheckEdgeTypeNode {
                    id,
                    pair: pair.clone(),
                })
            })
        }
        Step::Store => network.get_or_create_child(parent, Discriminator::Store, |id| {
            ReteNode::Store(StoreNode { id })
        }),
        Step::Alias(var) => {
            let vars = VarTuple::single(*var);
            network.get_or_create_child(parent, Discriminator::Alias(&vars), |id| {
                ReteNode::Alias(AliasNode {
                    id,
                    vars: vars.clone(),
                })
            })
        }
    };
    result.expect("gateway call")
}

fn build_chain(network: &mut Network, steps: &[Step]) -> Vec<NodeIndex> {
    let mut current = network.root();
    steps
        .iter()
        .map(|step| {
            current = extend(network, current, step);
            current
        })
        .collect()
}

/// Allocator with a fixed prefix, to check injection.
#[derive(Debug, Default)]
struct PrefixedIds(SequentialIds);

impl IdAllocator for PrefixedIds {
    fn generate_id(&self) -> NodeId {
        NodeId::from_string(format!("test-{}", self.0.generate_id()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sharing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn identical_chains_share_every_node() {
    let steps = [
        Step::Type("A"),
        Step::Attr("ph", 1),
        Step::Store,
        Step::Alias("p:x"),
    ];
    let mut network = Network::new();
    let first = build_chain(&mut network, &steps);
    let second = build_chain(&mut network, &steps);

    assert_eq!(first, second);
    assert_eq!(network.node_count(), 5);
    assert_eq!(network.edge_count(), 4);
    assert!(network.validate().is_ok());
}

#[test]
fn diverging_chains_share_common_prefix() {
    let mut network = Network::new();
    let first = build_chain(&mut network, &[Step::Type("A"), Step::Attr("ph", 1)]);
    let second = build_chain(&mut network, &[Step::Type("A"), Step::Attr("ph", 2)]);

    assert_eq!(first[0], second[0]);
    assert_ne!(first[1], second[1]);
    assert_eq!(network.successors(first[0]).len(), 2);
}

#[test]
fn edge_pair_direction_creates_distinct_nodes() {
    let mut network = Network::new();
    let forward = build_chain(&mut network, &[Step::Edge("a", "b")]);
    let backward = build_chain(&mut network, &[Step::Edge("b", "a")]);

    assert_ne!(forward[0], backward[0]);
    let signatures: Vec<String> = network
        .successors(network.root())
        .iter()
        .map(|i| network.node(*i).unwrap().signature())
        .collect();
    assert_eq!(signatures, ["*0.a--*1.b", "*0.b--*1.a"]);
}

#[test]
fn custom_allocator_names_nodes() {
    let mut network = Network::with_allocator(Box::new(PrefixedIds::default()));
    let chain = build_chain(&mut network, &[Step::Type("A"), Step::Store]);

    let ids: Vec<&str> = chain
        .iter()
        .map(|i| network.node(*i).unwrap().id().as_str())
        .collect();
    assert_eq!(ids, ["test-node_0", "test-node_1"]);
    assert!(network.get_node("test-node_1").is_some());
    assert_eq!(network.index_of("root"), Some(network.root()));
}

#[test]
fn merges_are_never_shared() {
    let mut network = Network::new();
    let x = build_chain(&mut network, &[Step::Type("A"), Step::Store, Step::Alias("p:x")]);
    let y = build_chain(&mut network, &[Step::Type("B"), Step::Store, Step::Alias("p:y")]);

    let first = network.add_merge(x[2], y[2]).unwrap();
    let second = network.add_merge(x[2], y[2]).unwrap();

    assert_ne!(first, second);
    assert_eq!(network.count_archetype(Archetype::Merge), 2);
    assert!(network.validate().is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-Based
// ─────────────────────────────────────────────────────────────────────────────

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            prop_oneof![Just("A"), Just("B")].prop_map(Step::Type),
            (prop_oneof![Just("ph"), Just("v")], 0..3i64).prop_map(|(n, v)| Step::Attr(n, v)),
            prop_oneof![Just(("a", "b")), Just(("b", "a"))].prop_map(|(a, b)| Step::Edge(a, b)),
            Just(Step::Store),
            prop_oneof![Just("p:x"), Just("p:y")].prop_map(Step::Alias),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// However chains are built, the result validates and rebuilding any
        /// chain adds nothing.
        #[test]
        fn prop_gateway_preserves_invariants(
            chains in prop::collection::vec(prop::collection::vec(arb_step(), 1..6usize), 1..8usize)
        ) {
            let mut network = Network::new();
            let built: Vec<Vec<NodeIndex>> =
                chains.iter().map(|c| build_chain(&mut network, c)).collect();

            prop_assert!(network.validate().is_ok());

            let count = network.node_count();
            for (chain, indices) in chains.iter().zip(&built) {
                let again = build_chain(&mut network, chain);
                prop_assert_eq!(&again, indices);
            }
            prop_assert_eq!(network.node_count(), count);
        }
    }
}
