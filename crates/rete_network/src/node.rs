//! Node types for discrimination networks.
//!
//! Nodes are the vertices of the network. Every node carries an archetype
//! (its role in the network) and an archetype-specific payload. The payload is
//! what the sharing gateway compares when deciding whether a child already
//! exists; see [`Discriminator`].

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::discriminator::Discriminator;

/// Textual identifier of the singleton root node.
pub const ROOT_ID: &str = "root";

/// Globally unique identifier for a node.
///
/// Identifiers are produced by an [`IdAllocator`](crate::id::IdAllocator) for
/// every node except the root, which is always [`ROOT_ID`].
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Creates a node ID from a specific string value.
    #[must_use]
    pub fn from_string(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier of the root node.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_ID.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Dense position of a node inside a [`Network`](crate::network::Network) arena.
///
/// Indices are only meaningful for the network that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Returns the raw slot index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// The single entry point of the network.
    Root,
    /// A single-input test (type, attribute or edge type).
    Check,
    /// A materialization point.
    Store,
    /// Binds variable names to a position in the network.
    Alias,
    /// Joins the outputs of two nodes.
    Merge,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Root => "root",
            Archetype::Check => "check",
            Archetype::Store => "store",
            Archetype::Alias => "alias",
            Archetype::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// Reference to a class of the external object schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassRef(Arc<str>);

impl ClassRef {
    /// Creates a class reference from its name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison operator of an attribute check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl Operator {
    /// Returns the operator's symbol as used in node signatures.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Gt => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A literal attribute value compared against by a [`CheckAttrNode`].
///
/// Values are totally ordered: first by kind (`Bool < Int < Float < Str`),
/// then by value. Floats compare with [`f64::total_cmp`], so `NaN` is a
/// regular, sortable value and equal to itself.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Str(Arc<str>),
}

impl AttrValue {
    fn rank(&self) -> u8 {
        match self {
            AttrValue::Bool(_) => 0,
            AttrValue::Int(_) => 1,
            AttrValue::Float(_) => 2,
            AttrValue::Str(_) => 3,
        }
    }
}

impl Ord for AttrValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a.cmp(b),
            (AttrValue::Int(a), AttrValue::Int(b)) => a.cmp(b),
            (AttrValue::Float(a), AttrValue::Float(b)) => a.total_cmp(b),
            (AttrValue::Str(a), AttrValue::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for AttrValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttrValue {}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            AttrValue::Bool(v) => v.hash(state),
            AttrValue::Int(v) => v.hash(state),
            AttrValue::Float(v) => v.to_bits().hash(state),
            AttrValue::Str(v) => v.hash(state),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{v}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value.into())
    }
}

/// An attribute comparison: `<attr> <op> <value>`.
///
/// The derived ordering (attribute name, then operator, then value) is the
/// canonical order in which attribute checks are chained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrCheck {
    /// Name of the compared attribute.
    pub attr: String,
    /// Comparison operator.
    pub op: Operator,
    /// Literal compared against.
    pub value: AttrValue,
}

impl AttrCheck {
    /// Creates a new attribute check.
    #[must_use]
    pub fn new(attr: impl Into<String>, op: Operator, value: impl Into<AttrValue>) -> Self {
        Self {
            attr: attr.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for AttrCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.attr, self.op, self.value)
    }
}

/// Ordered pair of attribute names linking two adjacent instances.
///
/// Order encodes direction: `attr1` belongs to the first instance, `attr2`
/// to the second.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgePair {
    /// Attribute on the source instance.
    pub attr1: String,
    /// Attribute on the target instance.
    pub attr2: String,
}

impl EdgePair {
    /// Creates a new attribute pair.
    #[must_use]
    pub fn new(attr1: impl Into<String>, attr2: impl Into<String>) -> Self {
        Self {
            attr1: attr1.into(),
            attr2: attr2.into(),
        }
    }
}

/// Ordered tuple of variable names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VarTuple(Vec<String>);

impl VarTuple {
    /// Creates a tuple from the given names, preserving order.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Creates a one-element tuple.
    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Creates the sorted, de-duplicated union of two tuples.
    #[must_use]
    pub fn union(a: &VarTuple, b: &VarTuple) -> Self {
        let mut names: Vec<String> = a.0.iter().chain(&b.0).cloned().collect();
        names.sort();
        names.dedup();
        Self(names)
    }

    /// Returns true if the tuple contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Returns the names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the tuple has no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VarTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// A node in the discrimination network.
#[derive(Debug, Clone, PartialEq)]
pub enum ReteNode {
    /// The singleton entry point.
    Root(RootNode),
    /// Tests class membership.
    CheckType(CheckTypeNode),
    /// Tests an attribute comparison.
    CheckAttr(CheckAttrNode),
    /// Tests a directed structural link between two adjacent instances.
    CheckEdgeType(CheckEdgeTypeNode),
    /// Materialization point.
    Store(StoreNode),
    /// Binds a tuple of variable names.
    Alias(AliasNode),
    /// Joins two upstream nodes.
    Merge(MergeNode),
}

impl ReteNode {
    /// Returns the node's ID.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            ReteNode::Root(n) => &n.id,
            ReteNode::CheckType(n) => &n.id,
            ReteNode::CheckAttr(n) => &n.id,
            ReteNode::CheckEdgeType(n) => &n.id,
            ReteNode::Store(n) => &n.id,
            ReteNode::Alias(n) => &n.id,
            ReteNode::Merge(n) => &n.id,
        }
    }

    /// Returns the node's archetype.
    #[must_use]
    pub fn archetype(&self) -> Archetype {
        match self {
            ReteNode::Root(_) => Archetype::Root,
            ReteNode::CheckType(_) | ReteNode::CheckAttr(_) | ReteNode::CheckEdgeType(_) => {
                Archetype::Check
            }
            ReteNode::Store(_) => Archetype::Store,
            ReteNode::Alias(_) => Archetype::Alias,
            ReteNode::Merge(_) => Archetype::Merge,
        }
    }

    /// Returns the variable names bound by alias and merge nodes.
    #[must_use]
    pub fn variable_names(&self) -> Option<&VarTuple> {
        match self {
            ReteNode::Alias(n) => Some(&n.vars),
            ReteNode::Merge(n) => Some(&n.vars),
            _ => None,
        }
    }

    /// Projects the node's payload onto the discriminator compared by the
    /// sharing gateway. Root and merge nodes have none.
    #[must_use]
    pub fn discriminator(&self) -> Option<Discriminator<'_>> {
        match self {
            ReteNode::Root(_) | ReteNode::Merge(_) => None,
            ReteNode::CheckType(n) => Some(Discriminator::Type(&n.class)),
            ReteNode::CheckAttr(n) => Some(Discriminator::Attr(&n.check)),
            ReteNode::CheckEdgeType(n) => Some(Discriminator::EdgeType(&n.pair)),
            ReteNode::Store(_) => Some(Discriminator::Store),
            ReteNode::Alias(n) => Some(Discriminator::Alias(&n.vars)),
        }
    }

    /// Returns the node's diagnostic signature, derived purely from its payload.
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            ReteNode::Root(_) => ROOT_ID.to_string(),
            ReteNode::CheckType(n) => format!("is-instance-of({})", n.class),
            ReteNode::CheckAttr(n) => format!("*.{}", n.check),
            ReteNode::CheckEdgeType(n) => format!("*0.{}--*1.{}", n.pair.attr1, n.pair.attr2),
            ReteNode::Store(_) => "store".to_string(),
            ReteNode::Alias(n) => n.vars.to_string(),
            ReteNode::Merge(n) => n.vars.to_string(),
        }
    }
}

impl fmt::Display for ReteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// The network's entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    /// Always [`ROOT_ID`].
    pub id: NodeId,
}

impl Default for RootNode {
    fn default() -> Self {
        Self { id: NodeId::root() }
    }
}

/// Tests that an instance belongs to a class.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckTypeNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// The required class.
    pub class: ClassRef,
}

/// Tests an attribute comparison on an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckAttrNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// The comparison performed.
    pub check: AttrCheck,
}

/// Tests a directed link between two adjacent instances.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckEdgeTypeNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Linking attribute pair.
    pub pair: EdgePair,
}

/// A checkpoint that lets joins branch beneath it without re-running
/// upstream checks.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreNode {
    /// Unique identifier for this node.
    pub id: NodeId,
}

/// Binds an ordered tuple of variable names to this point in the network.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// The bound variable names.
    pub vars: VarTuple,
}

/// Joins two upstream nodes. Its variables are the union of its parents'.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeNode {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// Sorted union of both parents' variable names.
    pub vars: VarTuple,
}
