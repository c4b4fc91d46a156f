//! Query descriptions and the pattern interface.
//!
//! A [`Pattern`] describes itself to the compiler as a [`QueryDescription`]:
//! per-variable type and attribute constraints plus directed relations
//! between variables. How patterns are authored is up to the caller.

use std::collections::BTreeMap;

use rete_network::node::{AttrCheck, ClassRef};

/// Error raised by a pattern that cannot describe its queries.
pub type QueryError = Box<dyn core::error::Error + Send + Sync>;

/// Something the compiler can turn into network nodes.
///
/// # Example
///
/// ```
/// use rete_compiler::query::{Pattern, QueryDescription, QueryError};
///
/// struct AnyMolecule;
///
/// impl Pattern for AnyMolecule {
///     fn id(&self) -> &str {
///         "any-molecule"
///     }
///
///     fn generate_queries(&self) -> Result<QueryDescription, QueryError> {
///         Ok(QueryDescription::new().with_type("m", "Molecule"))
///     }
/// }
/// ```
pub trait Pattern: Send + Sync {
    /// Process-unique identifier of the pattern.
    fn id(&self) -> &str;

    /// Describes the pattern's constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is malformed. The error reaches the
    /// caller of [`Matcher::add_pattern`](crate::Matcher::add_pattern)
    /// unchanged as its source.
    fn generate_queries(&self) -> Result<QueryDescription, QueryError>;
}

/// A directed relation `var1.attr1 -- var2.attr2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    /// Source variable.
    pub var1: String,
    /// Linking attribute on the source.
    pub attr1: String,
    /// Linking attribute on the target.
    pub attr2: String,
    /// Target variable.
    pub var2: String,
}

impl Relation {
    /// Creates a new relation.
    #[must_use]
    pub fn new(
        var1: impl Into<String>,
        attr1: impl Into<String>,
        attr2: impl Into<String>,
        var2: impl Into<String>,
    ) -> Self {
        Self {
            var1: var1.into(),
            attr1: attr1.into(),
            attr2: attr2.into(),
            var2: var2.into(),
        }
    }
}

/// Constraints of one pattern, keyed by (unqualified) variable name.
///
/// Type constraints keep their declared order. Attribute constraints are
/// stored as declared; the compiler sorts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescription {
    types: BTreeMap<String, Vec<ClassRef>>,
    attrs: BTreeMap<String, Vec<AttrCheck>>,
    relations: Vec<Relation>,
}

impl QueryDescription {
    /// Creates an empty description.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `var` (if needed) and appends a class constraint.
    #[must_use]
    pub fn with_type(mut self, var: impl Into<String>, class: impl Into<ClassRef>) -> Self {
        self.add_type(var, class);
        self
    }

    /// Appends an attribute constraint on `var`.
    #[must_use]
    pub fn with_attr(mut self, var: impl Into<String>, check: AttrCheck) -> Self {
        self.add_attr(var, check);
        self
    }

    /// Appends a relation.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.add_relation(relation);
        self
    }

    /// Declares `var` with no class constraints. Declaring twice is a no-op.
    pub fn declare(&mut self, var: impl Into<String>) -> &mut Self {
        self.types.entry(var.into()).or_default();
        self
    }

    /// Declares `var` (if needed) and appends a class constraint.
    pub fn add_type(&mut self, var: impl Into<String>, class: impl Into<ClassRef>) -> &mut Self {
        self.types.entry(var.into()).or_default().push(class.into());
        self
    }

    /// Appends an attribute constraint on `var`.
    pub fn add_attr(&mut self, var: impl Into<String>, check: AttrCheck) -> &mut Self {
        self.attrs.entry(var.into()).or_default().push(check);
        self
    }

    /// Appends a relation.
    pub fn add_relation(&mut self, relation: Relation) -> &mut Self {
        self.relations.push(relation);
        self
    }

    /// Declared variables, sorted by name.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Returns true if `var` is declared.
    #[must_use]
    pub fn is_declared(&self, var: &str) -> bool {
        self.types.contains_key(var)
    }

    /// Class constraints of `var`, in declared order.
    #[must_use]
    pub fn types(&self, var: &str) -> &[ClassRef] {
        self.types.get(var).map_or(&[], Vec::as_slice)
    }

    /// Attribute constraints of `var`, in declared order.
    #[must_use]
    pub fn attrs(&self, var: &str) -> &[AttrCheck] {
        self.attrs.get(var).map_or(&[], Vec::as_slice)
    }

    /// Variables carrying attribute constraints, sorted by name.
    pub fn constrained_variables(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    /// Relations, in declared order.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }
}

/// A pattern whose description is fixed up front.
///
/// # Example
///
/// ```
/// use rete_compiler::query::{Pattern, QueryDescription, StaticPattern};
///
/// let pattern = StaticPattern::new("p1", QueryDescription::new().with_type("x", "ClassA"));
/// assert_eq!(pattern.id(), "p1");
/// ```
#[derive(Debug, Clone)]
pub struct StaticPattern {
    id: String,
    query: QueryDescription,
}

impl StaticPattern {
    /// Creates a pattern from an identifier and its description.
    #[must_use]
    pub fn new(id: impl Into<String>, query: QueryDescription) -> Self {
        Self {
            id: id.into(),
            query,
        }
    }

    /// Returns the description.
    #[must_use]
    pub fn query(&self) -> &QueryDescription {
        &self.query
    }
}

impl Pattern for StaticPattern {
    fn id(&self) -> &str {
        &self.id
    }

    fn generate_queries(&self) -> Result<QueryDescription, QueryError> {
        Ok(self.query.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rete_network::node::Operator;

    #[test]
    fn types_keep_declared_order() {
        let query = QueryDescription::new()
            .with_type("x", "Site")
            .with_type("x", "PhosphoSite");
        let names: Vec<&str> = query.types("x").iter().map(ClassRef::name).collect();
        assert_eq!(names, ["Site", "PhosphoSite"]);
    }

    #[test]
    fn variables_are_sorted() {
        let query = QueryDescription::new()
            .with_type("y", "B")
            .with_type("x", "A");
        assert_eq!(query.variables().collect::<Vec<_>>(), ["x", "y"]);
    }

    #[test]
    fn undeclared_lookups_are_empty() {
        let query = QueryDescription::new().with_attr("z", AttrCheck::new("v", Operator::Gt, 1));
        assert!(query.types("z").is_empty());
        assert!(!query.is_declared("z"));
        assert_eq!(query.constrained_variables().collect::<Vec<_>>(), ["z"]);
    }

    #[test]
    fn declare_is_idempotent() {
        let mut query = QueryDescription::new();
        query.declare("x").declare("x");
        assert_eq!(query.variables().count(), 1);
    }
}
