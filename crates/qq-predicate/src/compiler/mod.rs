//! Compilation of expression trees into record predicates.
//!
//! A [`QueryNode`] tree is compiled once per query into a [`Predicate`]. Rule
//! values are resolved and coerced during compilation, so applying the
//! predicate to a record only reads the fields it needs and compares.
//!
//! # Example
//!
//! ```
//! use qq_predicate::{compile, FieldCatalog, FieldDescriptor, Group, Operator, QueryNode, Rule, SemanticType};
//! use serde_json::json;
//!
//! let catalog = FieldCatalog::new(vec![FieldDescriptor::new("totalScore", SemanticType::Number)]);
//! let tree = QueryNode::Group(Group::and(vec![
//!     Rule::new("totalScore", Operator::Gt, "500").into(),
//! ]));
//!
//! let predicate = compile(&tree, &catalog);
//! assert!(predicate.matches(&json!({"totalScore": 750})));
//! assert!(!predicate.matches(&json!({"totalScore": 200})));
//! ```

use std::cmp::Ordering;

use crate::ast::{Combinator, Group, Operator, QueryNode, Rule};
use crate::catalog::FieldCatalog;
use crate::error::{QueryError, QueryResult};
use crate::record::FieldSource;
use crate::value::{coerce, compare, display_string, is_missing, Literal};

/// Options controlling how permissive compilation is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject unknown operators and combinators instead of falling back.
    ///
    /// When false, an unknown operator matches every record that has a value
    /// for the field, and an unknown combinator behaves as `and`.
    pub strict: bool,
}

impl CompileOptions {
    /// Options that reject unknown operators and combinators.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// A compiled, immutable record predicate.
///
/// Owns all coerced rule values; holds no references to the tree or catalog it
/// was compiled from and is safe to share between threads.
#[derive(Debug, Clone)]
pub struct Predicate {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(Leaf),
    All(Vec<Node>),
    Any(Vec<Node>),
}

#[derive(Debug, Clone)]
struct Leaf {
    field: String,
    operator: Operator,
    value: Literal,
    /// `value` converted for the substring operators.
    needle: String,
}

impl Predicate {
    /// Returns true if the record passes the filter.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        self.root.matches(record)
    }

    /// Borrows the predicate as a plain closure, for scans that take `Fn`.
    pub fn as_fn<R: FieldSource + ?Sized>(&self) -> impl Fn(&R) -> bool + '_ {
        move |record: &R| self.matches(record)
    }

    /// Filters a slice of records, returning only those that match.
    pub fn filter_records<'a, R: FieldSource>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

impl Node {
    fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.matches(record),
            Node::All(children) => children.iter().all(|c| c.matches(record)),
            Node::Any(children) => children.iter().any(|c| c.matches(record)),
        }
    }
}

impl Leaf {
    fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        match record.field(&self.field) {
            Some(actual) if !is_missing(Some(actual)) => self.matches_present(actual),
            _ => self.matches_missing(),
        }
    }

    /// Absent, null and empty values are decided by the operator alone.
    fn matches_missing(&self) -> bool {
        match self.operator {
            Operator::Eq => self.value.is_absent(),
            Operator::NotEq => !self.value.is_absent(),
            Operator::Contains | Operator::BeginsWith | Operator::EndsWith => false,
            Operator::DoesNotContain => true,
            Operator::Lt
            | Operator::Gt
            | Operator::LtEq
            | Operator::GtEq
            | Operator::Unknown(_) => false,
        }
    }

    fn matches_present(&self, actual: &serde_json::Value) -> bool {
        let ordering = || compare(actual, &self.value);
        match self.operator {
            Operator::Eq => ordering() == Some(Ordering::Equal),
            Operator::NotEq => ordering() != Some(Ordering::Equal),
            Operator::Lt => ordering() == Some(Ordering::Less),
            Operator::Gt => ordering() == Some(Ordering::Greater),
            Operator::LtEq => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Operator::GtEq => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
            Operator::Contains => display_string(actual).contains(self.needle.as_str()),
            Operator::BeginsWith => display_string(actual).starts_with(self.needle.as_str()),
            Operator::EndsWith => display_string(actual).ends_with(self.needle.as_str()),
            Operator::DoesNotContain => !display_string(actual).contains(self.needle.as_str()),
            Operator::Unknown(_) => true,
        }
    }
}

/// Compiles an expression tree with the default, permissive options.
///
/// Never fails: unknown fields use text semantics, unknown operators match any
/// present value and unknown combinators behave as `and`.
pub fn compile(tree: &QueryNode, catalog: &FieldCatalog) -> Predicate {
    let root = build_node(tree, catalog);
    tracing::debug!(rules = tree.rule_count(), "compiled query predicate");
    Predicate { root }
}

/// Compiles an expression tree with explicit options.
///
/// # Errors
///
/// With [`CompileOptions::strict`], returns [`QueryError::UnknownOperator`] or
/// [`QueryError::UnknownCombinator`] for the first unsupported node found, in
/// depth-first order.
pub fn compile_with(
    tree: &QueryNode,
    catalog: &FieldCatalog,
    options: CompileOptions,
) -> QueryResult<Predicate> {
    if options.strict {
        check_supported(tree)?;
    }
    Ok(compile(tree, catalog))
}

fn check_supported(node: &QueryNode) -> QueryResult<()> {
    match node {
        QueryNode::Rule(rule) => match &rule.operator {
            Operator::Unknown(name) => Err(QueryError::unknown_operator(name.as_str())),
            _ => Ok(()),
        },
        QueryNode::Group(group) => {
            if let Combinator::Unknown(name) = &group.combinator {
                return Err(QueryError::unknown_combinator(name.as_str()));
            }
            group.rules.iter().try_for_each(check_supported)
        }
    }
}

fn build_node(node: &QueryNode, catalog: &FieldCatalog) -> Node {
    match node {
        QueryNode::Rule(rule) => Node::Leaf(build_leaf(rule, catalog)),
        QueryNode::Group(group) => build_group(group, catalog),
    }
}

fn build_leaf(rule: &Rule, catalog: &FieldCatalog) -> Leaf {
    if let Operator::Unknown(name) = &rule.operator {
        tracing::warn!(
            field = %rule.field,
            operator = %name,
            "unknown operator, rule matches every present value"
        );
    }

    let semantic_type = catalog.resolve(&rule.field);
    let value = coerce(&rule.value, semantic_type);
    let needle = value.to_display_string().into_owned();

    Leaf {
        field: rule.field.clone(),
        operator: rule.operator.clone(),
        value,
        needle,
    }
}

fn build_group(group: &Group, catalog: &FieldCatalog) -> Node {
    let children = group
        .rules
        .iter()
        .map(|child| build_node(child, catalog))
        .collect();

    match &group.combinator {
        Combinator::And => Node::All(children),
        Combinator::Or => Node::Any(children),
        Combinator::Unknown(name) => {
            tracing::warn!(combinator = %name, "unknown combinator, treating as and");
            Node::All(children)
        }
    }
}
