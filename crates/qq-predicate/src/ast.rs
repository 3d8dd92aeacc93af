//! Expression tree produced by the query builder.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Comparison operator of a rule.
///
/// The supported set is closed. Anything else the editor sends is kept as
/// [`Operator::Unknown`] so the compiler can decide how to treat it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `contains`
    Contains,
    /// `beginsWith`
    BeginsWith,
    /// `endsWith`
    EndsWith,
    /// `doesNotContain`
    DoesNotContain,
    /// An operator outside the supported set.
    Unknown(String),
}

impl Operator {
    /// All supported operators, in editor order.
    pub const SUPPORTED: [Operator; 10] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Contains,
        Operator::BeginsWith,
        Operator::EndsWith,
        Operator::DoesNotContain,
    ];

    /// Parses an operator from its wire name. Matching is exact.
    pub fn parse(name: &str) -> Self {
        match name {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            "<=" => Operator::LtEq,
            ">=" => Operator::GtEq,
            "contains" => Operator::Contains,
            "beginsWith" => Operator::BeginsWith,
            "endsWith" => Operator::EndsWith,
            "doesNotContain" => Operator::DoesNotContain,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Returns the wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Contains => "contains",
            Operator::BeginsWith => "beginsWith",
            Operator::EndsWith => "endsWith",
            Operator::DoesNotContain => "doesNotContain",
            Operator::Unknown(name) => name,
        }
    }

    /// Returns true if this is one of the supported operators.
    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Boolean aggregation strategy of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Every child must hold.
    And,
    /// At least one child must hold.
    Or,
    /// A combinator other than `and`/`or`.
    Unknown(String),
}

impl Combinator {
    /// Parses a combinator name (case-insensitive).
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("and") {
            Combinator::And
        } else if name.eq_ignore_ascii_case("or") {
            Combinator::Or
        } else {
            Combinator::Unknown(name.to_string())
        }
    }

    /// Returns the wire name of the combinator.
    pub fn as_str(&self) -> &str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
            Combinator::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Combinator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field/operator/value condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Name of the record field to test.
    pub field: String,
    /// How the field is compared to `value`.
    pub operator: Operator,
    /// Raw literal as authored in the editor; coerced at compile time.
    pub value: Value,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A combinator over an ordered list of rules and nested groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// How child results are combined.
    pub combinator: Combinator,
    /// Child nodes, evaluated in order.
    pub rules: Vec<QueryNode>,
}

impl Group {
    /// Creates an AND group.
    pub fn and(rules: Vec<QueryNode>) -> Self {
        Self {
            combinator: Combinator::And,
            rules,
        }
    }

    /// Creates an OR group.
    pub fn or(rules: Vec<QueryNode>) -> Self {
        Self {
            combinator: Combinator::Or,
            rules,
        }
    }
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryNode {
    /// Leaf condition.
    Rule(Rule),
    /// Nested group.
    Group(Group),
}

impl QueryNode {
    /// Number of rules in the tree.
    pub fn rule_count(&self) -> usize {
        match self {
            QueryNode::Rule(_) => 1,
            QueryNode::Group(group) => group.rules.iter().map(QueryNode::rule_count).sum(),
        }
    }

    /// Calls `visit` for every rule in the tree, depth first.
    pub fn for_each_rule<'a>(&'a self, visit: &mut impl FnMut(&'a Rule)) {
        match self {
            QueryNode::Rule(rule) => visit(rule),
            QueryNode::Group(group) => {
                for child in &group.rules {
                    child.for_each_rule(visit);
                }
            }
        }
    }
}

impl From<Rule> for QueryNode {
    fn from(rule: Rule) -> Self {
        QueryNode::Rule(rule)
    }
}

impl From<Group> for QueryNode {
    fn from(group: Group) -> Self {
        QueryNode::Group(group)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rules.is_empty() {
            // Vacuous groups render as their constant value.
            return match self.combinator {
                Combinator::And => f.write_str("true"),
                Combinator::Or => f.write_str("false"),
                Combinator::Unknown(ref name) => write!(f, "{name}()"),
            };
        }

        f.write_str("(")?;
        for (i, child) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.combinator)?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Rule(rule) => rule.fmt(f),
            QueryNode::Group(group) => group.fmt(f),
        }
    }
}
