//! Parsing of serialized queries and field catalogs.
//!
//! Both inputs arrive as JSON strings produced by the query editor. Any
//! malformed input fails the whole query; nothing degrades to a default filter.

use serde_json::{Map, Value};

use crate::ast::{Combinator, Group, Operator, QueryNode, Rule};
use crate::catalog::{FieldCatalog, FieldDescriptor};
use crate::error::{QueryError, QueryResult};

const QUERY: &str = "query";
const FIELDS: &str = "fields";

/// Parser for serialized query-builder input.
pub struct QueryParser;

impl QueryParser {
    /// Parses a serialized expression tree.
    ///
    /// An object with a `rules` key is a group; any other object is a rule.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidJson`] for malformed JSON and
    /// [`QueryError::InvalidShape`] when a node is neither a rule nor a group.
    pub fn parse(input: &str) -> QueryResult<QueryNode> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| QueryError::invalid_json(QUERY, &e))?;
        Self::parse_value(&value)
    }

    /// Parses an already deserialized expression tree.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidShape`] when a node is neither a rule nor a group.
    pub fn parse_value(value: &Value) -> QueryResult<QueryNode> {
        parse_node(value, "$")
    }

    /// Parses a serialized array of field descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidJson`] for malformed JSON and
    /// [`QueryError::InvalidShape`] when the input is not an array of
    /// descriptors with a string `name`.
    pub fn parse_fields(input: &str) -> QueryResult<FieldCatalog> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| QueryError::invalid_json(FIELDS, &e))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(QueryError::invalid_shape(
                    FIELDS,
                    "$",
                    format!("expected an array of fields, found {}", kind(&other)),
                ))
            }
        };

        let fields = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value::<FieldDescriptor>(item)
                    .map_err(|e| QueryError::invalid_shape(FIELDS, format!("$[{i}]"), e.to_string()))
            })
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(FieldCatalog::new(fields))
    }
}

fn parse_node(value: &Value, path: &str) -> QueryResult<QueryNode> {
    let Value::Object(object) = value else {
        return Err(QueryError::invalid_shape(
            QUERY,
            path,
            format!("expected a rule or group object, found {}", kind(value)),
        ));
    };

    if object.contains_key("rules") {
        parse_group(object, path).map(QueryNode::Group)
    } else {
        parse_rule(object, path).map(QueryNode::Rule)
    }
}

fn parse_group(object: &Map<String, Value>, path: &str) -> QueryResult<Group> {
    let combinator = match object.get("combinator") {
        None => Combinator::And,
        Some(Value::String(name)) => Combinator::parse(name),
        Some(other) => {
            return Err(QueryError::invalid_shape(
                QUERY,
                format!("{path}.combinator"),
                format!("expected a string, found {}", kind(other)),
            ))
        }
    };

    let Some(Value::Array(children)) = object.get("rules") else {
        return Err(QueryError::invalid_shape(
            QUERY,
            format!("{path}.rules"),
            "expected an array",
        ));
    };

    let rules = children
        .iter()
        .enumerate()
        .map(|(i, child)| parse_node(child, &format!("{path}.rules[{i}]")))
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(Group { combinator, rules })
}

fn parse_rule(object: &Map<String, Value>, path: &str) -> QueryResult<Rule> {
    let field = required_str(object, "field", path)?;
    let operator = required_str(object, "operator", path)?;
    let value = object.get("value").cloned().unwrap_or(Value::Null);

    Ok(Rule {
        field: field.to_string(),
        operator: Operator::parse(operator),
        value,
    })
}

fn required_str<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> QueryResult<&'a str> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(QueryError::invalid_shape(
            QUERY,
            format!("{path}.{key}"),
            format!("expected a string, found {}", kind(other)),
        )),
        None => Err(QueryError::invalid_shape(
            QUERY,
            format!("{path}.{key}"),
            "missing required key",
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
