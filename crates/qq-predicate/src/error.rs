//! Error types for query parsing and compilation.

use thiserror::Error;

/// A specialized Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while parsing or compiling a query.
///
/// Only structural problems are errors. Unknown fields, unparseable numbers and
/// empty groups all compile to well-defined predicates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The serialized input is not valid JSON.
    #[error("invalid {input} JSON: {message}")]
    InvalidJson {
        /// Which input failed ("query" or "fields").
        input: &'static str,
        /// The parser's description of the problem.
        message: String,
    },

    /// The JSON is valid but a node does not have the expected shape.
    #[error("invalid {input} at {path}: {message}")]
    InvalidShape {
        /// Which input failed ("query" or "fields").
        input: &'static str,
        /// JSON path of the offending node, e.g. `$.rules[2].field`.
        path: String,
        /// What was expected.
        message: String,
    },

    /// An operator outside the supported set was used with strict compilation.
    #[error("unknown operator: {operator}")]
    UnknownOperator {
        /// The unrecognized operator.
        operator: String,
    },

    /// A combinator other than `and`/`or` was used with strict compilation.
    #[error("unknown combinator: {combinator}")]
    UnknownCombinator {
        /// The unrecognized combinator.
        combinator: String,
    },
}

impl QueryError {
    /// Creates an invalid JSON error for the given input.
    pub fn invalid_json(input: &'static str, source: &serde_json::Error) -> Self {
        QueryError::InvalidJson {
            input,
            message: source.to_string(),
        }
    }

    /// Creates an invalid shape error.
    pub fn invalid_shape(
        input: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        QueryError::InvalidShape {
            input,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        QueryError::UnknownOperator {
            operator: operator.into(),
        }
    }

    /// Creates an unknown combinator error.
    pub fn unknown_combinator(combinator: impl Into<String>) -> Self {
        QueryError::UnknownCombinator {
            combinator: combinator.into(),
        }
    }
}
