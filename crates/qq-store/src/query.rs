//! Filtered, paginated reads over a dataset table.

use qq_predicate::{compile_with, CompileOptions, FieldCatalog, QueryError, QueryNode, QueryParser};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pagination::{paginate, PaginateError, PaginationOpts, PaginationResult};
use crate::{Dataset, Record};

/// Errors from a filtered query.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryRunError {
    /// The serialized query or field list was rejected.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The page request was invalid.
    #[error(transparent)]
    Paginate(#[from] PaginateError),

    /// The requested table does not exist in the dataset.
    #[error("unknown table: {table}")]
    UnknownTable {
        /// The requested table name.
        table: String,
    },
}

/// Filter arguments as the editor sends them: two JSON strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterArgs {
    /// JSON text of the query tree.
    pub serialized_predicate: String,

    /// JSON text of the field catalog.
    pub serialized_fields: String,
}

impl FilterArgs {
    /// Creates filter arguments from already-serialized JSON strings.
    pub fn from_json(
        serialized_predicate: impl Into<String>,
        serialized_fields: impl Into<String>,
    ) -> Self {
        Self {
            serialized_predicate: serialized_predicate.into(),
            serialized_fields: serialized_fields.into(),
        }
    }

    /// Serializes a query tree and catalog.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if either value fails to serialize.
    pub fn new(tree: &QueryNode, catalog: &FieldCatalog) -> serde_json::Result<Self> {
        Ok(Self {
            serialized_predicate: serde_json::to_string(tree)?,
            serialized_fields: serde_json::to_string(catalog)?,
        })
    }
}

/// Parses the filter arguments, compiles them, and returns one page of the
/// matching records of `table`.
///
/// A table that was never written to is treated as empty only when the
/// dataset has no tables at all; otherwise an unknown name is an error.
///
/// # Errors
///
/// - [`QueryRunError::Query`] if either JSON string is malformed, or if
///   `options.strict` is set and the tree uses an unknown operator or combinator.
/// - [`QueryRunError::UnknownTable`] if the dataset has no such table.
/// - [`QueryRunError::Paginate`] if the cursor is unknown.
pub fn get_filtered_paginated<'a>(
    dataset: &'a Dataset,
    table: &str,
    args: &FilterArgs,
    opts: &PaginationOpts,
    options: CompileOptions,
) -> Result<PaginationResult<'a>, QueryRunError> {
    let tree = QueryParser::parse(&args.serialized_predicate)?;
    let catalog = QueryParser::parse_fields(&args.serialized_fields)?;
    let predicate = compile_with(&tree, &catalog, options)?;

    let records: &[Record] = match dataset.table(table) {
        Some(records) => records,
        None if dataset.tables.is_empty() => &[],
        None => {
            return Err(QueryRunError::UnknownTable {
                table: table.to_string(),
            })
        }
    };

    tracing::debug!(table, query = %tree, records = records.len(), "running filtered query");
    Ok(paginate(records, predicate.as_fn(), opts)?)
}
