//! Command implementations for the qq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod explain;
pub mod fields;
pub mod query;
pub mod seed;

use std::env;
use std::io::{self, IsTerminal};

use qq_predicate::{FieldCatalog, QueryError};
use qq_store::schema::{catalog_for, TABLES};
use qq_store::{PaginateError, QueryRunError, StoreError};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query or field catalog was rejected.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Page request was rejected.
    #[error("pagination error: {0}")]
    Paginate(#[from] PaginateError),

    /// Dataset file error.
    #[error("data error: {0}")]
    Store(#[from] StoreError),

    /// Invalid command input.
    #[error("{0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<QueryRunError> for CommandError {
    fn from(e: QueryRunError) -> Self {
        match e {
            QueryRunError::Query(e) => Self::Query(e),
            QueryRunError::Paginate(e) => Self::Paginate(e),
            QueryRunError::UnknownTable { table } => Self::Input(unknown_table_message(&table)),
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Colors are off when `--no-color` is passed, `NO_COLOR` is set, or the
    /// config sets `output.color = false`.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let use_colors = !cli.no_color
            && env::var_os("NO_COLOR").is_none()
            && config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Returns true when prompts can be shown to the user.
    pub fn is_interactive(&self) -> bool {
        !self.json_output && !self.quiet && io::stdin().is_terminal()
    }
}

/// Returns the built-in catalog for `table`, or an input error listing the
/// known tables.
pub(crate) fn builtin_catalog(table: &str) -> Result<FieldCatalog> {
    catalog_for(table).ok_or_else(|| CommandError::Input(unknown_table_message(table)))
}

fn unknown_table_message(table: &str) -> String {
    format!(
        "unknown table '{}'. Known tables: {}",
        table,
        TABLES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_error_lists_tables() {
        let err = builtin_catalog("teams").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown table 'teams'. Known tables: players, games, scores, achievements"
        );
    }

    #[test]
    fn test_builtin_catalog_found() {
        assert!(builtin_catalog("players").is_ok());
    }

    #[test]
    fn test_query_run_error_conversion() {
        let err: CommandError = QueryRunError::UnknownTable {
            table: "x".to_string(),
        }
        .into();
        assert!(matches!(err, CommandError::Input(_)));

        let err: CommandError = QueryRunError::Paginate(PaginateError::InvalidCursor {
            cursor: "c".to_string(),
        })
        .into();
        assert!(matches!(err, CommandError::Paginate(_)));
        assert_eq!(err.to_string(), "pagination error: invalid cursor: c");
    }
}
