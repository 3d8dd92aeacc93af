//! Query command implementation.
//!
//! Runs a serialized query tree against one table of the local dataset and
//! prints one page, or every page with `--all`.

use std::fs;
use std::path::{Path, PathBuf};

use qq_predicate::{CompileOptions, FieldCatalog, QueryParser};
use qq_store::schema::catalog_for;
use qq_store::{
    get_filtered_paginated, Dataset, DatasetStore, FilterArgs, PaginationOpts, Record,
};

use super::{CommandContext, CommandError, Result};
use crate::output::{format_page_footer, format_records_json, format_records_table};

/// Query used when none is given: an empty AND group, which matches everything.
pub const MATCH_ALL_QUERY: &str = r#"{"combinator":"and","rules":[]}"#;

/// Options for the query command.
#[derive(Debug, Default)]
pub struct QueryOptions {
    /// Table to scan.
    pub table: String,
    /// Inline query JSON.
    pub query: Option<String>,
    /// File holding the query JSON.
    pub query_file: Option<PathBuf>,
    /// Inline field catalog JSON.
    pub fields: Option<String>,
    /// File holding the field catalog JSON.
    pub fields_file: Option<PathBuf>,
    /// Page size.
    pub num_items: usize,
    /// Resume after this record id.
    pub cursor: Option<String>,
    /// Fetch every page.
    pub all: bool,
    /// Strict compilation.
    pub strict: bool,
}

/// Records gathered by a query run, plus where the scan stopped.
#[derive(Debug)]
pub struct QueryOutcome<'a> {
    pub records: Vec<&'a Record>,
    pub is_done: bool,
    pub continue_cursor: Option<String>,
}

fn read_input(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        CommandError::Input(format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

/// Resolves the query and field strings from the options.
///
/// Without explicit fields, the table's built-in catalog is used; tables
/// outside the built-in schema get an empty catalog, so every field is text.
pub fn resolve_filter_args(opts: &QueryOptions) -> Result<FilterArgs> {
    let query = match (&opts.query, &opts.query_file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => read_input(path, "query")?,
        (None, None) => MATCH_ALL_QUERY.to_string(),
    };

    let fields = match (&opts.fields, &opts.fields_file) {
        (Some(fields), _) => fields.clone(),
        (None, Some(path)) => read_input(path, "fields")?,
        (None, None) => {
            let catalog = catalog_for(&opts.table).unwrap_or_default();
            serde_json::to_string(&catalog)?
        }
    };

    Ok(FilterArgs::from_json(query, fields))
}

/// Runs the query against `dataset`, following cursors when `opts.all` is set.
pub fn run_query<'a>(
    dataset: &'a Dataset,
    args: &FilterArgs,
    opts: &QueryOptions,
) -> Result<QueryOutcome<'a>> {
    let options = CompileOptions {
        strict: opts.strict,
    };
    let mut page_opts = PaginationOpts {
        num_items: opts.num_items,
        cursor: opts.cursor.clone(),
        max_scan: None,
    };

    let mut records = Vec::new();
    loop {
        let result = get_filtered_paginated(dataset, &opts.table, args, &page_opts, options)?;
        records.extend(result.page);

        if !opts.all || result.is_done || opts.num_items == 0 {
            return Ok(QueryOutcome {
                records,
                is_done: result.is_done,
                continue_cursor: result.continue_cursor,
            });
        }

        tracing::debug!(cursor = ?result.continue_cursor, "fetching next page");
        page_opts.cursor = result.continue_cursor;
    }
}

/// Executes the query command.
///
/// # Errors
///
/// Returns an error if the query or catalog is invalid, the cursor is
/// unknown, the table does not exist, or the dataset cannot be read.
pub async fn execute(
    ctx: &CommandContext,
    opts: &QueryOptions,
    store: &DatasetStore,
) -> Result<()> {
    let args = resolve_filter_args(opts)?;
    let dataset = store.load_or_default_async().await?;

    if dataset.is_empty() && ctx.verbose {
        eprintln!(
            "Dataset at {} is empty. Run 'qq seed' to generate sample data.",
            store.path().display()
        );
    }

    let outcome = run_query(&dataset, &args, opts)?;

    if ctx.json_output {
        let output = format_records_json(
            &opts.table,
            &outcome.records,
            outcome.is_done,
            outcome.continue_cursor.as_deref(),
        )?;
        println!("{output}");
    } else if !ctx.quiet {
        let catalog: FieldCatalog = QueryParser::parse_fields(&args.serialized_fields)?;
        print!(
            "{}",
            format_records_table(&outcome.records, &catalog, ctx.use_colors)
        );
        print!(
            "{}",
            format_page_footer(
                outcome.records.len(),
                outcome.is_done,
                outcome.continue_cursor.as_deref(),
                ctx.use_colors,
            )
        );
    }

    Ok(())
}
