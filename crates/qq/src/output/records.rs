//! Record page output formatting.

use owo_colors::OwoColorize;
use qq_predicate::FieldCatalog;
use qq_store::Record;
use serde::Serialize;

use super::helpers::{format_cell, format_value, pad, truncate_id, truncate_str};

/// Widest a value column may grow before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 28;

/// JSON output structure for a query result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutput<'a> {
    pub table: &'a str,
    pub page: &'a [&'a Record],
    pub is_done: bool,
    pub continue_cursor: Option<&'a str>,
}

/// Formats a page of records as JSON.
pub fn format_records_json(
    table: &str,
    records: &[&Record],
    is_done: bool,
    continue_cursor: Option<&str>,
) -> Result<String, serde_json::Error> {
    let output = PageOutput {
        table,
        page: records,
        is_done,
        continue_cursor,
    };
    serde_json::to_string_pretty(&output)
}

/// A table column: the record key and its header text.
struct Column<'a> {
    key: &'a str,
    header: &'a str,
}

/// Picks the columns to show: catalog fields in catalog order, or the record
/// keys in first-seen order when the catalog is empty.
fn columns<'a>(records: &[&'a Record], catalog: &'a FieldCatalog) -> Vec<Column<'a>> {
    if !catalog.is_empty() {
        return catalog
            .fields()
            .iter()
            .map(|f| Column {
                key: &f.name,
                header: f.display_name(),
            })
            .collect();
    }

    let mut columns: Vec<Column<'a>> = Vec::new();
    for record in records {
        for key in record.fields.keys() {
            if !columns.iter().any(|c| c.key == key) {
                columns.push(Column { key, header: key });
            }
        }
    }
    columns
}

/// Formats records as an aligned table.
pub fn format_records_table(
    records: &[&Record],
    catalog: &FieldCatalog,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No matching records.\n".to_string();
    }

    let columns = columns(records, catalog);
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            records
                .iter()
                .map(|r| format_value(r.fields.get(c.key)).chars().count())
                .chain(std::iter::once(c.header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut output = String::new();

    let mut header = format!("{:<8}", "ID");
    for (column, width) in columns.iter().zip(&widths) {
        header.push(' ');
        header.push_str(&format!("{:<width$}", truncate_str(column.header, *width)));
    }
    let header = header.trim_end().to_string();
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for record in records {
        let mut line = format!("{:<8}", truncate_id(&record.id));
        for (column, width) in columns.iter().zip(&widths) {
            let value = record.fields.get(column.key);
            let plain = truncate_str(&format_value(value), *width);
            let cell = if plain.chars().count() < format_value(value).chars().count() {
                // Truncated cells are shown plain.
                plain.clone()
            } else {
                format_cell(value, use_colors)
            };
            line.push(' ');
            line.push_str(&pad(&cell, plain.chars().count(), *width));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Formats the line shown under a table page.
pub fn format_page_footer(
    shown: usize,
    is_done: bool,
    continue_cursor: Option<&str>,
    use_colors: bool,
) -> String {
    let noun = if shown == 1 { "record" } else { "records" };
    match (is_done, continue_cursor) {
        (false, Some(cursor)) => {
            let hint = format!("more available, continue with --cursor {cursor}");
            if use_colors {
                format!("\n{shown} {noun}; {}\n", hint.dimmed())
            } else {
                format!("\n{shown} {noun}; {hint}\n")
            }
        }
        _ => format!("\n{shown} {noun}\n"),
    }
}
