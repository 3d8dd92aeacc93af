//! Cursor-based pagination over a table scan.
//!
//! Records are scanned in insertion order. The cursor is the `_id` of the
//! last record the previous page scanned, so a page may resume in the middle
//! of a run of non-matching records.

use serde::Serialize;
use thiserror::Error;

use crate::Record;

/// Errors that can occur while paginating.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginateError {
    /// The cursor does not name any record in the table.
    #[error("invalid cursor: {cursor}")]
    InvalidCursor {
        /// The cursor that was passed in.
        cursor: String,
    },
}

/// Page request options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationOpts {
    /// Maximum number of matching records to return.
    pub num_items: usize,

    /// Resume after this record id. `None` starts at the beginning.
    pub cursor: Option<String>,

    /// Maximum number of records to read, matching or not.
    pub max_scan: Option<usize>,
}

impl PaginationOpts {
    /// First page of `num_items` records.
    pub fn first(num_items: usize) -> Self {
        Self {
            num_items,
            cursor: None,
            max_scan: None,
        }
    }

    /// Sets the cursor to resume from.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Caps the number of records read for this page.
    pub fn with_max_scan(mut self, max_scan: usize) -> Self {
        self.max_scan = Some(max_scan);
        self
    }
}

/// One page of matching records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<'a> {
    /// Matching records, in insertion order.
    pub page: Vec<&'a Record>,

    /// True when the scan reached the end of the table.
    pub is_done: bool,

    /// Cursor for the next page; `None` once the table is exhausted.
    pub continue_cursor: Option<String>,

    /// Number of records read to build this page.
    pub scanned: usize,
}

/// Scans `records` and returns the next page of those accepted by `filter`.
///
/// # Errors
///
/// Returns [`PaginateError::InvalidCursor`] if `opts.cursor` is not the id of
/// a record in `records`.
pub fn paginate<'a, F>(
    records: &'a [Record],
    filter: F,
    opts: &PaginationOpts,
) -> Result<PaginationResult<'a>, PaginateError>
where
    F: Fn(&Record) -> bool,
{
    let start = match &opts.cursor {
        None => 0,
        Some(cursor) => records
            .iter()
            .position(|r| &r.id == cursor)
            .map(|i| i + 1)
            .ok_or_else(|| PaginateError::InvalidCursor {
                cursor: cursor.clone(),
            })?,
    };

    if opts.num_items == 0 {
        let is_done = start >= records.len();
        return Ok(PaginationResult {
            page: Vec::new(),
            is_done,
            continue_cursor: if is_done { None } else { opts.cursor.clone() },
            scanned: 0,
        });
    }

    let max_scan = opts.max_scan.unwrap_or(usize::MAX);
    let mut page = Vec::new();
    let mut scanned = 0;
    let mut last_scanned: Option<&Record> = None;

    for record in &records[start..] {
        if page.len() >= opts.num_items || scanned >= max_scan {
            break;
        }
        scanned += 1;
        last_scanned = Some(record);
        if filter(record) {
            page.push(record);
        }
    }

    let is_done = start + scanned >= records.len();
    let continue_cursor = if is_done {
        None
    } else {
        last_scanned
            .map(|r| r.id.clone())
            .or_else(|| opts.cursor.clone())
    };

    tracing::debug!(
        start,
        scanned,
        matched = page.len(),
        is_done,
        "paginated table scan"
    );

    Ok(PaginationResult {
        page,
        is_done,
        continue_cursor,
        scanned,
    })
}
