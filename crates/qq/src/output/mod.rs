//! Output formatting utilities for the qq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules:
//!
//! - [`records`] - Query result pages
//! - [`explain`] - Query explanations
//! - [`helpers`] - Common formatting utilities (truncation, cells, padding)

mod explain;
pub mod helpers;
mod records;

pub use explain::{format_explain_json, format_explain_table};
pub use records::{format_page_footer, format_records_json, format_records_table};
