//! Fields command implementation.
//!
//! Prints a table's built-in field catalog in the JSON form `query --fields`
//! accepts.

use super::{builtin_catalog, CommandContext, Result};

/// Executes the fields command.
///
/// The catalog is printed as JSON in both output modes, since it is meant to
/// be piped back into `--fields`.
///
/// # Errors
///
/// Returns an error if the table has no built-in catalog.
pub fn execute(ctx: &CommandContext, table: &str) -> Result<()> {
    let catalog = builtin_catalog(table)?;
    if !ctx.quiet || ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    }
    Ok(())
}
