//! Seed command implementation.
//!
//! Generates sample players, games, scores and achievements and writes them
//! to the dataset file.

use chrono::{Local, Utc};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use qq_store::{seed_dataset, Dataset, DatasetStore, SeedOptions};
use serde::Serialize;

use super::{CommandContext, CommandError, Result};

/// Options for the seed command.
#[derive(Debug)]
pub struct SeedCommandOptions {
    /// Records per table.
    pub count: usize,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Overwrite an existing dataset without asking.
    pub force: bool,
}

/// Result of deciding whether an existing dataset may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    /// Nothing to overwrite, or overwriting was allowed.
    Proceed,
    /// The user declined.
    Aborted,
}

/// Decides whether to replace an existing dataset file.
fn confirm_overwrite(
    ctx: &CommandContext,
    store: &DatasetStore,
    force: bool,
) -> Result<OverwriteDecision> {
    if force || !store.exists() {
        return Ok(OverwriteDecision::Proceed);
    }

    if !ctx.is_interactive() {
        return Err(CommandError::Input(format!(
            "dataset already exists at {}. Use --force to overwrite",
            store.path().display()
        )));
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "Replace the existing dataset at {}?",
            store.path().display()
        ))
        .default(false)
        .interact()
        .map_err(|e| CommandError::Input(format!("Failed to read confirmation: {}", e)))?;

    Ok(if confirmed {
        OverwriteDecision::Proceed
    } else {
        OverwriteDecision::Aborted
    })
}

/// Executes the seed command.
///
/// # Errors
///
/// Returns an error if a dataset exists and overwriting was not allowed, or
/// if the dataset cannot be written.
pub async fn execute(
    ctx: &CommandContext,
    opts: &SeedCommandOptions,
    store: &DatasetStore,
) -> Result<()> {
    if confirm_overwrite(ctx, store, opts.force)? == OverwriteDecision::Aborted {
        if !ctx.quiet {
            eprintln!("Aborted.");
        }
        return Ok(());
    }

    let options = SeedOptions {
        count: opts.count,
        seed: opts.seed,
        today: Local::now().date_naive(),
        now_millis: Utc::now().timestamp_millis(),
    };

    if ctx.verbose {
        eprintln!("Generating {} records per table...", opts.count);
    }

    let dataset = seed_dataset(&options);
    store.save_async(&dataset).await?;

    if ctx.json_output {
        println!("{}", format_seed_json(&dataset, store)?);
    } else if !ctx.quiet {
        print!("{}", format_seed_table(&dataset, store, ctx.use_colors));
    }

    Ok(())
}

/// Formats the seed summary as JSON.
fn format_seed_json(
    dataset: &Dataset,
    store: &DatasetStore,
) -> std::result::Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct SeedOutput<'a> {
        status: &'static str,
        path: String,
        tables: Vec<TableCount<'a>>,
    }

    #[derive(Serialize)]
    struct TableCount<'a> {
        table: &'a str,
        records: usize,
    }

    let output = SeedOutput {
        status: "success",
        path: store.path().display().to_string(),
        tables: dataset
            .counts()
            .into_iter()
            .map(|(table, records)| TableCount { table, records })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats the seed summary for humans.
fn format_seed_table(dataset: &Dataset, store: &DatasetStore, use_colors: bool) -> String {
    let mut output = String::new();

    let header = "Seeded sample data";
    if use_colors {
        output.push_str(&format!("{}\n", header.green().bold()));
    } else {
        output.push_str(header);
        output.push('\n');
    }
    output.push_str(&format!("  File: {}\n", store.path().display()));

    for (table, records) in dataset.counts() {
        output.push_str(&format!("  {:<14} {}\n", table, records));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn ctx() -> CommandContext {
        CommandContext {
            json_output: true,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    fn dataset() -> Dataset {
        seed_dataset(&SeedOptions {
            count: 3,
            seed: Some(1),
            today: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            now_millis: 0,
        })
    }

    #[test]
    fn test_confirm_overwrite_missing_file_proceeds() {
        let temp_dir = tempdir().unwrap();
        let store = DatasetStore::with_path(temp_dir.path().join("dataset.json"));
        assert_eq!(
            confirm_overwrite(&ctx(), &store, false).unwrap(),
            OverwriteDecision::Proceed
        );
    }

    #[test]
    fn test_confirm_overwrite_existing_file_needs_force() {
        let temp_dir = tempdir().unwrap();
        let store = DatasetStore::with_path(temp_dir.path().join("dataset.json"));
        store.save(&Dataset::new()).unwrap();

        let err = confirm_overwrite(&ctx(), &store, false).unwrap_err();
        assert!(err.to_string().contains("Use --force to overwrite"));
        assert_eq!(
            confirm_overwrite(&ctx(), &store, true).unwrap(),
            OverwriteDecision::Proceed
        );
    }

    #[tokio::test]
    async fn test_execute_writes_dataset() {
        let temp_dir = tempdir().unwrap();
        let store = DatasetStore::with_path(temp_dir.path().join("dataset.json"));
        let opts = SeedCommandOptions {
            count: 4,
            seed: Some(3),
            force: false,
        };

        execute(&ctx(), &opts, &store).await.unwrap();

        let dataset = store.load().unwrap();
        assert_eq!(dataset.table("players").map(<[_]>::len), Some(4));
        assert_eq!(dataset.table("achievements").map(<[_]>::len), Some(4));
    }

    #[test]
    fn test_format_seed_json() {
        let store = DatasetStore::with_path("/tmp/qq/dataset.json".into());
        let json = format_seed_json(&dataset(), &store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["path"], "/tmp/qq/dataset.json");
        assert_eq!(value["tables"].as_array().unwrap().len(), 4);
        assert_eq!(value["tables"][0]["records"], 3);
    }

    #[test]
    fn test_format_seed_table() {
        let store = DatasetStore::with_path("/tmp/qq/dataset.json".into());
        let text = format_seed_table(&dataset(), &store, false);
        assert!(text.starts_with("Seeded sample data\n"));
        assert!(text.contains("  players        3\n"));
    }
}
