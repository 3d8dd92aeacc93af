use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{DataCommand, DataDispatch, OfflineCommand, OfflineDispatch};
use qq_store::DatasetStore;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `--verbose` forces debug output, `--quiet` limits it to errors; otherwise
/// `RUST_LOG` applies, defaulting to warnings.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    if let Some(dispatch) = OfflineDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    if let Some(dispatch) = DataDispatch::from_cli(cli, &config) {
        let store = resolve_store(cli, &config)?;
        tracing::debug!(path = %store.path().display(), "using dataset");
        return dispatch.execute(&ctx, &store).await;
    }

    Ok(())
}

/// Resolves the dataset location with priority: flag > env > config > XDG default.
///
/// `--data` and `QQ_DATA` arrive through the same clap argument.
fn resolve_store(cli: &Cli, config: &Config) -> commands::Result<DatasetStore> {
    if let Some(path) = &cli.data {
        return Ok(DatasetStore::with_path(path.clone()));
    }
    if let Some(path) = &config.data.path {
        return Ok(DatasetStore::with_path(path.clone()));
    }
    Ok(DatasetStore::new()?)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Query(_) => "QUERY_ERROR",
        CommandError::Paginate(_) => "CURSOR_ERROR",
        CommandError::Store(_) => "DATA_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Query(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Paginate(_) => ExitCode::from(2),
        CommandError::Input(_) => ExitCode::from(2),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Store(_) => ExitCode::from(4),
        CommandError::Config(_) => ExitCode::from(5),
    }
}
