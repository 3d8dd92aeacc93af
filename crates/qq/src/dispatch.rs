//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split into two groups: those that never touch the dataset file
//! (config, completions, fields, explain) and those that need a
//! [`DatasetStore`] (seed, query).

use qq_store::DatasetStore;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::Config;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without the dataset.
pub trait OfflineCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that read or write the dataset.
#[allow(async_fn_in_trait)]
pub trait DataCommand {
    /// Execute the command against the given store.
    async fn execute(&self, ctx: &CommandContext, store: &DatasetStore) -> Result<()>;
}

/// Commands that don't need the dataset.
pub enum OfflineDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Fields {
        table: &'a str,
    },
    Explain {
        query: &'a str,
        fields: &'a Option<String>,
        table: &'a str,
    },
    Help,
}

impl<'a> OfflineDispatch<'a> {
    /// Try to create an offline dispatch from the CLI command.
    /// Returns None if the command needs the dataset.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Fields { table }) => Some(Self::Fields { table }),
            Some(Commands::Explain {
                query,
                fields,
                table,
            }) => Some(Self::Explain {
                query,
                fields,
                table,
            }),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl OfflineCommand for OfflineDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Fields { table } => commands::fields::execute(ctx, table),
            Self::Explain {
                query,
                fields,
                table,
            } => {
                let opts = commands::explain::ExplainOptions {
                    query: query.to_string(),
                    fields: (*fields).clone(),
                    table: table.to_string(),
                };
                commands::explain::execute(ctx, &opts)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("qq - Query Quest");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that need the dataset.
pub enum DataDispatch {
    Seed {
        count: usize,
        seed: Option<u64>,
        force: bool,
    },
    Query(commands::query::QueryOptions),
}

impl DataDispatch {
    /// Create a data dispatch from the CLI command, filling defaults from
    /// the config.
    pub fn from_cli(cli: &Cli, config: &Config) -> Option<Self> {
        match &cli.command {
            Some(Commands::Seed { count, seed, force }) => Some(Self::Seed {
                count: *count,
                seed: *seed,
                force: *force,
            }),
            Some(Commands::Query {
                table,
                query,
                query_file,
                fields,
                fields_file,
                num_items,
                cursor,
                all,
                strict,
            }) => Some(Self::Query(commands::query::QueryOptions {
                table: table.clone(),
                query: query.clone(),
                query_file: query_file.clone(),
                fields: fields.clone(),
                fields_file: fields_file.clone(),
                num_items: num_items.unwrap_or_else(|| config.page_size()),
                cursor: cursor.clone(),
                all: *all,
                strict: *strict || config.strict(),
            })),
            _ => None,
        }
    }
}

impl DataCommand for DataDispatch {
    async fn execute(&self, ctx: &CommandContext, store: &DatasetStore) -> Result<()> {
        match self {
            Self::Seed { count, seed, force } => {
                let opts = commands::seed::SeedCommandOptions {
                    count: *count,
                    seed: *seed,
                    force: *force,
                };
                commands::seed::execute(ctx, &opts, store).await
            }
            Self::Query(opts) => commands::query::execute(ctx, opts, store).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_offline_commands() {
        for args in [
            vec!["qq", "config", "path"],
            vec!["qq", "completions", "bash"],
            vec!["qq", "fields"],
            vec!["qq", "explain", "--query", "{}"],
            vec!["qq"],
        ] {
            let cli = Cli::parse_from(&args);
            assert!(OfflineDispatch::try_from_cli(&cli).is_some(), "{args:?}");
            assert!(DataDispatch::from_cli(&cli, &Config::default()).is_none(), "{args:?}");
        }
    }

    #[test]
    fn test_data_commands() {
        for args in [vec!["qq", "seed"], vec!["qq", "query"]] {
            let cli = Cli::parse_from(&args);
            assert!(OfflineDispatch::try_from_cli(&cli).is_none(), "{args:?}");
            assert!(DataDispatch::from_cli(&cli, &Config::default()).is_some(), "{args:?}");
        }
    }

    #[test]
    fn test_query_defaults_come_from_config() {
        let mut config = Config::default();
        config.query.page_size = Some(9);
        config.query.strict = Some(true);

        let cli = Cli::parse_from(["qq", "query"]);
        match DataDispatch::from_cli(&cli, &config) {
            Some(DataDispatch::Query(opts)) => {
                assert_eq!(opts.num_items, 9);
                assert!(opts.strict);
            }
            _ => panic!("Expected Query dispatch"),
        }

        let cli = Cli::parse_from(["qq", "query", "-n", "3"]);
        match DataDispatch::from_cli(&cli, &Config::default()) {
            Some(DataDispatch::Query(opts)) => {
                assert_eq!(opts.num_items, 3);
                assert!(!opts.strict);
            }
            _ => panic!("Expected Query dispatch"),
        }
    }

    #[test]
    fn test_query_default_page_size() {
        let cli = Cli::parse_from(["qq", "query"]);
        match DataDispatch::from_cli(&cli, &Config::default()) {
            Some(DataDispatch::Query(opts)) => assert_eq!(opts.num_items, 51),
            _ => panic!("Expected Query dispatch"),
        }
    }
}
