//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the qq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// qq - Query Quest, filter local game data with query-builder JSON
#[derive(Parser, Debug)]
#[command(name = "qq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Dataset file (default: from config, then the XDG data directory)
    #[arg(long, global = true, env = "QQ_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate sample players, games, scores and achievements
    Seed {
        /// Records per table
        #[arg(long, default_value = "50")]
        count: usize,

        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// Overwrite an existing dataset without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Run a filtered, paginated query
    #[command(alias = "q")]
    Query {
        /// Table to scan
        #[arg(short, long, default_value = "players")]
        table: String,

        /// Query tree as JSON (default: match everything)
        #[arg(long, conflicts_with = "query_file")]
        query: Option<String>,

        /// Read the query tree from a file
        #[arg(long)]
        query_file: Option<PathBuf>,

        /// Field catalog as JSON (default: the table's built-in fields)
        #[arg(long, conflicts_with = "fields_file")]
        fields: Option<String>,

        /// Read the field catalog from a file
        #[arg(long)]
        fields_file: Option<PathBuf>,

        /// Page size (default: from config, or 51)
        #[arg(short = 'n', long)]
        num_items: Option<usize>,

        /// Resume after this record id
        #[arg(long, conflicts_with = "all")]
        cursor: Option<String>,

        /// Fetch every page
        #[arg(long)]
        all: bool,

        /// Reject unknown operators and combinators
        #[arg(long)]
        strict: bool,
    },

    /// Show how a query is interpreted
    Explain {
        /// Query tree as JSON
        #[arg(long)]
        query: String,

        /// Field catalog as JSON (default: the table's built-in fields)
        #[arg(long)]
        fields: Option<String>,

        /// Table whose built-in fields to use
        #[arg(short, long, default_value = "players")]
        table: String,
    },

    /// Print a table's built-in field catalog as JSON
    Fields {
        /// Table name
        #[arg(short, long, default_value = "players")]
        table: String,
    },

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shells for completion generation
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["qq", "--verbose", "fields"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["qq", "--quiet", "--json", "fields"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["qq", "-v", "-q", "fields"]).is_err());
    }

    #[test]
    fn test_data_flag() {
        let cli = Cli::parse_from(["qq", "--data", "/tmp/d.json", "query"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/d.json")));
    }

    #[test]
    fn test_query_defaults() {
        let cli = Cli::parse_from(["qq", "query"]);
        match cli.command {
            Some(Commands::Query {
                table,
                query,
                num_items,
                cursor,
                all,
                strict,
                ..
            }) => {
                assert_eq!(table, "players");
                assert!(query.is_none());
                assert!(num_items.is_none());
                assert!(cursor.is_none());
                assert!(!all);
                assert!(!strict);
            }
            other => panic!("Expected Query command, got {other:?}"),
        }
    }

    #[test]
    fn test_query_alias_and_options() {
        let cli = Cli::parse_from([
            "qq",
            "q",
            "--table",
            "games",
            "--query",
            "{}",
            "-n",
            "10",
            "--strict",
        ]);
        match cli.command {
            Some(Commands::Query {
                table,
                query,
                num_items,
                strict,
                ..
            }) => {
                assert_eq!(table, "games");
                assert_eq!(query.as_deref(), Some("{}"));
                assert_eq!(num_items, Some(10));
                assert!(strict);
            }
            other => panic!("Expected Query command, got {other:?}"),
        }
    }

    #[test]
    fn test_query_and_query_file_conflict() {
        assert!(
            Cli::try_parse_from(["qq", "query", "--query", "{}", "--query-file", "q.json"])
                .is_err()
        );
    }

    #[test]
    fn test_cursor_conflicts_with_all() {
        assert!(Cli::try_parse_from(["qq", "query", "--cursor", "abc", "--all"]).is_err());
    }

    #[test]
    fn test_seed_options() {
        let cli = Cli::parse_from(["qq", "seed", "--count", "5", "--seed", "9", "--force"]);
        match cli.command {
            Some(Commands::Seed { count, seed, force }) => {
                assert_eq!(count, 5);
                assert_eq!(seed, Some(9));
                assert!(force);
            }
            other => panic!("Expected Seed command, got {other:?}"),
        }
    }

    #[test]
    fn test_explain_requires_query() {
        assert!(Cli::try_parse_from(["qq", "explain"]).is_err());
        assert!(Cli::try_parse_from(["qq", "explain", "--query", "{}"]).is_ok());
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["qq", "config", "set", "query.page_size", "20"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "query.page_size");
            assert_eq!(value, "20");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["qq", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
