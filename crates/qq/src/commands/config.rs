//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/qq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Page size used when neither the flag nor the config sets one.
pub const DEFAULT_PAGE_SIZE: usize = 51;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            query: QueryConfig::default(),
            output: OutputConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Page size from config, or [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> usize {
        self.query.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Whether strict compilation is enabled by default.
    pub fn strict(&self) -> bool {
        self.query.strict.unwrap_or(false)
    }
}

/// Query configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Reject unknown operators and combinators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Default number of records per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Dataset configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/qq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("QQ_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("qq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("qq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("QQ_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema. Later versions add their steps here,
    // one `if config.version < N` block per bump.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    tracing::debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[query]");
        println!("  strict: {}", config.strict());
        println!("  page_size: {}", config.page_size());

        println!("\n[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        println!("\n[data]");
        if let Some(ref data_path) = config.data.path {
            println!("  path: {}", data_path.display());
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies a `section.field = value` assignment to `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "query.strict" => {
            config.query.strict = Some(parse_bool(value)?);
        }
        "query.page_size" => {
            let size: usize = value.parse().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid page_size value '{}'. Use a positive integer",
                    value
                ))
            })?;
            if size == 0 {
                return Err(CommandError::Config(
                    "Invalid page_size value '0'. Use a positive integer".to_string(),
                ));
            }
            config.query.page_size = Some(size);
        }
        "output.color" => {
            config.output.color = Some(parse_bool(value)?);
        }
        "data.path" => {
            config.data.path = Some(PathBuf::from(value));
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: query.strict, query.page_size, output.color, data.path",
                key
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
