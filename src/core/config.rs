//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sf/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use nix::unistd::{Uid, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SfConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub programs: Vec<ProgramEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub terminal: Option<String>,
    pub terminal_args: Option<Vec<String>>,
    pub editor: Option<String>,
}

/// User-defined program rule, checked before the built-in table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProgramEntry {
    pub extensions: Vec<String>,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub needs_terminal: bool,
}

// ============================================================================
// Defaults
// ============================================================================

pub const PROG_NAME: &str = "sf";
pub const DEFAULT_TERMINAL: &str = "xterm";
pub const DEFAULT_TERMINAL_ARGS: &[&str] = &["-e"];
pub const DEFAULT_EDITOR: &str = "vim";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub terminal: String,
    pub terminal_args: Vec<String>,
    pub editor: String,
    pub programs: Vec<ProgramEntry>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&SfConfig::default(), None, |_| None)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Per-user log file in the system temp dir, e.g. `/tmp/alice-sf.log`.
pub fn default_log_path() -> PathBuf {
    let uid = Uid::current();
    let account = match User::from_uid(uid) {
        Ok(user) => user.map(|u| u.name),
        Err(e) => {
            warn!("Account lookup for uid {} failed: {}", uid, e);
            None
        }
    };
    let user = log_user(account, uid, |key| std::env::var(key).ok());
    std::env::temp_dir().join(format!("{user}-{PROG_NAME}.log"))
}

/// Account name, then `USER`, then `LOGNAME`, then the numeric uid.
fn log_user(account: Option<String>, uid: Uid, env: impl Fn(&str) -> Option<String>) -> String {
    account
        .or_else(|| env("USER"))
        .or_else(|| env("LOGNAME"))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| uid.to_string())
}

/// Returns the path to `~/.sf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sf").join("config.toml"))
}

/// Load config from `~/.sf/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SfConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SfConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SfConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SfConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<SfConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SfConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# sf Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# terminal = "xterm"                 # Or set SF_TERMINAL, or pass --terminal
# terminal_args = ["-e"]             # Arguments placed before the wrapped program
# editor = "vim"                     # Or set SF_EDITOR; opens text and unknown plain files

# Extra rules are checked before the built-in extension table.
# [[programs]]
# extensions = ["pdf", "epub"]
# program = "zathura"
# args = []
# needs_terminal = false

# [[programs]]
# extensions = ["csv"]
# program = "visidata"
# needs_terminal = true
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_terminal` is from the `--terminal` flag (None = not specified).
pub fn resolve(config: &SfConfig, cli_terminal: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_terminal, |key| std::env::var(key).ok())
}

/// Same as `resolve`, with environment lookups supplied by the caller.
pub fn resolve_with(
    config: &SfConfig,
    cli_terminal: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Terminal: CLI → env → config → default
    let terminal = cli_terminal
        .map(|s| s.to_string())
        .or_else(|| env("SF_TERMINAL"))
        .or_else(|| config.general.terminal.clone())
        .unwrap_or_else(|| DEFAULT_TERMINAL.to_string());

    let terminal_args = config
        .general
        .terminal_args
        .clone()
        .unwrap_or_else(|| DEFAULT_TERMINAL_ARGS.iter().map(|s| s.to_string()).collect());

    // Editor: env → config → default
    let editor = env("SF_EDITOR")
        .or_else(|| config.general.editor.clone())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

    ResolvedConfig {
        terminal,
        terminal_args,
        editor,
        programs: config.programs.clone(),
    }
}
