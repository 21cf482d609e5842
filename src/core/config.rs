//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Loading runs before the file logger exists (the logger's own settings
//! live here), so loading and resolution collect [`ConfigNote`]s instead of
//! logging. The binary replays them once logging is up.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub chat_path: Option<String>,
    pub domain: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub title: Option<String>,
    pub user_label: Option<String>,
    pub assistant_label: Option<String>,
    pub welcome_heading: Option<String>,
    pub welcome_text: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

/// A message produced while loading or resolving config, to be logged
/// once a logger is installed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNote {
    pub level: Level,
    pub message: String,
}

impl ConfigNote {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warn,
            message: message.into(),
        }
    }
}

/// Result of [`load_config`]: the parsed file plus what happened on the way.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: ParleyConfig,
    pub notes: Vec<ConfigNote>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub domain: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub use crate::inference::providers::DEFAULT_CHAT_PATH;
pub const DEFAULT_LOG_FILE: &str = "parley.log";
pub const DEFAULT_TITLE: &str = "Parley";
pub const DEFAULT_USER_LABEL: &str = "USER";
pub const DEFAULT_ASSISTANT_LABEL: &str = "ASSISTANT";
pub const DEFAULT_WELCOME_HEADING: &str = "Welcome to Parley";

const DEFAULT_WELCOME_TEXT: &str = "Ask a question below and press Enter to send it. \
    Shift+Enter starts a new line. Answers may cite the documents they were drawn from.";

// ============================================================================
// Resolved Config (concrete values, Options only where absence means something)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub chat_path: String,
    pub domain: Option<String>,
    pub timeout: Option<Duration>,
    pub display: DisplaySettings,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    /// Fallbacks taken during resolution.
    pub notes: Vec<ConfigNote>,
}

/// Static presentation settings handed to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub title: String,
    pub user_label: String,
    pub assistant_label: String,
    pub welcome_heading: String,
    pub welcome_text: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            user_label: DEFAULT_USER_LABEL.to_string(),
            assistant_label: DEFAULT_ASSISTANT_LABEL.to_string(),
            welcome_heading: DEFAULT_WELCOME_HEADING.to_string(),
            welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
        }
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

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `explicit` or, if `None`, from `~/.parley/config.toml`.
///
/// A missing default file is generated (commented out) and treated as
/// empty. A missing explicit file is an error. A malformed file returns
/// `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let mut notes = Vec::new();
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => p,
            None => {
                notes.push(ConfigNote::warn(
                    "Could not determine home directory, using default config",
                ));
                return Ok(LoadedConfig {
                    config: ParleyConfig::default(),
                    notes,
                });
            }
        },
    };

    if explicit.is_none() && !path.exists() {
        notes.push(match generate_default_config(&path) {
            Ok(()) => ConfigNote::info(format!(
                "No config file found, generated default at {}",
                path.display()
            )),
            Err(e) => ConfigNote::warn(format!(
                "Failed to write default config to {}: {}",
                path.display(),
                e
            )),
        });
        return Ok(LoadedConfig {
            config: ParleyConfig::default(),
            notes,
        });
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    notes.push(ConfigNote::info(format!(
        "Loaded config from {}",
        path.display()
    )));
    Ok(LoadedConfig { config, notes })
}

pub fn parse_config(contents: &str) -> Result<ParleyConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Parley Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [service]
# base_url = "http://localhost:8000"   # Or PARLEY_BASE_URL / --base-url
# chat_path = "/api/chat"
# domain = "projects"                  # Or PARLEY_DOMAIN / --domain
# timeout_secs = 60                    # Unset = no client-side timeout

# [display]
# title = "Parley"
# user_label = "USER"
# assistant_label = "ASSISTANT"
# welcome_heading = "Welcome to Parley"
# welcome_text = "Ask a question below and press Enter to send it."

# [logging]
# file = "parley.log"
# level = "debug"                      # error, warn, info, debug, trace
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ParleyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &ParleyConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("PARLEY_BASE_URL"))
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Domain: CLI → env → config; blank means "none"
    let domain = cli
        .domain
        .clone()
        .or_else(|| env("PARLEY_DOMAIN"))
        .or_else(|| config.service.domain.clone())
        .filter(|d| !d.trim().is_empty());

    let chat_path = config
        .service
        .chat_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CHAT_PATH.to_string());

    let timeout = config
        .service
        .timeout_secs
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs);

    let mut notes = Vec::new();
    let log_level = match config.logging.level.as_deref() {
        None => LevelFilter::Debug,
        Some(level) => LevelFilter::from_str(level).unwrap_or_else(|_| {
            notes.push(ConfigNote::warn(format!(
                "Unknown log level {level:?}, using debug"
            )));
            LevelFilter::Debug
        }),
    };

    let defaults = DisplaySettings::default();
    let display = DisplaySettings {
        title: config.display.title.clone().unwrap_or(defaults.title),
        user_label: config.display.user_label.clone().unwrap_or(defaults.user_label),
        assistant_label: config
            .display
            .assistant_label
            .clone()
            .unwrap_or(defaults.assistant_label),
        welcome_heading: config
            .display
            .welcome_heading
            .clone()
            .unwrap_or(defaults.welcome_heading),
        welcome_text: config
            .display
            .welcome_text
            .clone()
            .unwrap_or(defaults.welcome_text),
    };

    ResolvedConfig {
        base_url,
        chat_path,
        domain,
        timeout,
        display,
        log_file: PathBuf::from(
            config
                .logging
                .file
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        ),
        log_level,
        notes,
    }
}
