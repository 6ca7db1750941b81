//! Bootstrap configuration loading
//!
//! Configuration is resolved in priority order:
//! 1. Command-line argument (applied by each binary after loading)
//! 2. Environment variable (clap `env` fallbacks in each binary)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing TOML file is not fatal: defaults are used and the caller is told
//! via [`ConfigSource`] so it can warn once logging is up. A TOML file that
//! exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level configuration shared by the blog binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Interface the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file holding posts
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Chatbot resources
    #[serde(default)]
    pub chat: ChatConfig,

    /// Posts API behavior
    #[serde(default)]
    pub posts: PostsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the intents file and the trained artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Intents definition file (tags, patterns, responses)
    #[serde(default = "default_intents_path")]
    pub intents_path: PathBuf,

    /// Directory holding words.json, classes.json and chatbot_model.safetensors
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
}

/// Posts API switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostsConfig {
    /// Reject unrecognized `v` query values on update instead of falling
    /// back to version 1. An omitted `v` always means version 1.
    #[serde(default)]
    pub strict_update_version: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("blog.db")
}

fn default_intents_path() -> PathBuf {
    PathBuf::from("data/intents.json")
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            chat: ChatConfig::default(),
            posts: PostsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            intents_path: default_intents_path(),
            artifacts_dir: default_artifacts_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BlogConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from `path`, or from the platform default location
    /// when no path is given. Falls back to compiled defaults if the file
    /// does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok((Self::default(), ConfigSource::Defaults(None))),
            },
        };

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(Some(path))));
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        Ok((config, ConfigSource::File(path)))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this TOML file
    File(PathBuf),
    /// Compiled defaults; carries the path that was looked up, if any
    Defaults(Option<PathBuf>),
}

impl ConfigSource {
    /// True when no config file was found
    pub fn is_defaults(&self) -> bool {
        matches!(self, ConfigSource::Defaults(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults(Some(path)) => {
                write!(f, "compiled defaults ({} not found)", path.display())
            }
            ConfigSource::Defaults(None) => write!(f, "compiled defaults (no config directory)"),
        }
    }
}

/// Default configuration file path: `<config dir>/blog/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("blog").join("config.toml"))
}
