//! Configuration loading and database path resolution
//!
//! Bootstrap settings come from a TOML file. Values given on the command
//! line (or their environment fallbacks) override the file, and compiled
//! defaults fill whatever is left.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PMDASH_CONFIG";

/// Values given on the command line, each replacing the file value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub classifier_endpoint: Option<String>,
}

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Connection settings for the external KPI classification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// URL the KPI snapshot is POSTed to
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Per-request HTTP timeout
    #[serde(default = "default_classifier_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on one classification call as seen by the orchestrator.
    /// Falls back to `timeout_ms` when unset.
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

impl ClassifierConfig {
    pub fn effective_max_wait_ms(&self) -> u64 {
        self.max_wait_ms.unwrap_or(self.timeout_ms)
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:8000".to_string(),
        "http://127.0.0.1:8000".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_classifier_endpoint() -> String {
    "http://127.0.0.1:11435/classify".to_string()
}

fn default_classifier_timeout_ms() -> u64 {
    30_000
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            timeout_ms: default_classifier_timeout_ms(),
            max_wait_ms: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            bind_address: default_bind_address(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            logging: LoggingConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// Priority for the file location:
    /// 1. Explicit path (command line)
    /// 2. `PMDASH_CONFIG` environment variable
    /// 3. `<config_dir>/pmdash/config.toml`
    ///
    /// A missing file is not fatal; a file that exists but does not parse is.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match locate_config(explicit) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and validate the merged result
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(database_path) = overrides.database_path {
            self.database_path = Some(database_path);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(endpoint) = overrides.classifier_endpoint {
            self.classifier.endpoint = endpoint;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.classifier.endpoint.trim().is_empty() {
            return Err(Error::Config("classifier.endpoint must not be empty".to_string()));
        }
        if self.classifier.timeout_ms == 0 {
            return Err(Error::Config("classifier.timeout_ms must be positive".to_string()));
        }
        if self.classifier.max_wait_ms == Some(0) {
            return Err(Error::Config("classifier.max_wait_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Database path with the compiled default applied
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Config file location that `load_or_default` would use
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var(CONFIG_ENV_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path),
    }
}

/// Default configuration file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pmdash").join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("pmdash"))
        .unwrap_or_else(|| PathBuf::from("./pmdash_data"))
        .join("pmdash.db")
}
