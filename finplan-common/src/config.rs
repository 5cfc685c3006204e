//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration only: port, database location, logging and the
//! analysis endpoint. Resolution order for every setting:
//! 1. Command-line argument (highest priority, applied by the binary)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file is not an error: a warning is logged and compiled
//! defaults are used.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable overriding the root data folder
pub const ROOT_FOLDER_ENV: &str = "FINPLAN_ROOT_FOLDER";

/// Environment variable holding the analysis endpoint API key
pub const ANALYSIS_API_KEY_ENV: &str = "FINPLAN_ANALYSIS_API_KEY";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "finplan.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path; defaults to `<root_folder>/finplan.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Analysis collaborator endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// URL the normalized request is POSTed to
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,

    /// Bearer token; `FINPLAN_ANALYSIS_API_KEY` takes precedence
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-user analysis requests allowed per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_analysis_endpoint() -> String {
    "http://127.0.0.1:8080/v1/analyze".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_requests_per_minute() -> u32 {
    5
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            port: default_port(),
            logging: LoggingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, falling back to defaults when the file is missing
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => {
                warn!("No config file location available, using compiled defaults");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            warn!("Config file not found: {}, using compiled defaults", path.display());
            return Ok(Self::default());
        }

        info!("Loading config file: {}", path.display());
        Self::load(&path)
    }

    /// API key for the analysis endpoint (environment first, then TOML)
    pub fn analysis_api_key(&self) -> Option<String> {
        std::env::var(ANALYSIS_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.analysis.api_key.clone())
    }
}

/// Platform config file location (`~/.config/finplan/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finplan").join("config.toml"))
}

/// Resolves the root data folder
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_value: config.root_folder.clone(),
        }
    }

    /// CLI → `FINPLAN_ROOT_FOLDER` → TOML → OS default
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("finplan"))
        .unwrap_or_else(|| PathBuf::from("./finplan_data"))
}

/// Database path: explicit TOML setting, otherwise inside the root folder
pub fn database_path(config: &TomlConfig, root_folder: &Path) -> PathBuf {
    config
        .database_path
        .clone()
        .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME))
}
