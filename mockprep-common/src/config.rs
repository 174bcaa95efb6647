//! Bootstrap configuration
//!
//! Settings resolve in priority order:
//! 1. Command-line arguments (highest)
//! 2. Environment variables (`MOCKPREP_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! Nothing here changes while the service runs; restart to pick up edits.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DATABASE_FILE_NAME: &str = "mockprep.db";

pub const DATA_FOLDER_ENV: &str = "MOCKPREP_DATA_FOLDER";
pub const PORT_ENV: &str = "MOCKPREP_PORT";
pub const BIND_ADDRESS_ENV: &str = "MOCKPREP_BIND_ADDRESS";
pub const LOG_LEVEL_ENV: &str = "MOCKPREP_LOG_LEVEL";
pub const LLM_API_KEY_ENV: &str = "MOCKPREP_LLM_API_KEY";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub data_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error (or any `EnvFilter` directive)
    pub level: String,
    /// Log to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the platform config file, or defaults when none exists
    ///
    /// A file that exists but fails to parse is an error; a missing file is not.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

/// First existing config file for this platform
///
/// Linux checks `~/.config/mockprep/config.toml`, then
/// `/etc/mockprep/config.toml`. Other platforms use the user config dir only.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mockprep").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mockprep/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("mockprep"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/mockprep"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("mockprep"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/mockprep"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("mockprep"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mockprep"))
    } else {
        PathBuf::from("./mockprep_data")
    }
}

/// Values supplied on the command line
///
/// clap's `env` attribute already folds the environment into these, so the
/// binary passes one struct and `resolve` only falls back to TOML and defaults.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved settings the service starts with
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub data_folder: PathBuf,
    pub bind_address: IpAddr,
    pub port: u16,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
}

impl ServerSettings {
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Result<Self> {
        let data_folder = cli
            .data_folder
            .or(toml.data_folder)
            .unwrap_or_else(default_data_folder);

        let bind_text = cli
            .bind_address
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address: IpAddr = bind_text
            .parse()
            .map_err(|_| Error::Config(format!("Invalid bind address: {}", bind_text)))?;

        let port = cli.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let mut logging = toml.logging;
        if let Some(level) = cli.log_level {
            logging.level = level;
        }

        let mut llm = toml.llm;
        // A missing key is not fatal; the binary warns after logging starts
        llm.api_key = resolve_llm_api_key(llm.api_key.take());
        if llm.requests_per_minute == 0 {
            return Err(Error::Config(
                "llm.requests_per_minute must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            data_folder,
            bind_address,
            port,
            logging,
            llm,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        database_path(&self.data_folder)
    }
}

/// API key from `MOCKPREP_LLM_API_KEY`, then `OPENAI_API_KEY`, then TOML
pub fn resolve_llm_api_key(from_toml: Option<String>) -> Option<String> {
    [LLM_API_KEY_ENV, OPENAI_API_KEY_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .chain(from_toml)
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

pub fn database_path(data_folder: &Path) -> PathBuf {
    data_folder.join(DATABASE_FILE_NAME)
}
