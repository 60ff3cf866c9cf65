use crate::events::collaborators::LimitProvider;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Upper bound for `recent.last_viewed_limit`
pub const MAX_LAST_VIEWED_LIMIT: usize = i32::MAX as usize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub recent: RecentConfig,
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_patient_cache_size")]
    pub patient_cache_size: usize,
    #[serde(default = "default_user_cache_size")]
    pub user_cache_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentConfig {
    /// Maximum number of patients kept per user, 0 disables tracking
    #[serde(default = "default_last_viewed_limit")]
    pub last_viewed_limit: usize,
    /// Capacity of the in-process event bus
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub data_endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_wal_path")]
    pub wal_path: PathBuf,
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_patient_cache_size() -> usize {
    100_000
}

fn default_user_cache_size() -> usize {
    10_000
}

fn default_last_viewed_limit() -> usize {
    50
}

fn default_event_buffer() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

fn default_wal_path() -> PathBuf {
    PathBuf::from("recent-patients.wal")
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            patient_cache_size: default_patient_cache_size(),
            user_cache_size: default_user_cache_size(),
        }
    }
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            last_viewed_limit: default_last_viewed_limit(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            wal_path: default_wal_path(),
        }
    }
}

impl LimitProvider for RecentConfig {
    fn last_viewed_limit(&self) -> usize {
        self.last_viewed_limit
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.memory.patient_cache_size == 0 {
            bail!("patient_cache_size must be greater than 0");
        }

        if self.memory.user_cache_size == 0 {
            bail!("user_cache_size must be greater than 0");
        }

        if self.recent.last_viewed_limit > MAX_LAST_VIEWED_LIMIT {
            bail!(
                "last_viewed_limit must be at most {}, got {}",
                MAX_LAST_VIEWED_LIMIT,
                self.recent.last_viewed_limit
            );
        }

        if self.recent.event_buffer == 0 {
            bail!("event_buffer must be greater than 0");
        }

        if self.sync.data_endpoint.is_empty() {
            bail!("data_endpoint must not be empty");
        }

        if self.sync.api_key.is_empty() {
            bail!("api_key must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        if self.storage.wal_path.as_os_str().is_empty() {
            bail!("wal_path must not be empty");
        }

        Ok(())
    }
}
