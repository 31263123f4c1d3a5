// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.shelf/config.toml` and includes:
//! - `api_url`: base URL of the catalog API
//! - `[sync]`: probe cadence, call timeout and retry backoff
//! - `[storage]`: where the operation queue is kept and how large it may grow

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use shelf_core::DEFAULT_QUOTA_BYTES;

use crate::error::{Error, Result};
use crate::sync::SyncConfig;

const WORK_DIR_NAME: &str = ".shelf";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_DIR_NAME: &str = "store";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Default storage key of the operation queue.
pub const DEFAULT_QUEUE_KEY: &str = "offline_operations";

/// Project configuration stored in `.shelf/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the catalog API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// `[sync]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Seconds between health probes (default: 30).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Upper bound for each remote call in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// First retry delay after a failed pass in milliseconds (default: 1000).
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
    /// Maximum retry delay in seconds (default: 30).
    #[serde(default = "default_retry_max_delay_secs")]
    pub retry_max_delay_secs: u64,
    /// Seconds between network reachability checks in watch mode (default: 5).
    #[serde(default = "default_network_check_interval_secs")]
    pub network_check_interval_secs: u64,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Store directory (relative to the project root or absolute).
    /// Defaults to `.shelf/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Key the queue is stored under (default: "offline_operations").
    #[serde(default = "default_queue_key")]
    pub key: String,
    /// Total store size limit in bytes (default: 5 MiB).
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_probe_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_retry_initial_delay_ms() -> u64 {
    1000
}

fn default_retry_max_delay_secs() -> u64 {
    30
}

fn default_network_check_interval_secs() -> u64 {
    5
}

fn default_queue_key() -> String {
    DEFAULT_QUEUE_KEY.to_string()
}

fn default_quota_bytes() -> u64 {
    DEFAULT_QUOTA_BYTES
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            probe_interval_secs: default_probe_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_secs: default_retry_max_delay_secs(),
            network_check_interval_secs: default_network_check_interval_secs(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            dir: None,
            key: default_queue_key(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            sync: SyncSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

/// Returns true if `url` is an http(s) URL with a host.
pub fn validate_api_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

impl Config {
    /// Creates a config pointing at the given API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidApiUrl`] if the url is not http(s).
    pub fn new(api_url: &str) -> Result<Self> {
        if !validate_api_url(api_url) {
            return Err(Error::InvalidApiUrl(api_url.to_string()));
        }
        Ok(Config {
            api_url: api_url.to_string(),
            ..Config::default()
        })
    }

    /// Loads configuration from the given `.shelf/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if config.storage.key.is_empty() {
            return Err(Error::Config("storage.key cannot be empty".to_string()));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.shelf/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// The API url to use, preferring `override_url` when given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidApiUrl`] if the chosen url is not http(s).
    pub fn api_url_with(&self, override_url: Option<String>) -> Result<String> {
        let url = override_url.unwrap_or_else(|| self.api_url.clone());
        if !validate_api_url(&url) {
            return Err(Error::InvalidApiUrl(url));
        }
        Ok(url)
    }

    /// The API url after applying `SHELF_API_URL`.
    pub fn resolved_api_url(&self) -> Result<String> {
        self.api_url_with(crate::env::api_url())
    }

    /// Timing settings for the sync subsystem.
    pub fn sync_config(&self) -> SyncConfig {
        let s = &self.sync;
        SyncConfig {
            request_timeout: Duration::from_secs(s.request_timeout_secs.max(1)),
            probe_interval: Duration::from_secs(s.probe_interval_secs.max(1)),
            network_check_interval: Duration::from_secs(s.network_check_interval_secs.max(1)),
            initial_delay_ms: s.retry_initial_delay_ms.max(1),
            max_delay_secs: s.retry_max_delay_secs.max(1),
        }
    }
}

/// Find the .shelf directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the store directory from config
pub fn get_store_dir(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.storage.dir {
        Some(dir) => {
            let dir_path = Path::new(dir);
            if dir_path.is_absolute() {
                dir_path.to_path_buf()
            } else {
                // Relative to work_dir's parent (the project root)
                work_dir.parent().unwrap_or(work_dir).join(dir)
            }
        }
        None => work_dir.join(STORE_DIR_NAME),
    }
}

/// Initialize a new .shelf directory at the given path
pub fn init_work_dir(path: &Path, api_url: &str) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = Config::new(api_url)?;
    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    fs::create_dir_all(get_store_dir(&work_dir, &config))?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
