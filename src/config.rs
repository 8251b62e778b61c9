use crate::constants::{
    DEFAULT_RESOLVE_TIMEOUT_SECONDS, DEFAULT_STORE_ANON_KEY, DEFAULT_STORE_URL,
    DEFAULT_VODS_TABLE,
};
use crate::error::{Result, VodError};
use serde::Deserialize;
use std::path::Path;
use std::{env, fs};

/// Connection settings for the metadata store. Read-only after load; the
/// resolver never mutates it, so concurrent calls can share one copy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Public read-only credential, sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Metadata table name.
    pub table: String,
    /// Bound on exact-lookup requests.
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            api_key: DEFAULT_STORE_ANON_KEY.to_string(),
            table: DEFAULT_VODS_TABLE.to_string(),
            timeout_seconds: DEFAULT_RESOLVE_TIMEOUT_SECONDS,
        }
    }
}

impl StoreConfig {
    /// Loads configuration with the usual precedence: built-in defaults,
    /// then `config.toml` if present, then `VOD_STORE_*` environment
    /// variables.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                VodError::Config(format!("failed to read config file '{}': {}", path, e))
            })?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();

        if config.base_url.trim().is_empty() {
            return Err(VodError::Config("store base URL is empty".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(VodError::Config("store API key is empty".to_string()));
        }

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var("VOD_STORE_URL") {
            self.base_url = value;
        }
        if let Ok(value) = env::var("VOD_STORE_KEY") {
            self.api_key = value;
        }
        if let Ok(value) = env::var("VOD_STORE_TABLE") {
            self.table = value;
        }
        if let Ok(value) = env::var("VOD_STORE_TIMEOUT_SECONDS") {
            match value.parse() {
                Ok(seconds) => self.timeout_seconds = seconds,
                Err(_) => tracing::warn!("ignoring non-numeric VOD_STORE_TIMEOUT_SECONDS"),
            }
        }
    }

    /// Full REST endpoint for the metadata table.
    pub fn rest_endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}
