//! Application configuration loaded from a TOML file.
//!
//! Every field has a default, so PanelFM runs without a config file
//! against an agent on `localhost:3001`. Environment variables override
//! the file; see [`Config::with_env_overrides`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Environment variable overriding [`RemoteConfig::base_url`].
pub const ENV_AGENT_URL: &str = "PANELFM_AGENT_URL";
/// Environment variable overriding [`RemoteConfig::api_key`].
pub const ENV_API_KEY: &str = "PANELFM_API_KEY";
/// Environment variable overriding [`RemoteConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "PANELFM_TIMEOUT_SECS";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// [`CoreError::ConfigParse`] if `PANELFM_TIMEOUT_SECS` is not a number.
    pub fn with_env_overrides(self) -> CoreResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CoreResult<Self> {
        if let Some(url) = lookup(ENV_AGENT_URL) {
            self.remote.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.remote.api_key = key;
        }
        if let Some(val) = lookup(ENV_TIMEOUT_SECS) {
            self.remote.timeout_secs = val
                .parse()
                .map_err(|_| CoreError::ConfigParse(format!("{ENV_TIMEOUT_SECS}={val}")))?;
        }
        Ok(self)
    }
}

/// General client preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Ask before deleting; deleting a directory removes its contents too.
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            confirm_delete: true,
        }
    }
}

/// Where the file-management agent lives and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Shared secret sent as `x-api-key`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
