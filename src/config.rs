//! Client configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DraftsError, Result};

const CONFIG_FILE: &str = "drafts_config.json";
const CONFIG_DIR_NAME: &str = "cloud-drafts";

pub const DEFAULT_API_BASE_URL: &str = "https://gitkraken.dev/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "Cloud-Drafts-Client";

const ENV_API_URL: &str = "CLOUD_DRAFTS_API_URL";
const ENV_TOKEN: &str = "CLOUD_DRAFTS_TOKEN";
const ENV_TIMEOUT: &str = "CLOUD_DRAFTS_TIMEOUT_SECS";

/// Connection settings for the drafts API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftsConfig {
    /// Base URL the versioned API paths are appended to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token of an already-authenticated session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Per-request timeout, applied to API calls and secure transfers
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            request_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl DraftsConfig {
    /// Configuration pointing at `api_base_url` with the given token
    pub fn new(api_base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            access_token,
            ..Self::default()
        }
    }

    /// Default configuration directory for this client
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Load configuration from disk. A missing file yields the defaults.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)?;

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(config_dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Load from the default directory, then apply environment overrides
    pub fn from_env() -> Result<Self> {
        let config = match Self::default_dir() {
            Some(dir) => Self::load(&dir)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }

        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                DraftsError::Configuration(format!("{} must be a number of seconds", ENV_TIMEOUT))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that the base URL is absolute and the timeout is non-zero
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base_url).map_err(|e| {
            DraftsError::Configuration(format!("Invalid API URL {}: {}", self.api_base_url, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(DraftsError::Configuration(format!(
                "API URL {} cannot be used as a base",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(DraftsError::Configuration(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
