//! Configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (`--endpoint`, `--mock`)
//! 2. Environment variables (`KNOWLEDGE_ASSISTANT_*`, `.env` honored)
//! 3. Config file (`--config`, else `./knowledge-assistant.yaml` if present)
//! 4. Defaults

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};
use crate::panel::ResultPolicy;
use crate::transport::TransportKind;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
pub const DEFAULT_CONFIG_FILE: &str = "knowledge-assistant.yaml";

pub const ENV_ENDPOINT: &str = "KNOWLEDGE_ASSISTANT_ENDPOINT";
pub const ENV_TRANSPORT: &str = "KNOWLEDGE_ASSISTANT_TRANSPORT";
pub const ENV_MOCK_DELAY_MS: &str = "KNOWLEDGE_ASSISTANT_MOCK_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the backend; `/api/...` paths are joined onto it
    pub endpoint: String,

    pub transport: TransportKind,

    /// What happens to the previous answer when a new question is submitted
    pub result_policy: ResultPolicy,

    pub mock: MockSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    pub delay_ms: u64,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            transport: TransportKind::default(),
            result_policy: ResultPolicy::default(),
            mock: MockSettings::default(),
        }
    }
}

impl AssistantConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(path).map_err(|e| AssistantError::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Merge process environment variables over the current values
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables from an arbitrary lookup (empty values are ignored)
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(transport) = get(ENV_TRANSPORT) {
            self.transport = transport.parse()?;
        }
        if let Some(delay) = get(ENV_MOCK_DELAY_MS) {
            self.mock.delay_ms = delay.trim().parse().map_err(|_| AssistantError::Config {
                reason: format!("{} must be a number of milliseconds, got '{}'", ENV_MOCK_DELAY_MS, delay),
            })?;
        }

        Ok(self)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, endpoint: Option<String>, mock: bool) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if mock {
            self.transport = TransportKind::Mock;
        }
        self
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock.delay_ms)
    }
}
