//! Configuration for the prompt backend and local storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PromptdeskError, Result};

/// Origin of the backend REST API when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:1337/api";

const PROJECT_CONFIG: &str = ".promptdesk/config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL the REST paths (`/auth/local`, `/prompts`, ...) are appended to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the key-value storage file lives; platform data dir when unset
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Drop a stored token at startup if the backend rejects it
    #[serde(default)]
    pub verify_stored_token: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            storage_path: None,
            verify_stored_token: false,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PromptdeskError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load with priority:
    /// 1. Explicit path
    /// 2. Project config (./.promptdesk/config.yaml)
    /// 3. User config (<config dir>/promptdesk/config.yaml)
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let project = PathBuf::from(PROJECT_CONFIG);
        if project.exists() {
            return Self::load_from_file(&project);
        }

        if let Some(mut user) = dirs::config_dir() {
            user.push("promptdesk");
            user.push("config.yaml");
            if user.exists() {
                return Self::load_from_file(&user);
            }
        }

        Ok(Self::default())
    }

    /// Apply command-line / environment overrides on top of the file config.
    pub fn with_overrides(mut self, api_url: Option<String>, storage: Option<PathBuf>) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(path) = storage {
            self.storage_path = Some(path);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PromptdeskError::Config(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }
}
