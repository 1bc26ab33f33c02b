//! Client configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{EvPlanError, EvPlanResult};

static DEFAULT_API_BASE: &str = "http://localhost:5000";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Configuration at ~/.config/evplan/config.toml, overridable with
/// `EVPLAN_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base: default_api_base(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn config_dir() -> EvPlanResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| EvPlanError::Config("Could not determine config directory".into()))?
            .join("evplan"))
    }

    pub fn config_path() -> EvPlanResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating a commented config file on
    /// first run.
    pub fn load() -> EvPlanResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) with environment overrides on top.
    pub fn load_from(path: &Path) -> EvPlanResult<Self> {
        let config: ClientConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("EVPLAN").try_parsing(true))
            .build()
            .map_err(|e| EvPlanError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EvPlanError::Config(e.to_string()))?;

        config.base_url()?;
        Ok(config)
    }

    pub fn base_url(&self) -> EvPlanResult<Url> {
        Url::parse(&self.api_base)
            .map_err(|e| EvPlanError::Config(format!("Invalid api_base '{}': {e}", self.api_base)))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EvPlanResult<()> {
        let contents = format!(
            "\
# evplan configuration

# Where the event service lives:
# api_base = \"{}\"

# Give up on a request after this many seconds (no limit by default):
# timeout_secs = 30
",
            DEFAULT_API_BASE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EvPlanError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EvPlanError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
