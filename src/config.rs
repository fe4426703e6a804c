//! Application configuration and provider composition
//!
//! Settings come from an optional JSON file, then environment variables:
//! - `LOAN_SIM_PROVIDER`     `local` or `remote`
//! - `LOAN_SIM_API_URL`      base URL of the remote API
//! - `LOAN_SIM_TIMEOUT_SECS` remote request timeout
//! - `LOAN_SIM_CATALOG`      product catalog CSV path

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::loader::DEFAULT_CATALOG_PATH;
use crate::simulation::{
    LocalSimulationEngine, ProviderError, RateConvention, RemoteConfig, RemoteSimulationProvider,
    SimulationEngine, SimulationProvider,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Where simulations are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Local,
    Remote,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "mock" => Ok(ProviderKind::Local),
            "remote" | "api" => Ok(ProviderKind::Remote),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderKind,

    /// API root used by the remote provider
    pub api_base_url: String,

    /// Remote request timeout in seconds
    pub timeout_secs: u64,

    /// Monthly rate derivation for the local engine
    pub rate_convention: RateConvention,

    /// Product catalog CSV
    pub catalog_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local,
            api_base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 10,
            rate_convention: RateConvention::Nominal,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Defaults (or `path`, when given) overlaid with environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in [`AppConfig::load`])
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("LOAN_SIM_PROVIDER") {
            self.provider = value.parse().map_err(|value| ConfigError::InvalidEnv {
                name: "LOAN_SIM_PROVIDER",
                value,
            })?;
        }
        if let Some(value) = lookup("LOAN_SIM_API_URL") {
            self.api_base_url = value;
        }
        if let Some(value) = lookup("LOAN_SIM_TIMEOUT_SECS") {
            self.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "LOAN_SIM_TIMEOUT_SECS",
                value,
            })?;
        }
        if let Some(value) = lookup("LOAN_SIM_CATALOG") {
            self.catalog_path = PathBuf::from(value);
        }
        Ok(())
    }

    /// Client for the remote API at `api_base_url`, whatever the selected provider
    pub fn remote_client(&self) -> Result<RemoteSimulationProvider, ProviderError> {
        RemoteSimulationProvider::new(RemoteConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Build the provider this configuration selects
    pub fn build_provider(&self) -> Result<Box<dyn SimulationProvider>, ProviderError> {
        let provider: Box<dyn SimulationProvider> = match self.provider {
            ProviderKind::Local => Box::new(LocalSimulationEngine::new(SimulationEngine::new(
                self.rate_convention,
            ))),
            ProviderKind::Remote => Box::new(self.remote_client()?),
        };
        info!("Selected {} simulation provider", provider.name());
        Ok(provider)
    }
}
