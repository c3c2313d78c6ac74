//! Checkout configuration: base URL, credentials, timeouts, and address mappings.
//!
//! Configuration is read from YAML or JSON (chosen by file extension). String values may
//! reference environment variables as `${env:NAME}`; references are resolved at load time and
//! a missing variable is an error. `CARTFLOW_BASE_URL` and `CARTFLOW_API_TOKEN` override the
//! file when set, so a file may leave `base_url` out and rely on the environment; call
//! [`CheckoutConfig::validate`] once every override has been applied.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use cartflow_api::validate_base_url;
use cartflow_util::expand_tilde;
use dirs_next::config_dir;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::address::AddressMappings;

pub const CONFIG_PATH_ENV: &str = "CARTFLOW_CONFIG_PATH";
pub const BASE_URL_ENV: &str = "CARTFLOW_BASE_URL";
pub const API_TOKEN_ENV: &str = "CARTFLOW_API_TOKEN";

/// Client timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{env:([A-Za-z0-9_]+)\}").expect("env reference pattern"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format for {} (expected .yaml, .yml or .json)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,

    #[error("environment variable '{name}' referenced in config is not set")]
    MissingEnvVar { name: String },
}

/// File formats understood by [`CheckoutConfig::from_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    /// Base URL every cart endpoint is appended to.
    #[serde(default)]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra address value mappings, merged over the built-in table.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub address_mappings: AddressMappings,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for CheckoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("address_mappings", &self.address_mappings)
            .finish()
    }
}

impl CheckoutConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            address_mappings: AddressMappings::new(),
        }
    }

    /// Read and interpolate a configuration file. Validation is left to the caller.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&content, format).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.interpolate()?;
        debug!(path = %path.display(), base_url = %config.base_url, "loaded checkout config");
        Ok(config)
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|error| error.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|error| error.to_string()),
        }
    }

    /// Resolve `${env:NAME}` references in every string value.
    pub fn interpolate(&mut self) -> Result<(), ConfigError> {
        self.base_url = interpolate_string(&self.base_url)?;
        if let Some(token) = &mut self.api_token {
            *token = interpolate_string(token)?;
        }
        for code in self.address_mappings.values_mut().flat_map(|values| values.values_mut()) {
            *code = interpolate_string(code)?;
        }
        Ok(())
    }

    /// Apply non-empty `CARTFLOW_BASE_URL` and `CARTFLOW_API_TOKEN` values.
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = non_empty_env(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.base_url).map_err(|error| ConfigError::InvalidBaseUrl(error.to_string()))?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Config file location: `CARTFLOW_CONFIG_PATH`, else `<config dir>/cartflow/config.yaml`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cartflow")
        .join("config.yaml")
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn interpolate_string(value: &str) -> Result<String, ConfigError> {
    let mut resolved = Vec::new();
    for captures in ENV_REFERENCE.captures_iter(value) {
        let name = captures[1].to_string();
        let env_value = env::var(&name).map_err(|_| ConfigError::MissingEnvVar { name: name.clone() })?;
        debug!("Interpolated env var: {} -> [REDACTED]", name);
        resolved.push((captures[0].to_string(), env_value));
    }

    let mut result = value.to_string();
    for (placeholder, env_value) in resolved {
        result = result.replace(&placeholder, &env_value);
    }
    Ok(result)
}
