use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::tracker::linear::DEFAULT_ENDPOINT;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 900;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub linear: LinearConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LinearConfig {
    /// Used when a request carries no key of its own.
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
        }
    }
}

/// Where the snapshot fields sit in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    #[default]
    TopLevel,
    MergeVariables,
}

#[derive(Debug, Deserialize)]
pub struct ResponseConfig {
    #[serde(default)]
    pub shape: ResponseShape,
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            shape: ResponseShape::default(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_cache_max_age() -> u64 {
    DEFAULT_CACHE_MAX_AGE_SECS
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CYCLEBOARD_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cycleboard")
        .join("config.toml")
}

/// Loads the config file (if any) and applies environment overrides.
pub fn load_config() -> Result<AppConfig> {
    let mut config = load_config_from(&config_path())?;
    config.apply_overrides(
        std::env::var("LINEAR_API_KEY").ok(),
        std::env::var("CYCLEBOARD_BIND").ok(),
    );
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

impl AppConfig {
    pub fn apply_overrides(&mut self, api_key: Option<String>, bind: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.linear.api_key = Some(key);
        }
        if let Some(bind) = bind.filter(|b| !b.is_empty()) {
            self.server.bind = bind;
        }
    }
}
