//! Optional TOML configuration.
//!
//! Looked up from `--config <path>` or `emi.toml` in the working directory.
//! Every field has a default, so a missing file is not an error. Secrets are
//! referenced by env-var name and resolved at runtime.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "emi.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Exchange-rate API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Display currency used when `--currency` is not given.
    #[serde(default)]
    pub currency: Option<String>,
}

fn default_base_url() -> String {
    "https://v6.exchangerate-api.com/v6".into()
}

fn default_api_key_env() -> String {
    "EXCHANGE_RATE_API_KEY".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit path, or from `emi.toml` if present.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &str) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
        Self::parse(&contents).map_err(|e| format!("Failed to parse config file '{}': {}", path, e).into())
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String, Box<dyn Error>> {
        std::env::var(env_name)
            .map_err(|_| format!("Environment variable not set: {env_name}").into())
    }
}
