use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "env.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Process configuration, loaded once at start-up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub import_on_startup: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub user: String,
    pub pass: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Collection served by the query endpoints.
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            pass: String::new(),
            host: "localhost".into(),
            port: 27017,
            database: "PokeDex".into(),
            collection: "kanto_pokemons".into(),
        }
    }
}

impl MongoConfig {
    /// `(user, pass)` when a user is configured. Handed to the driver as is,
    /// so reserved URI characters need no escaping.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        (!self.user.is_empty()).then_some((self.user.as_str(), self.pass.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".into(),
            request_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// A JSON dataset file and the collection it is imported into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dataset {
    pub collection: String,
    pub path: PathBuf,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Load from `DEX_CONFIG` (default `env.yaml`), then apply `DEX_API_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("DEX_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load(path)?;
        if let Ok(addr) = std::env::var("DEX_API_ADDR") {
            config.server.addr = addr;
        }
        Ok(config)
    }
}
