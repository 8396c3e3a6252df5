//! Runtime configuration.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. built-in defaults
//! 2. a TOML file (`agro.toml` unless another path is given)
//! 3. environment variables prefixed with `AGRO_`, using `__` between
//!    section and key (`AGRO_SERVER__BIND=0.0.0.0:9000`)

use crate::validation::document::DocumentPolicy;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "agro.toml";
pub const ENV_PREFIX: &str = "AGRO_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to resolve working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Load(Box::new(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgroConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub pagination: PaginationConfig,
    pub documents: DocumentPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Relative directories resolve against the working directory.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("agro.sqlite3"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: PathBuf::from("logs"),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_page_size: 100,
        }
    }
}

impl AgroConfig {
    /// Loads defaults, then `agro.toml` when present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Same as [`AgroConfig::load`] with an explicit TOML path.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: AgroConfig = Figment::new()
            .merge(Serialized::defaults(AgroConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.pagination.page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination.page_size must be greater than 0".to_string(),
            ));
        }
        if self.pagination.page_size > self.pagination.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "pagination.page_size ({}) cannot exceed pagination.max_page_size ({})",
                self.pagination.page_size, self.pagination.max_page_size
            )));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database.path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|err| {
            ConfigError::Invalid(format!("server.bind `{}`: {err}", self.server.bind))
        })
    }

    /// Absolute log directory.
    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        if self.logging.dir.is_absolute() {
            Ok(self.logging.dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.logging.dir))
        }
    }
}
