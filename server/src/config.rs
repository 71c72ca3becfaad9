use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use database::DatabaseConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid listen address {value:?}: {source}")]
    ListenAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Parser, Debug, Default)]
#[command(name = "memory-history", about = "Stores and serves memory card game history")]
pub struct Params {
    /// YAML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database URL, or `memory` for a process-local store.
    #[arg(short, long)]
    pub database: Option<String>,

    #[arg(short, long)]
    pub listen: Option<String>,

    #[arg(long)]
    pub pool_size: Option<u32>,

    /// May be repeated. `*` allows any origin.
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub listen: Option<String>,
    pub database_url: Option<String>,
    pub pool_size: Option<u32>,
    pub allowed_origins: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub database: DatabaseConfig,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Reads the config file named in `params`, if any, and the process
    /// environment.
    pub fn load(params: &Params) -> Result<Self, ConfigError> {
        let file = params
            .config
            .as_deref()
            .map(FileConfig::load)
            .transpose()?
            .unwrap_or_default();
        Self::resolve(params, file, |key| std::env::var(key).ok())
    }

    /// Command line beats environment, environment beats the config file.
    pub fn resolve(
        params: &Params,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let listen = params
            .listen
            .clone()
            .or_else(|| env("LISTEN_ADDR"))
            .or(file.listen)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen = listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::ListenAddr {
                value: listen.clone(),
                source,
            })?;

        let mut database =
            DatabaseConfig::resolve(params.database.clone(), env("DATABASE_URL"), file.database_url);
        if let Some(pool_size) = params.pool_size.or(file.pool_size) {
            database = database.with_pool_size(pool_size);
        }

        let allowed_origins = if !params.allowed_origins.is_empty() {
            params.allowed_origins.clone()
        } else if let Some(origins) = env("ALLOWED_HTTP_ORIGINS") {
            origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect()
        } else {
            file.allowed_origins
                .unwrap_or_else(|| vec!["*".to_string()])
        };

        Ok(Self {
            listen,
            database,
            allowed_origins,
        })
    }
}
