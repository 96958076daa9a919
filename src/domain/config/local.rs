use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const MAX_JSON_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Local,
    Memory,
}

impl std::str::FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Provider::Local),
            "memory" => Ok(Provider::Memory),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got {0:?}")]
    InvalidPort(String),

    #[error("STORAGE_PROVIDER must be 'local' or 'memory', got {0:?}")]
    InvalidProvider(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub storage_provider: Provider,
    pub max_upload_bytes: usize,
    pub max_json_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_provider: Provider::default(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_json_bytes: MAX_JSON_BYTES,
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `DATA_DIR` and `STORAGE_PROVIDER` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT").filter(|port| !port.trim().is_empty()) {
            config.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(data_dir) = lookup("DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Some(provider) = lookup("STORAGE_PROVIDER") {
            config.storage_provider = provider.parse()?;
        }

        Ok(config)
    }
}
