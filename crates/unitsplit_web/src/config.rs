use std::env;
use std::path::PathBuf;

use crate::conf::{
    C_ENV_HOST, C_ENV_MAX_UPLOAD_BYTES, C_ENV_OUTPUT_DIR, C_ENV_PORT, C_ENV_UPLOAD_DIR,
    C_HOST_DEFAULT, C_OUTPUT_DIR_DEFAULT, C_UPLOAD_DIR_DEFAULT, N_MAX_UPLOAD_BYTES_DEFAULT,
    N_PORT_DEFAULT,
};
use crate::spec::SpecStorageDirs;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dir_uploads: PathBuf,
    pub dir_outputs: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup(C_ENV_PORT) {
            Some(val) => val
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("{C_ENV_PORT}={val}")))?,
            None => N_PORT_DEFAULT,
        };
        let max_upload_bytes = match lookup(C_ENV_MAX_UPLOAD_BYTES) {
            Some(val) => val
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("{C_ENV_MAX_UPLOAD_BYTES}={val}")))?,
            None => N_MAX_UPLOAD_BYTES_DEFAULT,
        };

        Ok(Config {
            host: lookup(C_ENV_HOST).unwrap_or_else(|| C_HOST_DEFAULT.to_string()),
            port,
            dir_uploads: PathBuf::from(
                lookup(C_ENV_UPLOAD_DIR).unwrap_or_else(|| C_UPLOAD_DIR_DEFAULT.to_string()),
            ),
            dir_outputs: PathBuf::from(
                lookup(C_ENV_OUTPUT_DIR).unwrap_or_else(|| C_OUTPUT_DIR_DEFAULT.to_string()),
            ),
            max_upload_bytes,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn storage_dirs(&self) -> SpecStorageDirs {
        SpecStorageDirs {
            dir_uploads: self.dir_uploads.clone(),
            dir_outputs: self.dir_outputs.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
