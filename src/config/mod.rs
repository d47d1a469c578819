//! Configuration module for Txn Uploadr
//!
//! Settings come from the process environment (the normal case on Lambda)
//! or from a YAML file with environment variable expansion.
//!
//! # Environment
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `S3_BUCKET_NAME` | yes | |
//! | `S3_REGION` | yes | |
//! | `AWS_ENDPOINT_URL` | no | SDK default |
//! | `AWS_S3_USE_PATH_STYLE` | no | `false` |
//! | `UPLOAD_BASE_PATH` | no | `uploads` |
//!
//! A `.env` file in the working directory fills in variables the environment
//! does not set.
//!
//! # YAML
//!
//! ```yaml
//! storage:
//!   bucket: "${S3_BUCKET_NAME}"
//!   region: "${S3_REGION:-us-east-1}"
//!   endpoint: "http://localhost:4566"
//!   force_path_style: true
//! upload:
//!   base_path: "uploads"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::{ConfigLoader, DOTENV_FILE};

pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
pub const ENV_REGION: &str = "S3_REGION";
pub const ENV_ENDPOINT: &str = "AWS_ENDPOINT_URL";
pub const ENV_PATH_STYLE: &str = "AWS_S3_USE_PATH_STYLE";
pub const ENV_BASE_PATH: &str = "UPLOAD_BASE_PATH";

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("missing required settings: {0:?}")]
    MissingVariables(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        ConfigLoader::load(path)
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigLoader::from_env()
    }

    /// Validate the configuration
    ///
    /// All missing required settings are reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.storage.bucket.trim().is_empty() {
            missing.push(ENV_BUCKET);
        }
        if self.storage.region.trim().is_empty() {
            missing.push(ENV_REGION);
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        if let Some(ref endpoint) = self.storage.endpoint {
            if !is_valid_http_url(endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid endpoint '{}': must start with http:// or https://",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: String,
    /// Alternate S3 endpoint (LocalStack, MinIO)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

fn default_base_path() -> String {
    crate::upload::DEFAULT_BASE_PATH.to_string()
}
