//! Composition root
//!
//! Builds the storage client, upload service and request handler once at
//! process start. The resulting [`UploadApi`] is shared by every invocation.

use crate::config::{Config, ConfigError};
use crate::handler::UploadApiHandler;
use crate::storage::{ObjectStorage, S3Storage};
use crate::upload::CsvUploadService;
use std::sync::Arc;
use thiserror::Error;

/// Bootstrap errors
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Fully wired upload API
pub struct UploadApi {
    pub handler: UploadApiHandler,
}

impl UploadApi {
    /// Wire the API against S3
    pub async fn initialize(config: &Config) -> Result<Self, BootstrapError> {
        config.validate()?;
        let storage = S3Storage::from_config(&config.storage).await;
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Wire the API against any storage implementation
    pub fn with_storage(config: &Config, storage: Arc<dyn ObjectStorage>) -> Self {
        let service = CsvUploadService::new(
            storage,
            &config.storage.bucket,
            &config.upload.base_path,
        );

        tracing::info!(
            bucket = %service.bucket(),
            base_path = %service.base_path(),
            "Upload API initialized"
        );

        Self {
            handler: UploadApiHandler::new(Arc::new(service)),
        }
    }
}
