//! Object storage module
//!
//! The upload service only needs one capability from storage: put a blob
//! under a bucket/key with a content type. That capability is the
//! [`ObjectStorage`] trait.
//!
//! # Implementations
//!
//! - [`S3Storage`] - AWS SDK client (production)
//! - [`MemoryStorage`] - In-process map, for tests and local runs
//!
//! # Example
//!
//! ```
//! use txn_uploadr::storage::{MemoryStorage, ObjectStorage};
//! use bytes::Bytes;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = MemoryStorage::new();
//! storage
//!     .put_object("bucket", "uploads/a.csv", "text/csv", Bytes::from("Id,Date,Transaction\n"))
//!     .await?;
//! assert_eq!(storage.len(), 1);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

mod memory;
mod s3;

pub use memory::{MemoryStorage, StoredObject};
pub use s3::S3Storage;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Put-only object storage port
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `bucket`/`key` with the given content type
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), StorageError>;
}
