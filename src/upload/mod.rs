//! Upload module
//!
//! Gates uploaded CSV files through schema validation and stores accepted
//! files under a freshly generated key.

use crate::storage::{ObjectStorage, StorageError};
use crate::validate::{validate_transactions_csv, ValidationError};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

mod key;

pub use key::StorageKey;

/// Content type every accepted object is stored with
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Default key prefix for uploaded objects
pub const DEFAULT_BASE_PATH: &str = "uploads";

/// Upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("body is empty")]
    EmptyBody,

    #[error("invalid CSV: {0}")]
    InvalidCsv(#[from] ValidationError),

    #[error("upload to storage: {0}")]
    Storage(#[from] StorageError),
}

impl UploadError {
    /// HTTP status reported to the caller
    ///
    /// Storage failures are reported as 400 alongside input errors.
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::EmptyBody | Self::InvalidCsv(_) | Self::Storage(_) => {
                http::StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Upload request
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub raw_body: Bytes,
    /// Declared content type; informational only
    pub content_type: String,
}

/// Upload result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub bucket: String,
    pub key: String,
}

/// Inbound port for CSV uploads
#[async_trait]
pub trait CsvUploader: Send + Sync {
    /// Validate and store one CSV file
    async fn upload_csv(&self, request: UploadRequest) -> Result<UploadResult, UploadError>;
}

/// Validating CSV upload service
///
/// Every successful call writes exactly one object at a new key. Storage is
/// attempted once; there are no retries at this layer.
pub struct CsvUploadService {
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
    base_path: String,
}

impl CsvUploadService {
    /// Create a new upload service
    ///
    /// Trailing `/` on `base_path` is dropped.
    pub fn new(storage: Arc<dyn ObjectStorage>, bucket: &str, base_path: &str) -> Self {
        Self {
            storage,
            bucket: bucket.to_string(),
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    /// Target bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Normalized key prefix
    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

#[async_trait]
impl CsvUploader for CsvUploadService {
    #[tracing::instrument(
        name = "upload.csv",
        skip(self, request),
        fields(
            s3.bucket = %self.bucket,
            upload.bytes = request.raw_body.len(),
            http.content_type = %request.content_type,
            s3.key = tracing::field::Empty
        )
    )]
    async fn upload_csv(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        if request.raw_body.is_empty() {
            tracing::warn!("Rejected upload: body is empty");
            return Err(UploadError::EmptyBody);
        }

        if let Err(e) = validate_transactions_csv(&request.raw_body) {
            tracing::warn!(error = %e, "Rejected upload: invalid CSV");
            return Err(e.into());
        }

        let key = StorageKey::generate(&self.base_path);
        tracing::Span::current().record("s3.key", key.as_str());

        let start_time = Instant::now();
        let bytes_written = request.raw_body.len();

        if let Err(e) = self
            .storage
            .put_object(&self.bucket, key.as_str(), CSV_CONTENT_TYPE, request.raw_body)
            .await
        {
            tracing::error!(
                error = %e,
                duration_ms = start_time.elapsed().as_millis(),
                "Storage write failed"
            );
            return Err(e.into());
        }

        tracing::info!(
            key = %key,
            bytes_written = bytes_written,
            duration_ms = start_time.elapsed().as_millis(),
            "CSV upload completed"
        );

        Ok(UploadResult {
            bucket: self.bucket.clone(),
            key: key.into_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::validate::ValidationErrorKind;
    use mockall::mock;

    mock! {
        pub Storage {}

        #[async_trait]
        impl ObjectStorage for Storage {
            async fn put_object(
                &self,
                bucket: &str,
                key: &str,
                content_type: &str,
                data: Bytes,
            ) -> Result<(), StorageError>;
        }
    }

    const VALID_CSV: &str = "Id,Date,Transaction\n1,7/15,-50.25\n";

    fn request(body: &'static str) -> UploadRequest {
        UploadRequest {
            raw_body: Bytes::from_static(body.as_bytes()),
            content_type: "text/csv".into(),
        }
    }

    #[test]
    fn test_base_path_trailing_slash_dropped() {
        let service = CsvUploadService::new(Arc::new(MemoryStorage::new()), "bucket", "uploads/");
        assert_eq!(service.base_path(), "uploads");
        assert_eq!(service.bucket(), "bucket");
    }

    #[tokio::test]
    async fn test_upload_stores_csv() {
        let storage = Arc::new(MemoryStorage::new());
        let service = CsvUploadService::new(storage.clone(), "test-bucket", DEFAULT_BASE_PATH);

        let result = service.upload_csv(request(VALID_CSV)).await.unwrap();

        assert_eq!(result.bucket, "test-bucket");
        assert!(result.key.starts_with("uploads/"));
        assert!(result.key.ends_with(".csv"));

        let stored = storage.get("test-bucket", &result.key).unwrap();
        assert_eq!(stored.content_type, CSV_CONTENT_TYPE);
        assert_eq!(stored.data, Bytes::from_static(VALID_CSV.as_bytes()));
    }

    #[tokio::test]
    async fn test_inbound_content_type_is_not_stored() {
        let storage = Arc::new(MemoryStorage::new());
        let service = CsvUploadService::new(storage.clone(), "b", "uploads");

        let mut req = request(VALID_CSV);
        req.content_type = "application/octet-stream".into();
        let result = service.upload_csv(req).await.unwrap();

        assert_eq!(storage.get("b", &result.key).unwrap().content_type, "text/csv");
    }

    #[tokio::test]
    async fn test_empty_body_never_reaches_storage() {
        let mut storage = MockStorage::new();
        storage.expect_put_object().never();
        let service = CsvUploadService::new(Arc::new(storage), "b", "uploads");

        let err = service.upload_csv(request("")).await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyBody));
        assert_eq!(err.to_string(), "body is empty");
    }

    #[tokio::test]
    async fn test_invalid_csv_never_reaches_storage() {
        let mut storage = MockStorage::new();
        storage.expect_put_object().never();
        let service = CsvUploadService::new(Arc::new(storage), "b", "uploads");

        let err = service
            .upload_csv(request("Name,Date,Transaction\n1,7/15,10\n"))
            .await
            .unwrap_err();

        match &err {
            UploadError::InvalidCsv(inner) => assert_eq!(inner.kind(), ValidationErrorKind::Header),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("invalid CSV: invalid header"));
    }

    #[tokio::test]
    async fn test_storage_failure_is_wrapped() {
        let mut storage = MockStorage::new();
        storage
            .expect_put_object()
            .times(1)
            .returning(|_, _, _, _| Err(StorageError::Request("connection reset".into())));
        let service = CsvUploadService::new(Arc::new(storage), "b", "uploads");

        let err = service.upload_csv(request(VALID_CSV)).await.unwrap_err();

        assert!(matches!(err, UploadError::Storage(_)));
        assert_eq!(
            err.to_string(),
            "upload to storage: request failed: connection reset"
        );
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }
}
