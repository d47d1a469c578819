//! CSV Upload Service Tests
//!
//! Drives `CsvUploadService` against in-memory storage.
//!
//! ## Test Coverage
//!
//! - Accepted uploads land at `{base_path}/{uuid}.csv` with `text/csv`
//! - Identical uploads get distinct keys
//! - Rejected uploads never touch storage

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use std::sync::Arc;
    use txn_uploadr::storage::MemoryStorage;
    use txn_uploadr::upload::{CsvUploadService, CsvUploader, UploadError, UploadRequest};
    use txn_uploadr::validate::ValidationError;

    const SCENARIO_A: &str = "Id,Date,Transaction\n1,7/15,-50.25\n";

    fn service(storage: &Arc<MemoryStorage>, base_path: &str) -> CsvUploadService {
        CsvUploadService::new(storage.clone(), "test-bucket", base_path)
    }

    fn request(body: &str) -> UploadRequest {
        UploadRequest {
            raw_body: Bytes::copy_from_slice(body.as_bytes()),
            content_type: "text/csv".to_string(),
        }
    }

    fn assert_uuid_key(key: &str, base_path: &str) {
        let id = key
            .strip_prefix(&format!("{base_path}/"))
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap_or_else(|| panic!("unexpected key shape: {key}"));
        assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
    }

    // ========================================================================
    // TEST: Accepted Uploads
    // ========================================================================

    #[tokio::test]
    async fn test_scenario_a_upload() {
        let storage = Arc::new(MemoryStorage::new());
        let result = service(&storage, "uploads")
            .upload_csv(request(SCENARIO_A))
            .await
            .unwrap();

        assert_eq!(result.bucket, "test-bucket");
        assert_uuid_key(&result.key, "uploads");

        let stored = storage.get("test-bucket", &result.key).unwrap();
        assert_eq!(stored.data, Bytes::from(SCENARIO_A));
        assert_eq!(stored.content_type, "text/csv");
    }

    #[tokio::test]
    async fn test_same_bytes_get_distinct_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let service = service(&storage, "uploads");

        let first = service.upload_csv(request(SCENARIO_A)).await.unwrap();
        let second = service.upload_csv(request(SCENARIO_A)).await.unwrap();

        assert_ne!(first.key, second.key);
        assert_eq!(storage.len(), 2);
    }

    #[tokio::test]
    async fn test_custom_base_path_is_normalized() {
        let storage = Arc::new(MemoryStorage::new());
        let result = service(&storage, "tenants/acme/")
            .upload_csv(request(SCENARIO_A))
            .await
            .unwrap();

        assert_uuid_key(&result.key, "tenants/acme");
    }

    // ========================================================================
    // TEST: Rejected Uploads
    // ========================================================================

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        let storage = Arc::new(MemoryStorage::new());
        let err = service(&storage, "uploads")
            .upload_csv(request(""))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::EmptyBody));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_validation_errors_are_wrapped() {
        let cases = [
            (
                "Id,Date,Transaction\n1,7/15\n",
                ValidationError::FieldCount { row: 1 },
            ),
            ("Id,Date,Transaction\n", ValidationError::NoDataRows),
        ];

        for (body, expected) in cases {
            let storage = Arc::new(MemoryStorage::new());
            let err = service(&storage, "uploads")
                .upload_csv(request(body))
                .await
                .unwrap_err();

            assert_eq!(err.to_string(), format!("invalid CSV: {expected}"));
            match err {
                UploadError::InvalidCsv(inner) => assert_eq!(inner, expected),
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(storage.is_empty());
        }
    }
}
