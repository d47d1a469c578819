//! S3 storage backed by the AWS SDK
//!
//! # Tracing
//!
//! Each put creates a span named `s3.put_object` with attributes:
//! - `s3.bucket` - Bucket name
//! - `s3.key` - Object key
//! - `upload.bytes` - Size of object
//! - `s3.etag` - ETag from response (recorded after upload)

use super::{ObjectStorage, StorageError};
use crate::config::StorageConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

/// Object storage on S3 or an S3-compatible endpoint
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Wrap an already configured SDK client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from storage configuration
    ///
    /// Credentials come from the default AWS provider chain. The endpoint
    /// override and path-style flag exist for S3-compatible stores such as
    /// LocalStack or MinIO.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        tracing::info!(
            region = %config.region,
            endpoint = ?config.endpoint,
            force_path_style = config.force_path_style,
            "S3 client configured"
        );

        Self::new(Client::from_conf(s3_config))
    }

    /// Underlying SDK client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    #[tracing::instrument(
        name = "s3.put_object",
        skip(self, data),
        fields(
            s3.bucket = %bucket,
            s3.key = %key,
            upload.bytes = data.len(),
            s3.etag = tracing::field::Empty
        ),
        err
    )]
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), StorageError> {
        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await;

        match result {
            Ok(output) => {
                if let Some(etag) = output.e_tag() {
                    tracing::Span::current().record("s3.etag", etag);
                }
                Ok(())
            }
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                match err.raw_response().map(|r| r.status().as_u16()) {
                    Some(status) => Err(StorageError::Rejected { status, message }),
                    None => Err(StorageError::Request(message)),
                }
            }
        }
    }
}
