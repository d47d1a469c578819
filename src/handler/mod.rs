//! API Gateway request adapter
//!
//! Bridges API Gateway v2 HTTP events to the upload service and renders the
//! outcome as a JSON response.
//!
//! # Request
//!
//! - `content-type` must be present under that exact header name and be a
//!   parsable media type
//! - `multipart/*` bodies: the first part is the CSV file
//! - Anything else: the whole body is the CSV file
//! - `isBase64Encoded` bodies are decoded first
//!
//! # Response
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | Stored | 201 | `{"message": "file uploaded successfully", "bucket": .., "key": ..}` |
//! | Rejected | 400 | `{"error": ".."}` |
//! | Unreadable multipart part | 500 | `{"error": "cannot read file"}` |
//!
//! Responses always carry `Content-Type: application/json` and are never
//! base64-encoded.

use crate::upload::{CsvUploader, UploadRequest, UploadResult};
use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use std::sync::Arc;
use thiserror::Error;

mod body;

pub use body::{decode_body, first_part, FilePart};

/// Success message returned with 201 responses
pub const UPLOADED_MESSAGE: &str = "file uploaded successfully";

/// Errors raised while reading the inbound request
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid content-type")]
    InvalidContentType,

    #[error("cannot read body")]
    UnreadableBody(String),

    #[error("no file found")]
    NoFileFound,

    #[error("cannot read file")]
    UnreadablePart(String),
}

impl RequestError {
    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnreadablePart(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Upload API handler
pub struct UploadApiHandler {
    uploader: Arc<dyn CsvUploader>,
}

impl UploadApiHandler {
    /// Create a handler around an upload service
    pub fn new(uploader: Arc<dyn CsvUploader>) -> Self {
        Self { uploader }
    }

    /// Handle one API Gateway event
    ///
    /// Never fails: every outcome is rendered as a response.
    #[tracing::instrument(
        name = "http.upload",
        skip(self, request),
        fields(
            http.content_type = tracing::field::Empty,
            http.status_code = tracing::field::Empty
        )
    )]
    pub async fn handle(&self, request: ApiGatewayV2httpRequest) -> ApiGatewayV2httpResponse {
        let response = match self.extract(&request).await {
            Ok(upload) => match self.uploader.upload_csv(upload).await {
                Ok(result) => created_response(&result),
                Err(e) => error_response(e.status_code(), &e.to_string()),
            },
            Err(e) => {
                tracing::warn!(error = ?e, "Rejected request");
                error_response(e.status_code(), &e.to_string())
            }
        };

        tracing::Span::current().record("http.status_code", response.status_code);
        response
    }

    /// Build the upload request from the event
    async fn extract(&self, request: &ApiGatewayV2httpRequest) -> Result<UploadRequest, RequestError> {
        let content_type = request
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::Span::current().record("http.content_type", content_type.as_str());

        let media_type: mime::Mime = content_type
            .parse()
            .map_err(|_| RequestError::InvalidContentType)?;

        let body = decode_body(request)?;

        if media_type.type_() != mime::MULTIPART {
            return Ok(UploadRequest {
                raw_body: body,
                content_type,
            });
        }

        let boundary = media_type
            .get_param(mime::BOUNDARY)
            .map(|b| b.as_str().to_string())
            .ok_or(RequestError::NoFileFound)?;

        let part = first_part(body, &boundary).await?;

        tracing::debug!(
            file_name = ?part.file_name,
            part_content_type = ?part.content_type,
            bytes = part.data.len(),
            "Extracted multipart file"
        );

        Ok(UploadRequest {
            raw_body: part.data,
            content_type: part.content_type.unwrap_or(content_type),
        })
    }
}

fn created_response(result: &UploadResult) -> ApiGatewayV2httpResponse {
    json_response(
        StatusCode::CREATED,
        serde_json::json!({
            "message": UPLOADED_MESSAGE,
            "bucket": result.bucket,
            "key": result.key,
        }),
    )
}

fn error_response(status: StatusCode, message: &str) -> ApiGatewayV2httpResponse {
    json_response(status, serde_json::json!({ "error": message }))
}

fn json_response(status: StatusCode, body: serde_json::Value) -> ApiGatewayV2httpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    ApiGatewayV2httpResponse {
        status_code: i64::from(status.as_u16()),
        headers,
        body: Some(Body::Text(body.to_string())),
        is_base64_encoded: false,
        ..Default::default()
    }
}
