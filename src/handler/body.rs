//! Request body extraction
//!
//! Turns an API Gateway body (plain or base64) into raw bytes, and pulls the
//! first part out of a multipart body.

use super::RequestError;
use aws_lambda_events::apigw::ApiGatewayV2httpRequest;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use std::convert::Infallible;

/// First part of a multipart body
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Decode the event body, honouring the base64 flag
///
/// A missing or empty body decodes to empty bytes.
pub fn decode_body(request: &ApiGatewayV2httpRequest) -> Result<Bytes, RequestError> {
    let body = match request.body.as_deref() {
        None | Some("") => return Ok(Bytes::new()),
        Some(body) => body,
    };

    if request.is_base64_encoded {
        STANDARD
            .decode(body)
            .map(Bytes::from)
            .map_err(|e| RequestError::UnreadableBody(e.to_string()))
    } else {
        Ok(Bytes::copy_from_slice(body.as_bytes()))
    }
}

/// Read the first part of a multipart body
pub async fn first_part(body: Bytes, boundary: &str) -> Result<FilePart, RequestError> {
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Failed to parse multipart body");
            RequestError::NoFileFound
        })?
        .ok_or(RequestError::NoFileFound)?;

    let content_type = field.content_type().map(|m| m.to_string());
    let file_name = field.file_name().map(str::to_string);

    let data = field
        .bytes()
        .await
        .map_err(|e| RequestError::UnreadablePart(e.to_string()))?;

    Ok(FilePart {
        data,
        content_type,
        file_name,
    })
}
