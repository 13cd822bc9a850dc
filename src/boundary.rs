//! HTTP response mapping for document operations
//!
//! This is not a router: the surrounding server owns paths, auth and
//! multipart parsing. `DocumentBoundary` takes already-parsed requests,
//! runs them through the service and produces `http::Response` values.
//!
//! | operation | success                         | failure              |
//! |-----------|---------------------------------|----------------------|
//! | fetch     | 200, `Content-Type: image/jpeg` | 404                  |
//! | upload    | 204                             | 404, 413 (or 404)    |
//! | remove    | 204                             | 404                  |

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{Response, StatusCode};
use std::sync::Arc;

use crate::config::TooLargeStatus;
use crate::error::DocumentError;
use crate::service::MemberDocumentService;

/// The file part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Client-supplied file name; never used to name the stored document
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl UploadPayload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

pub struct DocumentBoundary {
    service: Arc<MemberDocumentService>,
    too_large: TooLargeStatus,
}

impl DocumentBoundary {
    pub fn new(service: Arc<MemberDocumentService>, too_large: TooLargeStatus) -> Self {
        Self { service, too_large }
    }

    /// GET: document content as JPEG
    pub async fn fetch(&self, member_id: &str) -> Response<Bytes> {
        match self.service.fetch(member_id).await {
            Ok(document) => build_response(
                StatusCode::OK,
                Some(document.content_type()),
                document.content,
            ),
            Err(e) => self.error_response(&e),
        }
    }

    /// POST/PUT: create or replace
    pub async fn upload(&self, member_id: &str, payload: UploadPayload) -> Response<Bytes> {
        if let Some(file_name) = &payload.file_name {
            tracing::debug!(member_id = %member_id, file_name = %file_name, "Upload received");
        }

        match self.service.upload(member_id, payload.bytes).await {
            Ok(_) => no_content(),
            Err(e) => self.error_response(&e),
        }
    }

    /// DELETE
    pub async fn remove(&self, member_id: &str) -> Response<Bytes> {
        match self.service.remove(member_id).await {
            Ok(()) => no_content(),
            Err(e) => self.error_response(&e),
        }
    }

    fn error_response(&self, error: &DocumentError) -> Response<Bytes> {
        let status = StatusCode::from_u16(error.to_http_status(self.too_large))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %error, "Document operation failed");
        }

        // Internal details stay in the logs
        let body = if status.is_server_error() {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_string()
        } else {
            error.to_string()
        };

        build_response(status, Some("text/plain; charset=utf-8"), Bytes::from(body))
    }
}

fn no_content() -> Response<Bytes> {
    build_response(StatusCode::NO_CONTENT, None, Bytes::new())
}

fn build_response(
    status: StatusCode,
    content_type: Option<&'static str>,
    body: Bytes,
) -> Response<Bytes> {
    let body_len = body.len();
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, http::HeaderValue::from_static(content_type));
    }
    if status != StatusCode::NO_CONTENT {
        headers.insert(CONTENT_LENGTH, http::HeaderValue::from(body_len));
    }

    response
}
