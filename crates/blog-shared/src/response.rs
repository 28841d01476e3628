//! Error response body (RFC 7807 problem details plus a flat `message`).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
///
/// Every body also carries `message`, the field clients of the blog API
/// read, and a machine-readable `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// Machine-readable error code, e.g. `malformed_id`.
    pub code: String,

    /// Human-readable message. Always present.
    pub message: String,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>, code: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            error_type: "about:blank".to_string(),
            message: title.clone(),
            title,
            status,
            code: code.into(),
            detail: None,
        }
    }

    /// Set the detail; it also becomes the `message`.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message = detail.clone();
        self.detail = Some(detail);
        self
    }

    // Common error constructors
    pub fn bad_request(code: &str, detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request", code).with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found", "not_found").with_detail(detail)
    }

    pub fn unprocessable(code: &str, detail: impl Into<String>) -> Self {
        Self::new(422, "Unprocessable Entity", code).with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error", "internal_error")
    }
}
