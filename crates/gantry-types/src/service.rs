//! Error responses from the hosted services.
//!
//! The generation, retrieval and catalog services all report failures the
//! same way: an HTTP status, an optional `x-amzn-ErrorType` header naming
//! the error code, and a JSON body carrying a `message` (or `Message`).
//! [`ServiceFault`] captures that triple so client crates can classify it
//! without depending on each other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Header carrying the service error code.
pub const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// A non-success response from a hosted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFault {
    /// HTTP status code.
    pub status: u16,
    /// Service error code, e.g. `ThrottlingException`.
    pub code: String,
    /// Human-readable message from the response body.
    pub message: String,
}

impl ServiceFault {
    /// Build a fault from the pieces of an error response.
    ///
    /// The code comes from the error-type header when present (anything
    /// after the first `:` is a documentation URL and is dropped), then
    /// from a `__type` body field, then from the status code.
    pub fn from_parts(status: u16, error_type: Option<&str>, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        let header_code = error_type
            .and_then(|h| h.split(':').next())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        let body_code = parsed
            .as_ref()
            .and_then(|v| v.get("__type"))
            .and_then(|v| v.as_str())
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string());

        let code = header_code
            .or(body_code)
            .unwrap_or_else(|| code_for_status(status).to_string());

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message").or_else(|| v.get("Message")))
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {status}")
                } else {
                    trimmed.to_string()
                }
            });

        Self {
            status,
            code,
            message,
        }
    }

    /// Whether the service asked the caller to slow down.
    pub fn is_throttling(&self) -> bool {
        self.status == 429 || self.code == "ThrottlingException"
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Default error code for an HTTP status when the service sent none.
pub fn code_for_status(status: u16) -> &'static str {
    match status {
        400 => "ValidationException",
        401 | 403 => "AccessDeniedException",
        404 => "ResourceNotFoundException",
        408 => "ModelTimeoutException",
        409 => "ConflictException",
        424 => "ModelErrorException",
        429 => "ThrottlingException",
        503 => "ServiceUnavailableException",
        500..=599 => "InternalServerException",
        _ => "UnknownError",
    }
}
