//! Knowledge-base client errors.

use gantry_types::ServiceFault;
use thiserror::Error;

/// Errors from retrieval and catalog calls.
#[derive(Error, Debug)]
pub enum KbError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The knowledge base does not exist (HTTP 404).
    #[error("knowledge base not found: {0}")]
    NotFound(ServiceFault),

    /// Any other non-success response.
    #[error("service error: {0}")]
    Service(ServiceFault),

    /// No API key available.
    #[error("client not configured: {0}")]
    NotConfigured(String),

    /// The knowledge-base id cannot be used in a request path.
    #[error("invalid knowledge base id: {0:?}")]
    InvalidId(String),

    /// The response body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("timeout")]
    Timeout,
}

impl KbError {
    /// Service-style error code for diagnostics.
    pub fn code(&self) -> &str {
        match self {
            KbError::NotFound(fault) | KbError::Service(fault) => &fault.code,
            KbError::RequestFailed(_) => "RequestFailed",
            KbError::NotConfigured(_) => "NotConfigured",
            KbError::InvalidId(_) => "ValidationException",
            KbError::InvalidResponse(_) => "InvalidResponse",
            KbError::Timeout => "Timeout",
        }
    }

    pub fn from_fault(fault: ServiceFault) -> Self {
        if fault.status == 404 {
            KbError::NotFound(fault)
        } else {
            KbError::Service(fault)
        }
    }
}

impl From<reqwest::Error> for KbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KbError::Timeout
        } else {
            KbError::RequestFailed(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, KbError>;
