//! Provider error types for gantry-llm.
//!
//! All provider operations return [`Result<T>`] which uses [`ProviderError`]
//! as the error type. Every variant maps to a service-style error code via
//! [`ProviderError::code`], which callers surface in diagnostics.

use gantry_types::ServiceFault;
use thiserror::Error;

/// Errors that can occur when invoking a model.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP request could not be sent or the connection dropped.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service rejected the credentials (HTTP 401/403).
    #[error("authentication failed: {0}")]
    AuthFailed(ServiceFault),

    /// The service is throttling requests (HTTP 429).
    #[error("throttled: {0}")]
    Throttled(ServiceFault),

    /// The requested model does not exist or is not enabled (HTTP 404).
    #[error("model not found: {0}")]
    ModelNotFound(ServiceFault),

    /// Any other non-success response.
    #[error("service error: {0}")]
    Service(ServiceFault),

    /// The provider has not been configured (e.g. missing API key).
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The service returned a response that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("timeout")]
    Timeout,

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Service-style error code for diagnostics (e.g. `ThrottlingException`).
    pub fn code(&self) -> &str {
        match self {
            ProviderError::AuthFailed(fault)
            | ProviderError::Throttled(fault)
            | ProviderError::ModelNotFound(fault)
            | ProviderError::Service(fault) => &fault.code,
            ProviderError::RequestFailed(_) => "RequestFailed",
            ProviderError::NotConfigured(_) => "NotConfigured",
            ProviderError::InvalidResponse(_) | ProviderError::Json(_) => "InvalidResponse",
            ProviderError::Timeout => "Timeout",
        }
    }

    /// The message part of the error, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ProviderError::AuthFailed(fault)
            | ProviderError::Throttled(fault)
            | ProviderError::ModelNotFound(fault)
            | ProviderError::Service(fault) => fault.message.clone(),
            ProviderError::RequestFailed(msg)
            | ProviderError::NotConfigured(msg)
            | ProviderError::InvalidResponse(msg) => msg.clone(),
            ProviderError::Timeout => "request timed out".into(),
            ProviderError::Json(e) => e.to_string(),
        }
    }

    /// Classify an error response by status.
    pub fn from_fault(fault: ServiceFault) -> Self {
        match fault.status {
            401 | 403 => ProviderError::AuthFailed(fault),
            404 => ProviderError::ModelNotFound(fault),
            _ if fault.is_throttling() => ProviderError::Throttled(fault),
            _ => ProviderError::Service(fault),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
