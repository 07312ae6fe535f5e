//! Error types for gantry.
//!
//! [`GantryError`] covers configuration and knowledge-base admission
//! failures. Service-call failures during a pipeline run never surface as
//! this type: the pipeline converts them into verdicts or degraded results.

use thiserror::Error;

/// Top-level error type for gantry.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GantryError {
    /// Configuration is malformed or a value is outside its allowed range.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// No knowledge-base identifier was supplied.
    #[error("knowledge base id is missing")]
    KnowledgeBaseMissing,

    /// The catalog probe could not confirm the knowledge base.
    #[error("knowledge base '{kb_id}' is invalid or unreachable")]
    KnowledgeBaseInvalid {
        /// The identifier that failed validation.
        kb_id: String,
    },

    /// The intent taxonomy violates one of its structural rules.
    #[error("invalid taxonomy: {reason}")]
    TaxonomyInvalid {
        /// Which rule was violated.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GantryError {
    /// Shorthand for [`GantryError::ConfigInvalid`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            reason: reason.into(),
        }
    }
}

/// A convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GantryError>;
