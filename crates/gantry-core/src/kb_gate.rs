//! Knowledge-base id validation.
//!
//! The pipeline only accepts a [`ValidatedKbId`], and the only way to get
//! one is through [`KbGate::check`], which asks the catalog whether the id
//! exists. A front end that has no valid id must stop and ask for one.

use std::fmt;
use std::sync::Arc;

use gantry_types::{GantryError, Result};
use tracing::info;

use crate::pipeline::Retriever;

/// A knowledge-base id the catalog has confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedKbId(String);

impl ValidatedKbId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedKbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remembers the last id the catalog confirmed, so an unchanged valid id
/// is not probed again. Failed probes are not remembered.
pub struct KbGate {
    retriever: Arc<dyn Retriever>,
    validated: Option<String>,
}

impl KbGate {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self {
            retriever,
            validated: None,
        }
    }

    /// Validate `kb_id` (trimmed). Blank ids fail without a probe; an id
    /// equal to the last confirmed one is accepted without a probe. Any
    /// other id, including one that failed before, is probed.
    pub async fn check(&mut self, kb_id: &str) -> Result<ValidatedKbId> {
        let kb_id = kb_id.trim();
        if kb_id.is_empty() {
            return Err(GantryError::KnowledgeBaseMissing);
        }

        if self.validated.as_deref() == Some(kb_id) {
            return Ok(ValidatedKbId(kb_id.to_string()));
        }

        let valid = self.retriever.validate_kb_id(kb_id).await;
        info!(kb_id, valid, "knowledge base probed");
        if valid {
            self.validated = Some(kb_id.to_string());
            Ok(ValidatedKbId(kb_id.to_string()))
        } else {
            self.validated = None;
            Err(GantryError::KnowledgeBaseInvalid {
                kb_id: kb_id.to_string(),
            })
        }
    }

    /// The id most recently confirmed, if the last probe succeeded.
    pub fn current(&self) -> Option<ValidatedKbId> {
        self.validated.clone().map(ValidatedKbId)
    }

    /// Forget the confirmed id so the next check probes again.
    pub fn reset(&mut self) {
        self.validated = None;
    }
}
