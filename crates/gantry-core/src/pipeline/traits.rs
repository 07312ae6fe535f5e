//! Pipeline seams and the values that flow between stages.
//!
//! The orchestrator depends only on these traits; the service-backed
//! implementations live in [`super::retriever`] and [`super::generator`].

use std::fmt;

use async_trait::async_trait;
use gantry_types::config::ChatSettings;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

// ── Values ──────────────────────────────────────────────────────────────

/// One passage returned by knowledge retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedPassage {
    pub text: String,
    /// Relevance in `[0, 1]` as reported by the service.
    pub confidence_score: f64,
    /// Origin document or chunk; empty when the service gives none.
    pub source_path: String,
}

/// Decoding parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl From<&ChatSettings> for GenerationParams {
    fn from(settings: &ChatSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
        }
    }
}

// ── Stages ──────────────────────────────────────────────────────────────

/// States a single request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PipelineStage {
    Idle,
    LengthCheck,
    Classifying,
    Rejected,
    Retrieving,
    Composing,
    Generating,
    Done,
}

impl PipelineStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Rejected | PipelineStage::Done)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::LengthCheck => "length_check",
            PipelineStage::Classifying => "classifying",
            PipelineStage::Rejected => "rejected",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Composing => "composing",
            PipelineStage::Generating => "generating",
            PipelineStage::Done => "done",
        };
        f.write_str(s)
    }
}

// ── Traits ──────────────────────────────────────────────────────────────

/// Knowledge retrieval. Failures never reach the caller: they are logged
/// and an empty result is returned.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// At most `result_count` passages in the service's relevance order.
    async fn retrieve(&self, query: &str, kb_id: &str, result_count: u32) -> Vec<RetrievedPassage>;

    /// Whether the catalog knows `kb_id`. Any failure counts as `false`.
    async fn validate_kb_id(&self, kb_id: &str) -> bool;
}

/// Text generation. A failed call yields the empty string.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> String;
}

/// Receives stage transitions. Purely advisory: observers see stage
/// values only and have no way to influence the run.
pub trait ProgressObserver: Send + Sync {
    fn on_stage(&self, request_id: Uuid, stage: PipelineStage);
}

/// Emits one `debug!` per transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_stage(&self, request_id: Uuid, stage: PipelineStage) {
        debug!(request_id = %request_id, stage = %stage, "pipeline stage");
    }
}
