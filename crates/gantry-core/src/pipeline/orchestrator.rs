//! Per-turn orchestration.
//!
//! ```text
//! Idle -> LengthCheck -> Classifying -> Retrieving -> Composing -> Generating -> Done
//!              |              |
//!              +-> Rejected <-+
//! ```
//!
//! Stages run strictly in sequence. Retrieval only starts after
//! admission, and the observer is told about each transition without
//! being able to affect it.

use std::sync::Arc;

use gantry_types::config::ChatSettings;
use gantry_types::ConversationTurn;
use serde::Serialize;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::classifier::{AdmissionClassifier, AdmissionVerdict};
use super::compose::{Citation, citations, compose_prompt, context_block};
use super::traits::{
    GenerationParams, Generator, PipelineStage, ProgressObserver, Retriever, TracingObserver,
};
use crate::kb_gate::ValidatedKbId;

/// Reply for every refused request and for generation that produced
/// nothing.
pub const FALLBACK_RESPONSE: &str = "I'm unable to answer this, please try again";

/// Everything one turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub request_id: Uuid,
    /// The user prompt exactly as received.
    pub prompt: String,
    pub verdict: AdmissionVerdict,
    /// Generated answer or [`FALLBACK_RESPONSE`]; never empty.
    pub response: String,
    /// Passages behind a generated answer. Empty when refused or when
    /// generation produced nothing.
    pub citations: Vec<Citation>,
    /// Last stage reached: `Rejected` or `Done`.
    pub final_stage: PipelineStage,
    /// Set when `response` is the substituted [`FALLBACK_RESPONSE`].
    pub fallback: bool,
}

impl TurnOutcome {
    /// Whether `response` came from the model.
    pub fn answered(&self) -> bool {
        !self.fallback
    }

    /// The user and assistant turns to append to session history.
    pub fn turns(&self) -> [ConversationTurn; 2] {
        [
            ConversationTurn::user(self.prompt.clone()),
            ConversationTurn::assistant(self.response.clone()),
        ]
    }
}

/// Runs the admission pipeline and, for admitted requests,
/// retrieval-augmented generation.
pub struct Orchestrator {
    classifier: AdmissionClassifier,
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    observer: Arc<dyn ProgressObserver>,
}

impl Orchestrator {
    pub fn new(
        classifier: AdmissionClassifier,
        retriever: Arc<dyn Retriever>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            classifier,
            retriever,
            generator,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn classifier(&self) -> &AdmissionClassifier {
        &self.classifier
    }

    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.retriever
    }

    /// Handle one user turn against a validated knowledge base.
    pub async fn handle_user_turn(
        &self,
        prompt: &str,
        settings: &ChatSettings,
        kb: &ValidatedKbId,
    ) -> TurnOutcome {
        let request_id = Uuid::new_v4();
        let span = info_span!("turn", request_id = %request_id, model = %settings.model);
        self.run(request_id, prompt, settings, kb).instrument(span).await
    }

    async fn run(
        &self,
        request_id: Uuid,
        prompt: &str,
        settings: &ChatSettings,
        kb: &ValidatedKbId,
    ) -> TurnOutcome {
        let stage = |s| self.observer.on_stage(request_id, s);
        let refuse = |verdict: AdmissionVerdict| {
            stage(PipelineStage::Rejected);
            info!(name = %verdict.name, reason = %verdict.reason, "request refused");
            TurnOutcome {
                request_id,
                prompt: prompt.to_string(),
                verdict,
                response: FALLBACK_RESPONSE.to_string(),
                citations: Vec::new(),
                final_stage: PipelineStage::Rejected,
                fallback: true,
            }
        };

        stage(PipelineStage::Idle);
        stage(PipelineStage::LengthCheck);
        if let Some(verdict) = self.classifier.check_length(prompt, settings.min_prompt_length) {
            return refuse(verdict);
        }

        stage(PipelineStage::Classifying);
        let verdict = self.classifier.classify_by_model(prompt, &settings.model).await;
        if !verdict.allowed {
            return refuse(verdict);
        }

        stage(PipelineStage::Retrieving);
        let passages = self
            .retriever
            .retrieve(prompt, kb.as_str(), settings.result_count)
            .await;

        stage(PipelineStage::Composing);
        let composed = compose_prompt(&context_block(&passages), prompt);

        stage(PipelineStage::Generating);
        let generated = self
            .generator
            .generate(&composed, &GenerationParams::from(settings))
            .await;

        let fallback = generated.trim().is_empty();
        let (response, citations) = if fallback {
            info!("generation produced no text; using fallback");
            (FALLBACK_RESPONSE.to_string(), Vec::new())
        } else {
            (generated, citations(&passages))
        };

        stage(PipelineStage::Done);
        info!(
            passages = passages.len(),
            answered = !fallback,
            "turn complete"
        );

        TurnOutcome {
            request_id,
            prompt: prompt.to_string(),
            verdict,
            response,
            citations,
            final_stage: PipelineStage::Done,
            fallback,
        }
    }
}
