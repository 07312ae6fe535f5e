//! Request pipeline.
//!
//! 1. **Admission** ([`classifier`]) -- length guard, then one model call
//!    that places the prompt in the taxonomy
//! 2. **Retrieval** ([`retriever`]) -- passages from the knowledge base
//! 3. **Composition** ([`compose`]) -- context block, prompt, citations
//! 4. **Generation** ([`generator`]) -- one completion call
//!
//! [`orchestrator`] sequences the stages for a single user turn.

pub mod classifier;
pub mod compose;
pub mod generator;
pub mod orchestrator;
pub mod retriever;
pub mod traits;

pub use classifier::{AdmissionClassifier, AdmissionVerdict, VerdictKind};
pub use compose::Citation;
pub use generator::ResponseGenerator;
pub use orchestrator::{FALLBACK_RESPONSE, Orchestrator, TurnOutcome};
pub use retriever::KnowledgeRetriever;
pub use traits::{
    GenerationParams, Generator, PipelineStage, ProgressObserver, RetrievedPassage, Retriever,
    TracingObserver,
};
