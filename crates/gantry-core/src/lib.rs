//! Core engine for gantry.
//!
//! Decides whether a user request may reach the knowledge base and the
//! model at all, then runs retrieval-augmented generation for the
//! requests that pass.
//!
//! - [`taxonomy`] -- the fixed table of intent categories
//! - [`pipeline`] -- admission classifier, retrieval/generation adapters,
//!   prompt composition and the per-turn orchestrator
//! - [`kb_gate`] -- knowledge-base id validation in front of the pipeline
//! - [`bootstrap`] -- wiring from a loaded [`Config`](gantry_types::Config)

pub mod bootstrap;
pub mod kb_gate;
pub mod pipeline;
pub mod taxonomy;

pub use bootstrap::{Services, build_services};
pub use kb_gate::{KbGate, ValidatedKbId};
pub use pipeline::{
    AdmissionClassifier, AdmissionVerdict, Citation, FALLBACK_RESPONSE, Orchestrator,
    TurnOutcome,
};
pub use taxonomy::{Category, CategoryParse, Taxonomy};
