//! Knowledge-base client for gantry.
//!
//! Two calls against a managed knowledge base: `retrieve` (semantic search
//! returning scored passages) and `describe` (a catalog lookup used to
//! confirm that a knowledge-base id exists). Indexing and embedding live
//! entirely in the hosted service.
//!
//! - [`KnowledgeBase`] trait is the seam the pipeline depends on
//! - [`HttpKnowledgeBase`] implements it over HTTP
//! - [`KbError`] classifies failures with a service error code

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::KnowledgeBase;
pub use config::KbClientConfig;
pub use error::{KbError, Result};
pub use http::HttpKnowledgeBase;
pub use types::{KnowledgeBaseSummary, RetrievalResult, RetrieveRequest, RetrieveResponse};
