//! Model invocation client for gantry.
//!
//! This crate talks to a hosted text-generation service using the
//! messages protocol (a list of role-tagged content blocks in, a list of
//! content blocks out). It knows nothing about admission or retrieval; the
//! pipeline in `gantry-core` drives it.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the single-shot completion interface
//! - [`MessagesProvider`] implements it over HTTP
//! - [`LlmProviderConfig`] describes how to reach the service
//! - [`ProviderError`] classifies failures and exposes a service error code
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gantry_llm::{LlmProviderConfig, Message, MessagesProvider, MessagesRequest, Provider};
//!
//! let provider = MessagesProvider::new(LlmProviderConfig::for_region("us-east-1"));
//! let request = MessagesRequest::new(
//!     "anthropic.claude-3-haiku-20240307-v1:0",
//!     vec![Message::user("What does a swing bearing do?")],
//!     500,
//! );
//! let response = provider.complete(&request).await?;
//! println!("{}", response.first_text().unwrap_or_default());
//! ```

pub mod config;
pub mod error;
pub mod messages;
pub mod provider;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use messages::MessagesProvider;
pub use provider::Provider;
pub use types::{ContentBlock, Message, MessagesRequest, MessagesResponse, Usage};
