//! # gantry-types
//!
//! Shared type definitions for the gantry heavy-machinery assistant.
//!
//! Every other gantry crate depends on this one. It contains:
//!
//! - **[`error`]** -- [`GantryError`] and the crate-wide [`Result`] alias
//! - **[`config`]** -- Configuration schema, range validation and file discovery
//! - **[`conversation`]** -- Conversation turns exchanged with the front end
//! - **[`service`]** -- Error responses shared by the hosted-service clients

pub mod config;
pub mod conversation;
pub mod error;
pub mod service;

pub use config::Config;
pub use conversation::{ConversationTurn, Role};
pub use error::{GantryError, Result};
pub use service::ServiceFault;
