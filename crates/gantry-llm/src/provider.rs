//! The core [`Provider`] trait for model completions.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MessagesRequest, MessagesResponse};

/// A backend that can execute a single, non-streaming completion.
///
/// [`MessagesProvider`](crate::messages::MessagesProvider) is the HTTP
/// implementation; tests substitute their own. Handles are shared across
/// concurrent requests, so implementations must be `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use gantry_llm::{Message, MessagesRequest, Provider};
///
/// async fn ask(provider: &dyn Provider) -> gantry_llm::Result<String> {
///     let request = MessagesRequest::new(
///         "anthropic.claude-3-haiku-20240307-v1:0",
///         vec![Message::user("What is a boom cylinder?")],
///         200,
///     );
///     let response = provider.complete(&request).await?;
///     Ok(response.first_text().unwrap_or_default().to_string())
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name, used in log fields.
    fn name(&self) -> &str;

    /// Execute a completion request and return the response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`](crate::error::ProviderError) if the request
    /// fails due to network issues, authentication problems, throttling,
    /// or an unparseable response.
    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}
