//! [`Generator`] backed by an LLM [`Provider`].

use std::sync::Arc;

use async_trait::async_trait;
use gantry_llm::{Message, MessagesRequest, Provider};
use tracing::{debug, warn};

use super::traits::{GenerationParams, Generator};

/// Single non-streaming completion per call. Errors and empty responses
/// both come back as `""`.
pub struct ResponseGenerator {
    provider: Arc<dyn Provider>,
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Generator for ResponseGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> String {
        let request = MessagesRequest::new(&params.model, vec![Message::user(prompt)], params.max_tokens)
            .with_temperature(params.temperature)
            .with_top_p(params.top_p);

        match self.provider.complete(&request).await {
            Ok(response) => {
                let text = response.first_text().unwrap_or_default().to_string();
                debug!(model = %params.model, chars = text.len(), "generation complete");
                text
            }
            Err(e) => {
                warn!(
                    provider = %self.provider.name(),
                    model = %params.model,
                    code = %e.code(),
                    error = %e,
                    "generation failed"
                );
                String::new()
            }
        }
    }
}
