//! HTTP implementation of the messages protocol.
//!
//! [`MessagesProvider`] posts a [`MessagesRequest`] to
//! `{base_url}/model/{model}/invoke` and parses the JSON body into a
//! [`MessagesResponse`]. Authentication is a bearer API key.

use std::time::Duration;

use async_trait::async_trait;
use gantry_types::ServiceFault;
use gantry_types::service::ERROR_TYPE_HEADER;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, warn};

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use crate::types::{MessagesRequest, MessagesResponse};

/// Characters escaped in a model id path segment (`:` and `/` included).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A provider that invokes models through the messages protocol.
///
/// # Construction
///
/// ```rust,ignore
/// use gantry_llm::{LlmProviderConfig, MessagesProvider};
///
/// // Key resolved from AWS_BEARER_TOKEN_BEDROCK at request time.
/// let provider = MessagesProvider::new(LlmProviderConfig::for_region("us-east-1"));
/// ```
pub struct MessagesProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl MessagesProvider {
    /// Create a new provider from configuration.
    ///
    /// The API key is resolved from `config.api_key_env` at request time.
    pub fn new(config: LlmProviderConfig) -> Self {
        let http = build_client(config.timeout_secs);
        Self {
            config,
            http,
            api_key: None,
        }
    }

    /// Create a new provider with an explicit API key.
    pub fn with_api_key(config: LlmProviderConfig, api_key: String) -> Self {
        let http = build_client(config.timeout_secs);
        Self {
            config,
            http,
            api_key: Some(api_key),
        }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    /// Invocation URL for a model.
    fn invoke_url(&self, model: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let model = utf8_percent_encode(model, PATH_SEGMENT);
        format!("{base}/model/{model}/invoke")
    }

    /// Resolve the API key: explicit key > environment variable.
    fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!("set {} env var", self.config.api_key_env))
            })
    }
}

fn build_client(timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default HTTP client");
        reqwest::Client::new()
    })
}

#[async_trait]
impl Provider for MessagesProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let api_key = self.resolve_api_key()?;
        let url = self.invoke_url(&request.model);

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "invoking model"
        );

        let mut req = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let response = req.json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_type = response
                .headers()
                .get(ERROR_TYPE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let body = response.text().await.unwrap_or_default();
            let fault = ServiceFault::from_parts(status.as_u16(), error_type.as_deref(), &body);

            warn!(
                provider = %self.config.name,
                model = %request.model,
                status = status.as_u16(),
                code = %fault.code,
                "model invocation failed"
            );
            return Err(ProviderError::from_fault(fault));
        }

        let body = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        if parsed.content.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "response has no content blocks".into(),
            ));
        }

        debug!(
            provider = %self.config.name,
            model = %request.model,
            blocks = parsed.content.len(),
            stop_reason = parsed.stop_reason.as_deref().unwrap_or("-"),
            "model response received"
        );

        Ok(parsed)
    }
}

impl std::fmt::Debug for MessagesProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
