//! HTTP implementation of [`KnowledgeBase`].
//!
//! Retrieval posts to `{runtime_url}/knowledgebases/{id}/retrieve`; the
//! catalog lookup is a GET on `{catalog_url}/knowledgebases/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use gantry_types::ServiceFault;
use gantry_types::service::ERROR_TYPE_HEADER;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::KnowledgeBase;
use crate::config::KbClientConfig;
use crate::error::{KbError, Result};
use crate::types::{
    DescribeResponse, KnowledgeBaseSummary, RetrievalResult, RetrieveRequest, RetrieveResponse,
};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Knowledge-base client backed by `reqwest`.
pub struct HttpKnowledgeBase {
    config: KbClientConfig,
    http: reqwest::Client,
    api_key: Option<String>,
}

impl HttpKnowledgeBase {
    pub fn new(config: KbClientConfig) -> Self {
        let http = build_client(config.timeout_secs);
        Self {
            config,
            http,
            api_key: None,
        }
    }

    pub fn with_api_key(config: KbClientConfig, api_key: String) -> Self {
        let http = build_client(config.timeout_secs);
        Self {
            config,
            http,
            api_key: Some(api_key),
        }
    }

    pub fn config(&self) -> &KbClientConfig {
        &self.config
    }

    fn retrieve_url(&self, kb_id: &str) -> Result<String> {
        let segment = encode_id(kb_id)?;
        let base = self.config.runtime_url.trim_end_matches('/');
        Ok(format!("{base}/knowledgebases/{segment}/retrieve"))
    }

    fn describe_url(&self, kb_id: &str) -> Result<String> {
        let segment = encode_id(kb_id)?;
        let base = self.config.catalog_url.trim_end_matches('/');
        Ok(format!("{base}/knowledgebases/{segment}"))
    }

    fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KbError::NotConfigured(format!("set {} env var", self.config.api_key_env)))
    }

    /// Send a prepared request and decode a JSON body, mapping error
    /// responses to [`KbError`].
    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        kb_id: &str,
        op: &'static str,
    ) -> Result<T> {
        let api_key = self.resolve_api_key()?;
        let response = req
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Accept", "application/json")
            .send()
            .await?;
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
                kb_id,
                op,
                status = status.as_u16(),
                code = %fault.code,
                "knowledge base call failed"
            );
            return Err(KbError::from_fault(fault));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| KbError::InvalidResponse(format!("failed to parse {op} response: {e}")))
    }
}

/// Percent-encode a knowledge-base id for use as one path segment.
/// Blank ids and ids containing whitespace or `/` are rejected before any
/// request is made.
fn encode_id(kb_id: &str) -> Result<String> {
    if kb_id.is_empty() || kb_id.chars().any(|c| c == '/' || c.is_whitespace() || c.is_control()) {
        return Err(KbError::InvalidId(kb_id.to_string()));
    }
    Ok(utf8_percent_encode(kb_id, PATH_SEGMENT).to_string())
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
impl KnowledgeBase for HttpKnowledgeBase {
    async fn retrieve(
        &self,
        kb_id: &str,
        query: &str,
        result_count: u32,
    ) -> Result<Vec<RetrievalResult>> {
        let url = self.retrieve_url(kb_id)?;
        debug!(kb_id, result_count, query_len = query.len(), "retrieving passages");

        let req = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&RetrieveRequest::new(query, result_count));
        let parsed: RetrieveResponse = self.send(req, kb_id, "retrieve").await?;

        let mut results = parsed.retrieval_results;
        // The service is asked for at most `result_count`; enforce it anyway.
        results.truncate(result_count as usize);

        debug!(kb_id, returned = results.len(), "retrieval complete");
        Ok(results)
    }

    async fn describe(&self, kb_id: &str) -> Result<KnowledgeBaseSummary> {
        let url = self.describe_url(kb_id)?;
        debug!(kb_id, "describing knowledge base");

        let parsed: DescribeResponse = self.send(self.http.get(&url), kb_id, "describe").await?;
        Ok(parsed.knowledge_base)
    }
}

impl std::fmt::Debug for HttpKnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKnowledgeBase")
            .field("runtime_url", &self.config.runtime_url)
            .field("catalog_url", &self.config.catalog_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
