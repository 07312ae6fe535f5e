//! Provider connection settings.

use std::collections::HashMap;

use gantry_types::config::ServiceConfig;
use serde::{Deserialize, Serialize};

/// How to reach a model invocation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Human-readable provider name, used in log fields.
    pub name: String,

    /// Base URL of the invocation service
    /// (e.g. `"https://bedrock-runtime.us-east-1.amazonaws.com"`).
    pub base_url: String,

    /// Environment variable that holds the bearer API key.
    pub api_key_env: String,

    /// Extra HTTP headers to include in every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds. `None` uses the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmProviderConfig {
    /// Regional endpoint with the default API key variable.
    pub fn for_region(region: &str) -> Self {
        Self::from_service(&ServiceConfig {
            region: region.into(),
            ..ServiceConfig::default()
        })
    }

    /// Derive the provider settings from the service section of the config.
    pub fn from_service(service: &ServiceConfig) -> Self {
        Self {
            name: "bedrock-runtime".into(),
            base_url: service.runtime_endpoint(),
            api_key_env: service.api_key_env.clone(),
            headers: HashMap::new(),
            timeout_secs: service.timeout_secs,
        }
    }
}
