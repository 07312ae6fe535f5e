//! Knowledge-base client connection settings.

use gantry_types::config::ServiceConfig;
use serde::{Deserialize, Serialize};

/// Endpoints and credentials for the retrieval and catalog services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbClientConfig {
    /// Base URL of the retrieval service.
    pub runtime_url: String,

    /// Base URL of the catalog service.
    pub catalog_url: String,

    /// Environment variable that holds the bearer API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl KbClientConfig {
    pub fn from_service(service: &ServiceConfig) -> Self {
        Self {
            runtime_url: service.agent_runtime_endpoint(),
            catalog_url: service.catalog_endpoint(),
            api_key_env: service.api_key_env.clone(),
            timeout_secs: service.timeout_secs,
        }
    }
}
