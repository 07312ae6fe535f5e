//! Configuration schema types.
//!
//! The knobs exposed to whoever drives the assistant: which model answers,
//! its decoding parameters, the admission threshold, how many passages to
//! retrieve, and where the hosted services live. All structs accept both
//! `snake_case` and `camelCase` field names; unknown fields are ignored.
//!
//! # Module Structure
//!
//! - [`loader`] -- Config file discovery and key normalization

pub mod loader;

use serde::{Deserialize, Serialize};

use crate::error::{GantryError, Result};

/// Model identifiers the assistant may be pointed at.
pub const SUPPORTED_MODELS: &[&str] = &[
    "anthropic.claude-3-haiku-20240307-v1:0",
    "anthropic.claude-3-sonnet-20240229-v1:0",
    "anthropic.claude-3-5-sonnet-20240620-v1:0",
    "anthropic.claude-3-5-haiku-20241022-v1:0",
];

/// Tolerance used when checking that a float lands on its slider step.
const STEP_EPSILON: f64 = 1e-9;

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for gantry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Model selection and decoding parameters.
    #[serde(default)]
    pub chat: ChatSettings,

    /// Knowledge base queried for context. Must pass the catalog probe
    /// before any prompt is processed.
    #[serde(default, alias = "knowledgeBaseId")]
    pub knowledge_base_id: Option<String>,

    /// Hosted service endpoints and credentials.
    #[serde(default)]
    pub service: ServiceConfig,
}

impl Config {
    /// Check every setting against its allowed range.
    pub fn validate(&self) -> Result<()> {
        self.chat.validate()?;
        self.service.validate()
    }

    /// The configured knowledge-base id, trimmed, or `None` when blank.
    pub fn knowledge_base_id(&self) -> Option<&str> {
        self.knowledge_base_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

// ── Chat settings ────────────────────────────────────────────────────────

/// Per-turn model selection and decoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSettings {
    /// Model identifier, one of [`SUPPORTED_MODELS`].
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature in `[0, 1]`, step 0.1.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling threshold in `[0, 1]`, step 0.001.
    #[serde(default = "default_top_p", alias = "topP")]
    pub top_p: f64,

    /// Prompts shorter than this (after trimming) are rejected locally.
    #[serde(default = "default_min_prompt_length", alias = "minPromptLength")]
    pub min_prompt_length: usize,

    /// Number of passages requested from the knowledge base.
    #[serde(default = "default_result_count", alias = "resultCount")]
    pub result_count: u32,

    /// Token budget for the generated answer.
    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    SUPPORTED_MODELS[0].into()
}
fn default_temperature() -> f64 {
    0.1
}
fn default_top_p() -> f64 {
    0.1
}
fn default_min_prompt_length() -> usize {
    20
}
fn default_result_count() -> u32 {
    3
}
fn default_max_tokens() -> u32 {
    500
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            min_prompt_length: default_min_prompt_length(),
            result_count: default_result_count(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ChatSettings {
    /// Check each value against its range and step.
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_MODELS.contains(&self.model.as_str()) {
            return Err(GantryError::config(format!(
                "unsupported model '{}' (expected one of: {})",
                self.model,
                SUPPORTED_MODELS.join(", ")
            )));
        }
        check_float("temperature", self.temperature, 0.0, 1.0, 0.1)?;
        check_float("top_p", self.top_p, 0.0, 1.0, 0.001)?;
        check_int(
            "min_prompt_length",
            self.min_prompt_length as u64,
            5,
            95,
            5,
        )?;
        check_int("result_count", u64::from(self.result_count), 1, 10, 1)?;
        check_int("max_tokens", u64::from(self.max_tokens), 100, 1000, 50)
    }
}

fn check_float(name: &str, value: f64, min: f64, max: f64, step: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(GantryError::config(format!(
            "{name} {value} outside [{min}, {max}]"
        )));
    }
    let steps = (value / step).round();
    if (steps * step - value).abs() > STEP_EPSILON {
        return Err(GantryError::config(format!(
            "{name} {value} is not a multiple of {step}"
        )));
    }
    Ok(())
}

fn check_int(name: &str, value: u64, min: u64, max: u64, step: u64) -> Result<()> {
    if value < min || value > max {
        return Err(GantryError::config(format!(
            "{name} {value} outside [{min}, {max}]"
        )));
    }
    if value % step != 0 {
        return Err(GantryError::config(format!(
            "{name} {value} is not a multiple of {step}"
        )));
    }
    Ok(())
}

// ── Service endpoints ────────────────────────────────────────────────────

/// Where the hosted generation, retrieval and catalog services live.
///
/// Endpoints default to the regional hostnames derived from `region`;
/// the explicit URL fields override them (useful for proxies and tests).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Service region used to derive default endpoints.
    #[serde(default = "default_region")]
    pub region: String,

    /// Environment variable holding the bearer API key.
    #[serde(default = "default_api_key_env", alias = "apiKeyEnv")]
    pub api_key_env: String,

    /// Generation (model invoke) endpoint override.
    #[serde(default, alias = "runtimeUrl")]
    pub runtime_url: Option<String>,

    /// Retrieval endpoint override.
    #[serde(default, alias = "agentRuntimeUrl")]
    pub agent_runtime_url: Option<String>,

    /// Knowledge-base catalog endpoint override.
    #[serde(default, alias = "catalogUrl")]
    pub catalog_url: Option<String>,

    /// Per-request timeout in seconds. `None` leaves the client default.
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

fn default_region() -> String {
    "us-east-1".into()
}
fn default_api_key_env() -> String {
    "AWS_BEARER_TOKEN_BEDROCK".into()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            api_key_env: default_api_key_env(),
            runtime_url: None,
            agent_runtime_url: None,
            catalog_url: None,
            timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(GantryError::config("service.region is empty"));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(GantryError::config("service.api_key_env is empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(GantryError::config("service.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Base URL of the model invocation service.
    pub fn runtime_endpoint(&self) -> String {
        self.runtime_url
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    /// Base URL of the knowledge-base retrieval service.
    pub fn agent_runtime_endpoint(&self) -> String {
        self.agent_runtime_url.clone().unwrap_or_else(|| {
            format!("https://bedrock-agent-runtime.{}.amazonaws.com", self.region)
        })
    }

    /// Base URL of the knowledge-base catalog service.
    pub fn catalog_endpoint(&self) -> String {
        self.catalog_url
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-agent.{}.amazonaws.com", self.region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_assistant_ui() {
        let cfg = Config::default();
        assert_eq!(cfg.chat.model, "anthropic.claude-3-haiku-20240307-v1:0");
        assert_eq!(cfg.chat.temperature, 0.1);
        assert_eq!(cfg.chat.top_p, 0.1);
        assert_eq!(cfg.chat.min_prompt_length, 20);
        assert_eq!(cfg.chat.result_count, 3);
        assert_eq!(cfg.chat.max_tokens, 500);
        assert!(cfg.knowledge_base_id.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialize_empty_object_gives_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn deserialize_camel_case_aliases() {
        let json = r#"{
            "knowledgeBaseId": "KB42",
            "chat": { "topP": 0.25, "minPromptLength": 10, "maxTokens": 300, "resultCount": 5 },
            "service": { "runtimeUrl": "http://localhost:9000" }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.knowledge_base_id.as_deref(), Some("KB42"));
        assert_eq!(cfg.chat.top_p, 0.25);
        assert_eq!(cfg.chat.min_prompt_length, 10);
        assert_eq!(cfg.chat.max_tokens, 300);
        assert_eq!(cfg.chat.result_count, 5);
        assert_eq!(cfg.service.runtime_endpoint(), "http://localhost:9000");
    }

    #[test]
    fn knowledge_base_id_is_trimmed_and_blank_is_none() {
        let mut cfg = Config::default();
        cfg.knowledge_base_id = Some("  KB1  ".into());
        assert_eq!(cfg.knowledge_base_id(), Some("KB1"));
        cfg.knowledge_base_id = Some("   ".into());
        assert_eq!(cfg.knowledge_base_id(), None);
    }

    #[test]
    fn rejects_unknown_model() {
        let mut chat = ChatSettings::default();
        chat.model = "gpt-4o".into();
        let err = chat.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported model"));
    }

    #[test]
    fn every_supported_model_validates() {
        for model in SUPPORTED_MODELS {
            let chat = ChatSettings {
                model: (*model).into(),
                ..ChatSettings::default()
            };
            assert!(chat.validate().is_ok(), "{model} should validate");
        }
    }

    #[test]
    fn temperature_range_and_step() {
        let mut chat = ChatSettings::default();
        for ok in [0.0, 0.3, 0.7, 1.0] {
            chat.temperature = ok;
            assert!(chat.validate().is_ok(), "temperature {ok}");
        }
        chat.temperature = 1.1;
        assert!(chat.validate().is_err());
        chat.temperature = 0.35;
        assert!(chat.validate().is_err());
        chat.temperature = f64::NAN;
        assert!(chat.validate().is_err());
    }

    #[test]
    fn top_p_allows_thousandths() {
        let mut chat = ChatSettings::default();
        chat.top_p = 0.123;
        assert!(chat.validate().is_ok());
        chat.top_p = 0.1235;
        assert!(chat.validate().is_err());
        chat.top_p = -0.001;
        assert!(chat.validate().is_err());
    }

    #[test]
    fn min_prompt_length_range_and_step() {
        let mut chat = ChatSettings::default();
        chat.min_prompt_length = 5;
        assert!(chat.validate().is_ok());
        chat.min_prompt_length = 95;
        assert!(chat.validate().is_ok());
        chat.min_prompt_length = 100;
        assert!(chat.validate().is_err());
        chat.min_prompt_length = 22;
        assert!(chat.validate().is_err());
        chat.min_prompt_length = 0;
        assert!(chat.validate().is_err());
    }

    #[test]
    fn result_count_range() {
        let mut chat = ChatSettings::default();
        chat.result_count = 1;
        assert!(chat.validate().is_ok());
        chat.result_count = 10;
        assert!(chat.validate().is_ok());
        chat.result_count = 0;
        assert!(chat.validate().is_err());
        chat.result_count = 11;
        assert!(chat.validate().is_err());
    }

    #[test]
    fn max_tokens_range_and_step() {
        let mut chat = ChatSettings::default();
        chat.max_tokens = 150;
        assert!(chat.validate().is_ok());
        chat.max_tokens = 175;
        assert!(chat.validate().is_err());
        chat.max_tokens = 1050;
        assert!(chat.validate().is_err());
    }

    #[test]
    fn default_endpoints_follow_region() {
        let svc = ServiceConfig {
            region: "eu-west-1".into(),
            ..ServiceConfig::default()
        };
        assert_eq!(
            svc.runtime_endpoint(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            svc.agent_runtime_endpoint(),
            "https://bedrock-agent-runtime.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            svc.catalog_endpoint(),
            "https://bedrock-agent.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = Config::default();
        cfg.service.timeout_secs = Some(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serde_roundtrip_preserves_values() {
        let mut cfg = Config::default();
        cfg.knowledge_base_id = Some("KB9".into());
        cfg.chat.temperature = 0.4;
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
