//! Dependency wiring.
//!
//! [`build_services`] turns a [`Config`] into the long-lived handles a
//! front end needs. The service clients are created once and shared
//! read-only across turns.
//!
//! ```rust,ignore
//! use gantry_core::bootstrap::build_services;
//! use gantry_types::config::loader::load_config;
//!
//! let config = load_config()?;
//! let mut services = build_services(&config)?;
//! let kb = services.gate.check(config.knowledge_base_id().unwrap_or("")).await?;
//! let outcome = services.orchestrator.handle_user_turn(prompt, &config.chat, &kb).await;
//! ```

use std::sync::Arc;

use gantry_kb::{HttpKnowledgeBase, KbClientConfig, KnowledgeBase};
use gantry_llm::{LlmProviderConfig, MessagesProvider, Provider};
use gantry_types::{Config, Result};
use tracing::debug;

use crate::kb_gate::KbGate;
use crate::pipeline::{
    AdmissionClassifier, KnowledgeRetriever, Orchestrator, ResponseGenerator, Retriever,
};
use crate::taxonomy::Taxonomy;

/// Handles built from configuration.
pub struct Services {
    pub orchestrator: Orchestrator,
    pub gate: KbGate,
    pub taxonomy: Arc<Taxonomy>,
}

/// Build services talking to the hosted endpoints named in `config`.
pub fn build_services(config: &Config) -> Result<Services> {
    let llm_config = LlmProviderConfig::from_service(&config.service);
    let kb_config = KbClientConfig::from_service(&config.service);
    debug!(
        runtime = %llm_config.base_url,
        retrieval = %kb_config.runtime_url,
        catalog = %kb_config.catalog_url,
        "building service clients"
    );

    let provider: Arc<dyn Provider> = Arc::new(MessagesProvider::new(llm_config));
    let kb: Arc<dyn KnowledgeBase> = Arc::new(HttpKnowledgeBase::new(kb_config));
    Ok(build_services_with(provider, kb, Taxonomy::heavy_machinery()?))
}

/// Build services over arbitrary clients. Classification and generation
/// share `provider`.
pub fn build_services_with(
    provider: Arc<dyn Provider>,
    kb: Arc<dyn KnowledgeBase>,
    taxonomy: Taxonomy,
) -> Services {
    let taxonomy = Arc::new(taxonomy);
    let retriever: Arc<dyn Retriever> = Arc::new(KnowledgeRetriever::new(kb));
    let classifier = AdmissionClassifier::new(provider.clone(), taxonomy.clone());
    let orchestrator = Orchestrator::new(
        classifier,
        retriever.clone(),
        Arc::new(ResponseGenerator::new(provider)),
    );

    Services {
        orchestrator,
        gate: KbGate::new(retriever),
        taxonomy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_types::config::ServiceConfig;

    #[test]
    fn builds_from_default_config() {
        let services = build_services(&Config::default()).unwrap();
        assert_eq!(services.taxonomy.len(), 5);
        assert!(services.gate.current().is_none());
        assert_eq!(services.orchestrator.classifier().taxonomy().len(), 5);
    }

    #[test]
    fn builds_with_endpoint_overrides() {
        let config = Config {
            service: ServiceConfig {
                runtime_url: Some("http://127.0.0.1:1".into()),
                agent_runtime_url: Some("http://127.0.0.1:2".into()),
                catalog_url: Some("http://127.0.0.1:3".into()),
                ..ServiceConfig::default()
            },
            ..Config::default()
        };
        let services = build_services(&config).unwrap();
        assert!(services.gate.current().is_none());
    }
}
