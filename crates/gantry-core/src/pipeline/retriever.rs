//! [`Retriever`] backed by a [`KnowledgeBase`] client.

use std::sync::Arc;

use async_trait::async_trait;
use gantry_kb::{KnowledgeBase, RetrievalResult};
use tracing::{debug, warn};

use super::traits::{RetrievedPassage, Retriever};

/// Maps knowledge-base results into [`RetrievedPassage`]s and degrades
/// every failure to "no context".
pub struct KnowledgeRetriever {
    kb: Arc<dyn KnowledgeBase>,
}

impl KnowledgeRetriever {
    pub fn new(kb: Arc<dyn KnowledgeBase>) -> Self {
        Self { kb }
    }
}

impl From<RetrievalResult> for RetrievedPassage {
    fn from(result: RetrievalResult) -> Self {
        let source_path = result.source_path();
        Self {
            text: result.content.text,
            confidence_score: result.score,
            source_path,
        }
    }
}

#[async_trait]
impl Retriever for KnowledgeRetriever {
    async fn retrieve(&self, query: &str, kb_id: &str, result_count: u32) -> Vec<RetrievedPassage> {
        match self.kb.retrieve(kb_id, query, result_count).await {
            Ok(results) => {
                debug!(kb_id, passages = results.len(), "retrieved context");
                results.into_iter().map(RetrievedPassage::from).collect()
            }
            Err(e) => {
                warn!(kb_id, code = %e.code(), error = %e, "retrieval failed; continuing without context");
                Vec::new()
            }
        }
    }

    async fn validate_kb_id(&self, kb_id: &str) -> bool {
        match self.kb.describe(kb_id).await {
            Ok(summary) => {
                debug!(
                    kb_id,
                    name = summary.name.as_deref().unwrap_or("-"),
                    status = summary.status.as_deref().unwrap_or("-"),
                    "knowledge base found"
                );
                true
            }
            Err(e) => {
                warn!(kb_id, code = %e.code(), "knowledge base probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_kb::{KbError, KnowledgeBaseSummary};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubKb {
        fail: bool,
        calls: AtomicUsize,
    }

    fn result(text: &str, score: f64, uri: &str) -> RetrievalResult {
        serde_json::from_value(serde_json::json!({
            "content": { "text": text },
            "score": score,
            "location": { "type": "S3", "s3Location": { "uri": uri } }
        }))
        .unwrap()
    }

    #[async_trait]
    impl KnowledgeBase for StubKb {
        async fn retrieve(
            &self,
            _kb_id: &str,
            _query: &str,
            _result_count: u32,
        ) -> gantry_kb::Result<Vec<RetrievalResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(KbError::Timeout);
            }
            Ok(vec![
                result("Boom cylinders use ISO VG 46.", 0.9, "s3://kb/hydraulics.pdf"),
                result("Grease every 10 hours.", 0.6, "s3://kb/maintenance.pdf"),
            ])
        }

        async fn describe(&self, kb_id: &str) -> gantry_kb::Result<KnowledgeBaseSummary> {
            if self.fail {
                return Err(KbError::InvalidId(kb_id.into()));
            }
            Ok(KnowledgeBaseSummary {
                knowledge_base_id: kb_id.into(),
                name: None,
                status: Some("ACTIVE".into()),
            })
        }
    }

    fn retriever(fail: bool) -> (KnowledgeRetriever, Arc<StubKb>) {
        let kb = Arc::new(StubKb {
            fail,
            calls: AtomicUsize::new(0),
        });
        (KnowledgeRetriever::new(kb.clone()), kb)
    }

    #[tokio::test]
    async fn maps_results_in_order() {
        let (r, _) = retriever(false);
        let passages = r.retrieve("hydraulic oil", "KB1", 3).await;
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "Boom cylinders use ISO VG 46.");
        assert_eq!(passages[0].confidence_score, 0.9);
        assert_eq!(passages[0].source_path, "s3://kb/hydraulics.pdf");
        assert_eq!(passages[1].source_path, "s3://kb/maintenance.pdf");
    }

    #[tokio::test]
    async fn identical_calls_map_identically() {
        let (r, kb) = retriever(false);
        let a = r.retrieve("q", "KB1", 3).await;
        let b = r.retrieve("q", "KB1", 3).await;
        assert_eq!(a, b);
        assert_eq!(kb.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_degrades_to_empty() {
        let (r, kb) = retriever(true);
        assert!(r.retrieve("q", "KB1", 3).await.is_empty());
        assert_eq!(kb.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn validate_maps_any_error_to_false() {
        let (ok, _) = retriever(false);
        assert!(ok.validate_kb_id("KB1").await);
        let (bad, _) = retriever(true);
        assert!(!bad.validate_kb_id("KB1").await);
    }
}
