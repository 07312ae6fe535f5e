//! The [`KnowledgeBase`] trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{KnowledgeBaseSummary, RetrievalResult};

/// A managed knowledge base that can be searched and looked up.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Semantic search. Returns at most `result_count` results, ordered by
    /// the service's relevance ranking; the service may return fewer.
    async fn retrieve(
        &self,
        kb_id: &str,
        query: &str,
        result_count: u32,
    ) -> Result<Vec<RetrievalResult>>;

    /// Catalog lookup for a knowledge-base id.
    async fn describe(&self, kb_id: &str) -> Result<KnowledgeBaseSummary>;
}
