//! Wire types for the retrieve and catalog calls.
//!
//! The service speaks camelCase JSON; these structs rename accordingly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key some connectors use for the originating document.
pub const SOURCE_URI_METADATA_KEY: &str = "x-amz-bedrock-kb-source-uri";

// ── Retrieve request ────────────────────────────────────────────────────

/// Body of a retrieve call. The knowledge-base id travels in the URL.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    pub retrieval_query: RetrievalQuery,
    pub retrieval_configuration: RetrievalConfiguration,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetrievalQuery {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfiguration {
    pub vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchConfiguration {
    /// Upper bound on returned results.
    pub number_of_results: u32,
}

impl RetrieveRequest {
    pub fn new(query: impl Into<String>, result_count: u32) -> Self {
        Self {
            retrieval_query: RetrievalQuery { text: query.into() },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: result_count,
                },
            },
        }
    }
}

// ── Retrieve response ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    #[serde(default)]
    pub retrieval_results: Vec<RetrievalResult>,

    /// Pagination token; a single page is all the pipeline ever reads.
    #[serde(default)]
    pub next_token: Option<String>,
}

/// One scored passage.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub content: RetrievalContent,

    /// Relevance score in `[0, 1]`.
    #[serde(default)]
    pub score: f64,

    #[serde(default)]
    pub location: Option<Location>,

    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RetrievalContent {
    #[serde(default)]
    pub text: String,
}

/// Where a passage came from. Exactly one of the connector-specific
/// fields is normally set, matching `location_type`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, rename = "type")]
    pub location_type: Option<String>,
    #[serde(default)]
    pub s3_location: Option<UriLocation>,
    #[serde(default)]
    pub web_location: Option<UrlLocation>,
    #[serde(default)]
    pub confluence_location: Option<UrlLocation>,
    #[serde(default)]
    pub share_point_location: Option<UrlLocation>,
    #[serde(default)]
    pub salesforce_location: Option<UrlLocation>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UriLocation {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UrlLocation {
    pub url: String,
}

impl Location {
    fn path(&self) -> Option<&str> {
        self.s3_location
            .as_ref()
            .map(|l| l.uri.as_str())
            .or_else(|| self.web_location.as_ref().map(|l| l.url.as_str()))
            .or_else(|| self.confluence_location.as_ref().map(|l| l.url.as_str()))
            .or_else(|| self.share_point_location.as_ref().map(|l| l.url.as_str()))
            .or_else(|| self.salesforce_location.as_ref().map(|l| l.url.as_str()))
    }
}

impl RetrievalResult {
    /// Identifier of the originating document: the location's URI/URL,
    /// else the source-uri metadata entry, else the empty string.
    pub fn source_path(&self) -> String {
        self.location
            .as_ref()
            .and_then(Location::path)
            .map(String::from)
            .or_else(|| {
                self.metadata
                    .get(SOURCE_URI_METADATA_KEY)
                    .and_then(|v| v.as_str())
                    .map(String::from)
            })
            .unwrap_or_default()
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────

/// Catalog response for a knowledge base.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DescribeResponse {
    pub knowledge_base: KnowledgeBaseSummary,
}

/// The subset of catalog metadata gantry cares about.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseSummary {
    pub knowledge_base_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
