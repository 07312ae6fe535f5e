//! Admission classifier.
//!
//! Two guards in front of retrieval and generation: a local length check,
//! then a single constrained model call that places the prompt in the
//! [`Taxonomy`]. Every failure path yields a refusal.

use std::sync::Arc;

use gantry_llm::{Message, MessagesRequest, Provider};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::taxonomy::{Category, CategoryParse, Taxonomy};

/// Decoding used for the classification call.
pub const CLASSIFY_TEMPERATURE: f64 = 0.0;
pub const CLASSIFY_TOP_P: f64 = 0.1;
/// Enough for a single letter.
pub const CLASSIFY_MAX_TOKENS: u32 = 10;

/// Verdict name for prompts stopped by the length guard.
pub const INVALID_INPUT: &str = "Invalid Input";
/// Verdict name for classifier output outside the taxonomy.
pub const PARSE_ERROR: &str = "Parse Error";

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Stopped locally; no model call was made.
    TooShort,
    /// The model named a known category.
    Categorized,
    /// The model answered with something that is not a category id.
    Unrecognized,
    /// The model call failed.
    BackendError,
}

/// Outcome of admission.
///
/// `allowed` implies `category_id` is set and names the taxonomy's allowed
/// category. The constructors are the only way this type is produced
/// inside the crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionVerdict {
    pub allowed: bool,
    pub category_id: Option<char>,
    /// Category name, or a diagnostic label when no category applies.
    pub name: String,
    /// Always present.
    pub reason: String,
    pub kind: VerdictKind,
}

impl AdmissionVerdict {
    pub fn too_short() -> Self {
        Self {
            allowed: false,
            category_id: None,
            name: INVALID_INPUT.into(),
            reason: "too short or empty".into(),
            kind: VerdictKind::TooShort,
        }
    }

    pub fn unrecognized(raw: &str) -> Self {
        Self {
            allowed: false,
            category_id: None,
            name: PARSE_ERROR.into(),
            reason: format!("unexpected category: {raw}"),
            kind: VerdictKind::Unrecognized,
        }
    }

    pub fn backend_error(code: &str, message: String) -> Self {
        Self {
            allowed: false,
            category_id: None,
            name: code.to_string(),
            reason: message,
            kind: VerdictKind::BackendError,
        }
    }

    pub fn categorized(category: &Category) -> Self {
        Self {
            allowed: category.allowed,
            category_id: Some(category.id),
            name: category.name.clone(),
            reason: category.description.clone(),
            kind: VerdictKind::Categorized,
        }
    }

    /// The category name when a category was assigned.
    pub fn category_name(&self) -> Option<&str> {
        self.category_id.map(|_| self.name.as_str())
    }
}

/// Classifies prompts against a taxonomy with one model call.
#[derive(Clone)]
pub struct AdmissionClassifier {
    provider: Arc<dyn Provider>,
    taxonomy: Arc<Taxonomy>,
}

impl AdmissionClassifier {
    pub fn new(provider: Arc<dyn Provider>, taxonomy: Arc<Taxonomy>) -> Self {
        Self { provider, taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Local guard. Returns a refusal when the trimmed prompt is shorter
    /// than `min_length` characters; an empty prompt is refused whatever
    /// the threshold.
    pub fn check_length(&self, prompt: &str, min_length: usize) -> Option<AdmissionVerdict> {
        let normalized = prompt.trim().to_lowercase();
        let len = normalized.chars().count();
        if len == 0 || len < min_length {
            debug!(len, min_length, "prompt rejected by length guard");
            return Some(AdmissionVerdict::too_short());
        }
        None
    }

    /// Full admission: length guard, then classification.
    pub async fn classify(&self, prompt: &str, model: &str, min_length: usize) -> AdmissionVerdict {
        if let Some(verdict) = self.check_length(prompt, min_length) {
            return verdict;
        }
        self.classify_by_model(prompt, model).await
    }

    /// The model-backed half of [`classify`](Self::classify). Called only
    /// after the length guard has passed. Makes exactly one call, no retry.
    pub async fn classify_by_model(&self, prompt: &str, model: &str) -> AdmissionVerdict {
        let instruction = self.taxonomy.instruction_block(prompt);
        let request = MessagesRequest::new(model, vec![Message::user(instruction)], CLASSIFY_MAX_TOKENS)
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_top_p(CLASSIFY_TOP_P);

        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    provider = %self.provider.name(),
                    model = %model,
                    code = %e.code(),
                    error = %e,
                    "classification call failed; refusing request"
                );
                return AdmissionVerdict::backend_error(e.code(), e.message());
            }
        };

        let raw = response.first_text().unwrap_or_default();
        match self.taxonomy.parse(raw) {
            CategoryParse::Valid(category) => {
                info!(
                    category = %category.id,
                    name = %category.name,
                    description = %category.description,
                    allowed = category.allowed,
                    "request classified"
                );
                AdmissionVerdict::categorized(category)
            }
            CategoryParse::Unrecognized(text) => {
                warn!(output = %text, "classifier returned no known category");
                AdmissionVerdict::unrecognized(&text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gantry_llm::{ContentBlock, MessagesResponse, ProviderError};
    use gantry_types::ServiceFault;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Text(&'static str),
        Throttled,
    }

    struct StubProvider {
        reply: Reply,
        calls: AtomicUsize,
        last: Mutex<Option<MessagesRequest>>,
    }

    impl StubProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &MessagesRequest) -> gantry_llm::Result<MessagesResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            match self.reply {
                Reply::Text(t) => Ok(MessagesResponse {
                    id: None,
                    content: vec![ContentBlock::text(t)],
                    stop_reason: None,
                    usage: None,
                }),
                Reply::Throttled => Err(ProviderError::from_fault(ServiceFault::from_parts(
                    429,
                    Some("ThrottlingException"),
                    r#"{"message":"Too many requests"}"#,
                ))),
            }
        }
    }

    fn classifier(stub: &Arc<StubProvider>) -> AdmissionClassifier {
        AdmissionClassifier::new(stub.clone(), Arc::new(Taxonomy::heavy_machinery().unwrap()))
    }

    const MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
    const GOOD_PROMPT: &str = "What kind of payload system does the X950 excavator have?";

    #[tokio::test]
    async fn short_prompt_never_calls_backend() {
        let stub = StubProvider::new(Reply::Text("E"));
        let c = classifier(&stub);
        for prompt in ["hi", "", "   ", "  exactly nineteen  "] {
            let v = c.classify(prompt, MODEL, 20).await;
            assert!(!v.allowed);
            assert_eq!(v.category_id, None);
            assert_eq!(v.name, INVALID_INPUT);
            assert_eq!(v.reason, "too short or empty");
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_prompt_rejected_even_with_zero_threshold() {
        let stub = StubProvider::new(Reply::Text("E"));
        let v = classifier(&stub).classify(" \t ", MODEL, 0).await;
        assert_eq!(v.kind, VerdictKind::TooShort);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn length_counts_characters_not_bytes() {
        let stub = StubProvider::new(Reply::Text("E"));
        let c = classifier(&stub);
        // 5 characters, 10 bytes.
        assert!(c.check_length("ÄÖÜßé", 5).is_none());
        assert!(c.check_length("ÄÖÜß", 5).is_some());
    }

    #[tokio::test]
    async fn allowed_category_admits() {
        let stub = StubProvider::new(Reply::Text("E"));
        let v = classifier(&stub).classify(GOOD_PROMPT, MODEL, 20).await;
        assert!(v.allowed);
        assert_eq!(v.category_id, Some('E'));
        assert_eq!(v.category_name(), Some("Valid Prompt"));
        assert_eq!(v.reason, "the request is ONLY related to heavy machinery.");
    }

    #[tokio::test]
    async fn disallowed_categories_refuse() {
        for (out, id) in [("A", 'A'), ("b", 'B'), (" C ", 'C'), ("D\n", 'D')] {
            let stub = StubProvider::new(Reply::Text(out));
            let v = classifier(&stub).classify(GOOD_PROMPT, MODEL, 20).await;
            assert!(!v.allowed, "{out:?}");
            assert_eq!(v.category_id, Some(id));
            assert_eq!(v.kind, VerdictKind::Categorized);
        }
    }

    #[tokio::test]
    async fn unknown_output_is_parse_error() {
        let stub = StubProvider::new(Reply::Text("The answer is E"));
        let v = classifier(&stub).classify(GOOD_PROMPT, MODEL, 20).await;
        assert!(!v.allowed);
        assert_eq!(v.category_id, None);
        assert_eq!(v.name, PARSE_ERROR);
        assert_eq!(v.reason, "unexpected category: The answer is E");
        assert_eq!(v.category_name(), None);
    }

    #[tokio::test]
    async fn backend_failure_fails_closed_without_retry() {
        let stub = StubProvider::new(Reply::Throttled);
        let v = classifier(&stub).classify(GOOD_PROMPT, MODEL, 20).await;
        assert!(!v.allowed);
        assert_eq!(v.category_id, None);
        assert_eq!(v.name, "ThrottlingException");
        assert_eq!(v.reason, "Too many requests");
        assert_eq!(v.kind, VerdictKind::BackendError);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_uses_constrained_decoding() {
        let stub = StubProvider::new(Reply::Text("E"));
        classifier(&stub).classify(GOOD_PROMPT, MODEL, 20).await;

        let req = stub.last.lock().unwrap().clone().unwrap();
        assert_eq!(req.model, MODEL);
        assert_eq!(req.max_tokens, CLASSIFY_MAX_TOKENS);
        assert_eq!(req.temperature, Some(0.0));
        assert_eq!(req.top_p, Some(0.1));
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        let ContentBlock::Text { text } = &req.messages[0].content[0];
        assert!(text.contains(GOOD_PROMPT));
        assert!(text.contains("Category E: Valid Prompt"));
    }

    #[tokio::test]
    async fn original_casing_reaches_the_model() {
        let stub = StubProvider::new(Reply::Text("E"));
        let prompt = "  How Do I Service The X950 Swing Motor?  ";
        classifier(&stub).classify(prompt, MODEL, 20).await;
        let req = stub.last.lock().unwrap().clone().unwrap();
        let ContentBlock::Text { text } = &req.messages[0].content[0];
        assert!(text.contains(prompt));
    }

    #[test]
    fn verdict_serializes() {
        let json = serde_json::to_value(AdmissionVerdict::too_short()).unwrap();
        assert_eq!(json["allowed"], false);
        assert_eq!(json["category_id"], serde_json::Value::Null);
        assert_eq!(json["name"], "Invalid Input");
        assert_eq!(json["kind"], "too_short");
    }
}
