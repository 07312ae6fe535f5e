//! Request and response types for the messages protocol.
//!
//! A request is a list of role-tagged messages, each holding content
//! blocks, plus decoding parameters and a fixed protocol version tag. A
//! response is a list of content blocks.

use serde::{Deserialize, Serialize};

/// Protocol version tag sent with every request.
pub const PROTOCOL_VERSION: &str = "bedrock-2023-05-31";

/// One block of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// A message in the request conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// `"user"` or `"assistant"`.
    pub role: String,

    /// The message content blocks.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message with a single text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Create an assistant message with a single text block.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: vec![ContentBlock::text(text)],
        }
    }
}

/// A completion request.
///
/// The model identifier travels in the URL, not in the body, so it is
/// skipped during serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessagesRequest {
    /// Model identifier (e.g. `anthropic.claude-3-haiku-20240307-v1:0`).
    #[serde(skip)]
    pub model: String,

    /// Protocol version tag, always [`PROTOCOL_VERSION`].
    pub anthropic_version: String,

    /// The conversation messages.
    pub messages: Vec<Message>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl MessagesRequest {
    /// Create a request with default decoding.
    pub fn new(model: impl Into<String>, messages: Vec<Message>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            anthropic_version: PROTOCOL_VERSION.into(),
            messages,
            max_tokens,
            temperature: None,
            top_p: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }
}

/// A completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesResponse {
    /// Service-assigned response id.
    #[serde(default)]
    pub id: Option<String>,

    /// Generated content blocks.
    pub content: Vec<ContentBlock>,

    /// Why generation stopped (`end_turn`, `max_tokens`, ...).
    #[serde(default)]
    pub stop_reason: Option<String>,

    /// Token accounting, when reported.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl MessagesResponse {
    /// Text of the first content block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub input_tokens: u32,

    /// Tokens generated in the response.
    #[serde(default)]
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let req = MessagesRequest::new(
            "anthropic.claude-3-haiku-20240307-v1:0",
            vec![Message::user("hello")],
            10,
        )
        .with_temperature(0.0)
        .with_top_p(0.1);

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "anthropic_version": "bedrock-2023-05-31",
                "messages": [
                    { "role": "user", "content": [{ "type": "text", "text": "hello" }] }
                ],
                "max_tokens": 10,
                "temperature": 0.0,
                "top_p": 0.1
            })
        );
    }

    #[test]
    fn request_omits_unset_decoding() {
        let req = MessagesRequest::new("m", vec![Message::assistant("hi")], 100);
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("temperature").is_none());
        assert!(value.get("top_p").is_none());
        assert!(value.get("model").is_none());
        assert_eq!(value["messages"][0]["role"], "assistant");
    }

    #[test]
    fn response_parses_minimal_body() {
        let resp: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"E"}]}"#).unwrap();
        assert_eq!(resp.first_text(), Some("E"));
        assert!(resp.id.is_none());
        assert!(resp.usage.is_none());
    }

    #[test]
    fn response_parses_full_body() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "The X950 uses a hydraulic payload system."}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 42, "output_tokens": 9}
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id.as_deref(), Some("msg_01"));
        assert_eq!(resp.stop_reason.as_deref(), Some("end_turn"));
        assert_eq!(
            resp.usage,
            Some(Usage {
                input_tokens: 42,
                output_tokens: 9
            })
        );
    }

    #[test]
    fn empty_content_has_no_text() {
        let resp: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(resp.first_text(), None);
    }
}
