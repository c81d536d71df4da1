//! Chat message types for the wire protocol
//!
//! Defines the OpenAI-compatible request and response structures served by
//! the gateway. Message content is either a plain string or a sequence of
//! typed parts; the union is modeled explicitly and only flattened for
//! transcript display, never for protocol decisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

/// Request body for chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// ID of the model the client believes it is talking to
    pub model: String,
    /// Ordered list of messages in the conversation
    pub messages: Vec<Message>,
    /// Maximum tokens to generate (advisory; the operator is not a model)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for sampling (advisory)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: String,
    /// Content of the message
    pub content: MessageContent,
}

impl Message {
    /// Create a new user message with plain-text content
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a new system message with plain-text content
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: "system".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Message content: a plain string or an ordered sequence of typed parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Structured content parts
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten content to a single display string.
    ///
    /// Structured parts are joined with single spaces. Used only for
    /// rendering the transcript in the operator session.
    pub fn display_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// A single typed content part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part type, e.g. "text"
    #[serde(rename = "type")]
    pub part_type: String,
    /// Text payload of the part
    pub text: String,
}

/// Response from chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Unique identifier for the response
    pub id: String,
    /// Type of response, always "chat.completion"
    pub object: String,
    /// Unix timestamp of creation
    pub created: i64,
    /// Model echoed verbatim from the request
    pub model: String,
    /// Singleton list of completions
    pub choices: Vec<Choice>,
}

/// A single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    pub index: u32,
    /// The generated message
    pub message: ResponseMessage,
    /// Reason for stopping, always "stop"
    pub finish_reason: String,
}

/// The assistant message carried in a choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Always "assistant"
    pub role: String,
    /// The reply text
    pub content: String,
}

impl ChatResponse {
    /// Build the standard single-choice response for a reply text.
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        ChatResponse {
            id: format!("chatcmpl-{}", Uuid::new_v4()),
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: "assistant".to_string(),
                    content: content.into(),
                },
                finish_reason: "stop".to_string(),
            }],
        }
    }
}
