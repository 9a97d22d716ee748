//! Inference provider abstraction.
//!
//! The pipeline talks to the provider through [`CompletionProvider`], one call per model
//! candidate. Implementations only report whether the call succeeded at the HTTP level;
//! interpreting the body is left to the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ProviderFailure;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Output format directive (`{"type": "json_object"}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".into(),
        }
    }
}

/// Body of one chat-completion call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Build a JSON-mode request for `model`.
    pub fn new(model: &str, messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            model: model.to_string(),
            messages,
            temperature,
            response_format: ResponseFormat::json_object(),
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue one chat-completion call.
    ///
    /// # Returns
    /// The raw response body of a success (2xx) response.
    ///
    /// # Errors
    /// Returns a [`ProviderFailure`] for transport errors, timeouts and non-success statuses.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure>;
}

#[derive(Deserialize)]
struct CompletionEnvelope {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Extract the first choice's message content from an OpenAI-style envelope.
///
/// Returns `None` if the body is not JSON, has no choices, or the first choice has no
/// textual content.
pub fn extract_content(body: &str) -> Option<String> {
    let envelope: CompletionEnvelope = serde_json::from_str(body).ok()?;
    envelope.choices.into_iter().next()?.message.content
}
