//! Test doubles for the assessment pipeline.
//!
//! Available to this crate's tests and, through the `test-support` feature, to downstream
//! crates' tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::provider::{CompletionProvider, CompletionRequest};
use crate::ProviderFailure;

/// Provider that replays a fixed script of outcomes, one per call, and records every
/// request it receives.
///
/// Calls beyond the end of the script fail with HTTP 500.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderFailure>>>,
    calls: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = Result<String, ProviderFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request received, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Model identifiers of every request received, in call order.
    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderFailure> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| {
                Err(ProviderFailure::Status {
                    status: 500,
                    body: "unscripted call".into(),
                })
            })
    }
}

/// Wrap `content` in a chat-completion response envelope.
pub fn completion_envelope(content: &str) -> String {
    json!({
        "id": "gen-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
    .to_string()
}

/// A well-formed assessment as a model would generate it.
pub fn sample_generation() -> serde_json::Value {
    json!({
        "assessment_id": "ASSESS_00000000000000000000000000000000",
        "urgency_level": "MODERATE",
        "urgency_score": 45,
        "possible_conditions": [
            {
                "condition": "Common Cold",
                "probability": 70,
                "description": "Viral infection of upper respiratory tract"
            },
            {
                "condition": "Influenza",
                "probability": 25,
                "description": "Viral infection affecting respiratory system"
            }
        ],
        "recommended_tests": ["Complete Blood Count", "Throat Culture"],
        "action_items": [
            "Rest and stay hydrated",
            "Monitor temperature regularly"
        ],
        "warning_signs": [
            "Difficulty breathing or shortness of breath",
            "Chest pain or pressure"
        ],
        "when_to_seek_care": "If symptoms worsen or persist beyond 7 days, seek medical attention"
    })
}

/// HTTP failure with the given status.
pub fn status_failure(status: u16) -> ProviderFailure {
    ProviderFailure::Status {
        status,
        body: format!("stub status {status}"),
    }
}
