//! # HealthSense Core
//!
//! Core logic for the HealthSense symptom-analysis service.
//!
//! This crate turns a symptom description into a validated risk assessment by delegating the
//! medical reasoning to an external chat-completion provider:
//! - Request validation and prompt construction
//! - Ordered model fallback against one provider
//! - Markdown fence stripping, JSON parsing and schema validation of the model output
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `healthsense-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod openrouter;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod sanitize;
pub mod validation;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Wire types are shared with the REST layer.
pub use api_shared::types;

pub use config::{cors_origins_from_env_value, ProviderConfig, ProviderEnv};
pub use error::{
    AssessmentError, CandidateFailure, ConfigError, ConfigResult, PipelineResult,
    ProviderFailure,
};
pub use healthsense_uuid::AssessmentId;
pub use openrouter::OpenRouterClient;
pub use pipeline::AssessmentPipeline;
pub use prompt::Prompt;
pub use provider::{CompletionProvider, CompletionRequest};
