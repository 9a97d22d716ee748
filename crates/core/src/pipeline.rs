//! Symptom assessment pipeline.
//!
//! One call to [`AssessmentPipeline::analyze`] performs the whole flow:
//! 1. allocate the assessment identifier
//! 2. build the prompt
//! 3. try each model candidate in order until one answers with a success status
//! 4. pull the completion text out of the provider envelope
//! 5. strip markdown fencing, parse JSON, validate against the schema
//! 6. return the assessment under the server-generated identifier
//!
//! Only step 3 recovers from failure, and only by moving to the next candidate. Every other
//! failure is returned to the caller as a distinct [`AssessmentError`] variant.

use std::sync::Arc;

use api_shared::{SymptomAssessment, SymptomRequest};
use healthsense_uuid::AssessmentId;

use crate::constants::{API_KEY_ENV, ENVELOPE_EXCERPT_CHARS, MALFORMED_EXCERPT_CHARS};
use crate::error::excerpt;
use crate::prompt::Prompt;
use crate::provider::{extract_content, ChatMessage, CompletionProvider, CompletionRequest};
use crate::sanitize::strip_code_fence;
use crate::validation::{validate_generated, validate_request};
use crate::{
    AssessmentError, CandidateFailure, ConfigResult, OpenRouterClient, PipelineResult,
    ProviderConfig, ProviderFailure,
};

/// Success response from one candidate.
struct CandidateResponse {
    model: String,
    body: String,
}

/// Turns symptom requests into validated assessments.
///
/// The pipeline holds no per-request state; one instance is shared by all concurrent
/// requests.
#[derive(Clone)]
pub struct AssessmentPipeline {
    config: Arc<ProviderConfig>,
    provider: Arc<dyn CompletionProvider>,
}

impl AssessmentPipeline {
    /// Create a pipeline over an explicit provider.
    pub fn new(config: Arc<ProviderConfig>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }

    /// Create a pipeline backed by [`OpenRouterClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn from_config(config: ProviderConfig) -> ConfigResult<Self> {
        let client = OpenRouterClient::new(&config)?;
        Ok(Self::new(Arc::new(config), Arc::new(client)))
    }

    /// The provider configuration this pipeline was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Analyse `request` under a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// See [`AssessmentPipeline::analyze_as`].
    pub async fn analyze(&self, request: &SymptomRequest) -> PipelineResult<SymptomAssessment> {
        self.analyze_as(AssessmentId::new(), request).await
    }

    /// Analyse `request`, returning an assessment identified by `assessment_id`.
    ///
    /// The identifier is sent to the model and overwrites whatever the model echoes back.
    ///
    /// # Errors
    ///
    /// - [`AssessmentError::InvalidRequest`] if a request field is out of bounds.
    /// - [`AssessmentError::NotConfigured`] if no credential is configured; no call is made.
    /// - [`AssessmentError::ProviderExhausted`] if every candidate failed.
    /// - [`AssessmentError::UnexpectedEnvelope`] if the success body has no completion text.
    /// - [`AssessmentError::MalformedGeneration`] if the completion text is not JSON.
    /// - [`AssessmentError::SchemaViolation`] if the JSON does not match the schema.
    pub async fn analyze_as(
        &self,
        assessment_id: AssessmentId,
        request: &SymptomRequest,
    ) -> PipelineResult<SymptomAssessment> {
        validate_request(request)?;

        if !self.config.is_configured() {
            return Err(AssessmentError::NotConfigured(API_KEY_ENV));
        }

        tracing::info!(
            assessment_id = %assessment_id,
            candidates = self.config.models().len(),
            "analysing symptoms"
        );

        let prompt = Prompt::for_request(request, &assessment_id);
        let CandidateResponse { model, body } = self.first_successful_candidate(&prompt).await?;

        let content = extract_content(&body).ok_or_else(|| AssessmentError::UnexpectedEnvelope {
            model: model.clone(),
            envelope: excerpt(&body, ENVELOPE_EXCERPT_CHARS),
        })?;

        let sanitized = strip_code_fence(&content);
        let value: serde_json::Value =
            serde_json::from_str(sanitized).map_err(|source| AssessmentError::MalformedGeneration {
                model: model.clone(),
                excerpt: excerpt(sanitized, MALFORMED_EXCERPT_CHARS),
                source,
            })?;

        let generated = validate_generated(value).map_err(|violations| {
            AssessmentError::SchemaViolation {
                model: model.clone(),
                violations,
            }
        })?;

        if !generated.echoes(&assessment_id) {
            tracing::warn!(
                assessment_id = %assessment_id,
                echoed = ?generated.assessment_id,
                %model,
                "model did not echo the assessment id; using the generated one"
            );
        }

        tracing::info!(
            assessment_id = %assessment_id,
            urgency = generated.urgency_level.as_str(),
            score = generated.urgency_score,
            %model,
            "assessment validated"
        );

        Ok(generated.into_assessment(assessment_id))
    }

    /// Try each candidate in order, returning the first success response.
    async fn first_successful_candidate(&self, prompt: &Prompt) -> PipelineResult<CandidateResponse> {
        let messages = prompt.to_messages();
        let mut attempts = Vec::with_capacity(self.config.models().len());

        for model in self.config.models() {
            match self.attempt(model, messages.clone()).await {
                Ok(body) => {
                    tracing::info!(%model, failed_before = attempts.len(), "model candidate answered");
                    return Ok(CandidateResponse {
                        model: model.clone(),
                        body,
                    });
                }
                Err(failure) => {
                    tracing::warn!(%model, error = %failure, "model candidate failed");
                    attempts.push(CandidateFailure {
                        model: model.clone(),
                        failure,
                    });
                }
            }
        }

        Err(AssessmentError::ProviderExhausted { attempts })
    }

    /// One call to one candidate, bounded by the configured timeout.
    async fn attempt(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ProviderFailure> {
        let request = CompletionRequest::new(model, messages, self.config.temperature());
        let timeout = self.config.timeout();

        tokio::time::timeout(timeout, self.provider.complete(&request))
            .await
            .unwrap_or_else(|_| Err(ProviderFailure::Timeout(timeout.as_secs())))
    }
}
