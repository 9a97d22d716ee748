use std::fmt;

/// Errors raised while resolving configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Why a single candidate attempt did not produce a success response.
#[derive(Debug, thiserror::Error)]
pub enum ProviderFailure {
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// A failed attempt against one model candidate.
#[derive(Debug)]
pub struct CandidateFailure {
    pub model: String,
    pub failure: ProviderFailure,
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.model, self.failure)
    }
}

/// Errors surfaced by the assessment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("AI service not configured: {0} is not set")]
    NotConfigured(&'static str),

    #[error(
        "all {} model candidates failed; last failure: {}",
        .attempts.len(),
        describe_last_failure(.attempts)
    )]
    ProviderExhausted { attempts: Vec<CandidateFailure> },

    #[error("unexpected response envelope from {model}: {envelope}")]
    UnexpectedEnvelope { model: String, envelope: String },

    #[error("{model} returned malformed JSON ({source}): {excerpt}")]
    MalformedGeneration {
        model: String,
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{model} output violates the assessment schema: {}", .violations.join("; "))]
    SchemaViolation {
        model: String,
        violations: Vec<String>,
    },
}

impl AssessmentError {
    /// The failure observed on the last attempted candidate, if this is an exhaustion error.
    pub fn last_failure(&self) -> Option<&CandidateFailure> {
        match self {
            AssessmentError::ProviderExhausted { attempts } => attempts.last(),
            _ => None,
        }
    }
}

fn describe_last_failure(attempts: &[CandidateFailure]) -> String {
    attempts
        .last()
        .map(|attempt| attempt.to_string())
        .unwrap_or_else(|| "no candidates configured".into())
}

pub type PipelineResult<T> = std::result::Result<T, AssessmentError>;

/// Returns at most `max_chars` characters of `text`, marking truncation with `...`.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
