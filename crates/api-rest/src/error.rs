//! Mapping of pipeline errors onto HTTP responses.

use api_shared::ErrorRes;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use healthsense_core::AssessmentError;

/// REST-level error. Every variant renders as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Assessment(err) => match err {
                AssessmentError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AssessmentError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                AssessmentError::ProviderExhausted { .. }
                | AssessmentError::UnexpectedEnvelope { .. }
                | AssessmentError::MalformedGeneration { .. }
                | AssessmentError::SchemaViolation { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "symptom analysis failed");
        } else {
            tracing::warn!(status = status.as_u16(), %detail, "rejected request");
        }

        (status, Json(ErrorRes { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthsense_core::{CandidateFailure, ProviderFailure};

    #[test]
    fn assessment_errors_map_to_distinct_statuses() {
        let cases = [
            (
                AssessmentError::InvalidRequest("age".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AssessmentError::NotConfigured("OPENROUTER_API_KEY"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AssessmentError::ProviderExhausted {
                    attempts: vec![CandidateFailure {
                        model: "m".into(),
                        failure: ProviderFailure::Timeout(60),
                    }],
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssessmentError::UnexpectedEnvelope {
                    model: "m".into(),
                    envelope: "{}".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssessmentError::MalformedGeneration {
                    model: "m".into(),
                    excerpt: "x".into(),
                    source: serde_json::from_str::<serde_json::Value>("x")
                        .expect_err("not json"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssessmentError::SchemaViolation {
                    model: "m".into(),
                    violations: vec!["missing field".into()],
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn detail_is_the_error_message() {
        let err = ApiError::from(AssessmentError::NotConfigured("OPENROUTER_API_KEY"));
        assert_eq!(
            err.to_string(),
            "AI service not configured: OPENROUTER_API_KEY is not set"
        );
    }
}
