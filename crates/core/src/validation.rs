//! Input and model-output validation.
//!
//! Requests are checked against their field bounds before any work is done. Model output is
//! checked in two stages: serde enforces field presence and types, then the numeric bounds
//! are checked explicitly so every violation is reported, not just the first.

use api_shared::{
    PossibleCondition, SymptomAssessment, SymptomRequest, UrgencyLevel, AGE_RANGE,
    PROBABILITY_RANGE, SEVERITY_RANGE, URGENCY_SCORE_RANGE,
};
use healthsense_uuid::AssessmentId;
use serde::Deserialize;

use crate::{AssessmentError, PipelineResult};

/// Validates a symptom request against its field bounds.
///
/// # Errors
///
/// Returns [`AssessmentError::InvalidRequest`] listing every violated bound.
pub fn validate_request(request: &SymptomRequest) -> PipelineResult<()> {
    let mut violations = Vec::new();

    if request.symptoms.trim().is_empty() {
        violations.push("symptoms cannot be empty".to_string());
    }
    if !AGE_RANGE.contains(&request.age) {
        violations.push(format!(
            "age must be between {} and {}, got {}",
            AGE_RANGE.start(),
            AGE_RANGE.end(),
            request.age
        ));
    }
    if !SEVERITY_RANGE.contains(&request.severity) {
        violations.push(format!(
            "severity must be between {} and {}, got {}",
            SEVERITY_RANGE.start(),
            SEVERITY_RANGE.end(),
            request.severity
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AssessmentError::InvalidRequest(violations.join("; ")))
    }
}

/// An assessment as generated by the model, before the server identifier is applied.
///
/// `assessment_id` is whatever the model echoed back, of any JSON type, if anything. It is
/// only used to log a mismatch; the returned assessment always carries the server-generated
/// identifier.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GeneratedAssessment {
    #[serde(default)]
    pub assessment_id: Option<serde_json::Value>,
    pub urgency_level: UrgencyLevel,
    pub urgency_score: i32,
    pub possible_conditions: Vec<PossibleCondition>,
    pub recommended_tests: Vec<String>,
    pub action_items: Vec<String>,
    pub warning_signs: Vec<String>,
    pub when_to_seek_care: String,
}

impl GeneratedAssessment {
    /// Returns true when the model echoed exactly `id`.
    pub fn echoes(&self, id: &AssessmentId) -> bool {
        self.assessment_id
            .as_ref()
            .and_then(|echoed| echoed.as_str())
            .is_some_and(|echoed| echoed == id.to_string())
    }

    /// Finalise into the wire type under the server-generated identifier.
    pub fn into_assessment(self, id: AssessmentId) -> SymptomAssessment {
        SymptomAssessment {
            assessment_id: id,
            urgency_level: self.urgency_level,
            urgency_score: self.urgency_score,
            possible_conditions: self.possible_conditions,
            recommended_tests: self.recommended_tests,
            action_items: self.action_items,
            warning_signs: self.warning_signs,
            when_to_seek_care: self.when_to_seek_care,
        }
    }
}

/// Validates parsed model output against the assessment schema.
///
/// # Errors
///
/// Returns the list of violations: a single structural message when a field is missing or
/// has the wrong type, otherwise one message per out-of-bound value.
pub fn validate_generated(value: serde_json::Value) -> Result<GeneratedAssessment, Vec<String>> {
    if !value.is_object() {
        return Err(vec![format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )]);
    }

    let generated: GeneratedAssessment =
        serde_json::from_value(value).map_err(|e| vec![e.to_string()])?;

    let mut violations = Vec::new();

    if !URGENCY_SCORE_RANGE.contains(&generated.urgency_score) {
        violations.push(format!(
            "urgency_score must be between {} and {}, got {}",
            URGENCY_SCORE_RANGE.start(),
            URGENCY_SCORE_RANGE.end(),
            generated.urgency_score
        ));
    }

    for (idx, condition) in generated.possible_conditions.iter().enumerate() {
        if !PROBABILITY_RANGE.contains(&condition.probability) {
            violations.push(format!(
                "possible_conditions[{}].probability must be between {} and {}, got {}",
                idx,
                PROBABILITY_RANGE.start(),
                PROBABILITY_RANGE.end(),
                condition.probability
            ));
        }
    }

    if violations.is_empty() {
        Ok(generated)
    } else {
        Err(violations)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
