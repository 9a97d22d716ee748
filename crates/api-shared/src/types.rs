//! JSON wire types for the HealthSense REST API.
//!
//! Field names match the web frontend exactly; changing them is a breaking API change.

use healthsense_uuid::AssessmentId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inclusive bounds for `SymptomRequest::age`.
pub const AGE_RANGE: std::ops::RangeInclusive<i32> = 0..=120;
/// Inclusive bounds for `SymptomRequest::severity`.
pub const SEVERITY_RANGE: std::ops::RangeInclusive<i32> = 1..=10;
/// Inclusive bounds for `SymptomAssessment::urgency_score`.
pub const URGENCY_SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=100;
/// Inclusive bounds for `PossibleCondition::probability`.
pub const PROBABILITY_RANGE: std::ops::RangeInclusive<i32> = 0..=100;

/// Symptom description submitted for analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SymptomRequest {
    /// Free-text description of the symptoms.
    #[schema(example = "Sore throat, mild fever and a dry cough")]
    pub symptoms: String,
    #[schema(minimum = 0, maximum = 120, example = 34)]
    pub age: i32,
    #[schema(example = "female")]
    pub gender: String,
    #[schema(example = "3 days")]
    pub duration: String,
    /// Self-reported severity on a 1-10 scale.
    #[schema(minimum = 1, maximum = 10, example = 5)]
    pub severity: i32,
}

/// How urgently the patient should seek care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Normal,
    Moderate,
    Urgent,
}

impl UrgencyLevel {
    /// Wire spelling, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Normal => "NORMAL",
            UrgencyLevel::Moderate => "MODERATE",
            UrgencyLevel::Urgent => "URGENT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PossibleCondition {
    #[schema(example = "Common Cold")]
    pub condition: String,
    /// Likelihood as a percentage.
    #[schema(minimum = 0, maximum = 100, example = 70)]
    pub probability: i32,
    #[schema(example = "Viral infection of upper respiratory tract")]
    pub description: String,
}

/// Structured risk assessment returned by `POST /api/v1/symptoms/analyze`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SymptomAssessment {
    #[schema(value_type = String, example = "ASSESS_550e8400e29b41d4a716446655440000")]
    pub assessment_id: AssessmentId,
    pub urgency_level: UrgencyLevel,
    #[schema(minimum = 1, maximum = 100, example = 45)]
    pub urgency_score: i32,
    pub possible_conditions: Vec<PossibleCondition>,
    pub recommended_tests: Vec<String>,
    pub action_items: Vec<String>,
    pub warning_signs: Vec<String>,
    pub when_to_seek_care: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    #[schema(example = "healthy")]
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfoRes {
    pub message: String,
    pub version: String,
    pub docs: String,
}

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Human-readable diagnostic.
    pub detail: String,
}
