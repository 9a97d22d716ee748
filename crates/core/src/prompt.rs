//! Prompt construction for symptom analysis.

use api_shared::SymptomRequest;
use healthsense_uuid::AssessmentId;

use crate::provider::{ChatMessage, Role};

/// System instruction shared by every analysis. `{assessment_id}` is substituted per call.
const SYSTEM_PROMPT: &str = r#"You are a careful medical triage assistant. You analyse a patient's reported symptoms and produce a preliminary risk assessment. You do not diagnose; you help the patient decide how urgently to seek care.

Respond with a single JSON object and nothing else. Do not wrap it in markdown code fences. Do not add any text before or after it.

The object must have exactly these fields:
{
  "assessment_id": string, set to exactly "{assessment_id}",
  "urgency_level": one of "NORMAL", "MODERATE", "URGENT",
  "urgency_score": integer from 1 to 100,
  "possible_conditions": array of {"condition": string, "probability": integer from 0 to 100, "description": string}, most likely first,
  "recommended_tests": array of strings,
  "action_items": array of strings,
  "warning_signs": array of strings,
  "when_to_seek_care": string
}"#;

/// The two prompt segments sent for one analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt for `request`, instructing the model to echo `assessment_id`.
    pub fn for_request(request: &SymptomRequest, assessment_id: &AssessmentId) -> Self {
        let id = assessment_id.to_string();

        let system = SYSTEM_PROMPT.replace("{assessment_id}", &id);
        let user = format!(
            "Analyse the following symptoms:\n\
             Symptoms: {}\n\
             Age: {}, Gender: {}\n\
             Duration: {}\n\
             Severity: {}/10\n\n\
             Set assessment_id to \"{}\".",
            request.symptoms.trim(),
            request.age,
            request.gender.trim(),
            request.duration.trim(),
            request.severity,
            id
        );

        Self { system, user }
    }

    /// Role-tagged message list: system first, then user.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user.clone(),
            },
        ]
    }
}
