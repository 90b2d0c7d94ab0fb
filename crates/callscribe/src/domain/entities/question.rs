//! Question - Campaign question answered from a call's audio
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::AnswerType;

/// A question to be answered from the call audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, used as the answer key
    pub id: String,
    /// Prompt text shown to the model
    pub text: String,
    pub answer_type: AnswerType,
    /// Free-text override of the answer type's default constraint
    pub instructions: Option<String>,
}

/// Shape of the JSON `details` column a question is stored with.
///
/// Fields holding anything but a string are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDetails {
    #[serde(default, deserialize_with = "string_only")]
    question_text: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    answer_type: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    instructions: Option<String>,
}

fn string_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, answer_type: AnswerType) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answer_type,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Build a question from its stored label and `details` JSON.
    ///
    /// Missing `questionText` falls back to the label; blank instructions count as absent.
    pub fn from_details(
        id: impl Into<String>,
        label: &str,
        details: &serde_json::Value,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let details: QuestionDetails = if details.is_null() {
            QuestionDetails::default()
        } else {
            serde_json::from_value(details.clone()).map_err(|e| {
                DomainError::InvalidData(format!("question {} details: {}", id, e))
            })?
        };

        let text = details
            .question_text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| label.to_string());

        Ok(Self {
            id,
            text,
            answer_type: details
                .answer_type
                .as_deref()
                .map(AnswerType::from_tag)
                .unwrap_or_default(),
            instructions: details
                .instructions
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty()),
        })
    }

    /// Constraint line for the prompt: explicit instructions win over the type default
    pub fn constraint(&self) -> &str {
        self.instructions
            .as_deref()
            .unwrap_or_else(|| self.answer_type.default_constraint())
    }
}

/// Ordered set of questions presented to the model.
///
/// Questions are stable-sorted by id so the numbering seen by the model, and
/// therefore the answer correlation, is identical across runs for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(mut questions: Vec<Question>) -> Self {
        questions.sort_by(|a, b| a.id.cmp(&b.id));
        Self { questions }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question ids in presentation order (position `n-1` answers `Answer n:`)
    pub fn ids(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_details_reads_all_fields() {
        let details = json!({
            "questionText": "Did the customer agree?",
            "answerType": "boolean",
            "instructions": "Say true only on explicit agreement"
        });
        let q = Question::from_details("q1", "agreement", &details).unwrap();
        assert_eq!(q.text, "Did the customer agree?");
        assert_eq!(q.answer_type, AnswerType::Boolean);
        assert_eq!(q.constraint(), "Say true only on explicit agreement");
    }

    #[test]
    fn test_from_details_defaults() {
        let q = Question::from_details("q2", "Order size", &json!({"instructions": "  "})).unwrap();
        assert_eq!(q.text, "Order size");
        assert_eq!(q.answer_type, AnswerType::Text);
        assert_eq!(q.instructions, None);
        assert_eq!(q.constraint(), AnswerType::Text.default_constraint());
    }

    #[test]
    fn test_from_details_null_uses_label() {
        let q = Question::from_details("q3", "Callback time", &serde_json::Value::Null).unwrap();
        assert_eq!(q.text, "Callback time");
    }

    #[test]
    fn test_from_details_ignores_non_string_fields() {
        let q = Question::from_details(
            "q4",
            "Order size",
            &json!({"questionText": 12, "answerType": "integer", "instructions": 42}),
        )
        .unwrap();
        assert_eq!(q.text, "Order size");
        assert_eq!(q.answer_type, AnswerType::Integer);
        assert_eq!(q.instructions, None);

        let q = Question::from_details(
            "q5",
            "Agreed?",
            &json!({"answerType": true, "instructions": {"en": "x"}}),
        )
        .unwrap();
        assert_eq!(q.answer_type, AnswerType::Text);
        assert_eq!(q.instructions, None);
    }

    #[test]
    fn test_from_details_rejects_non_object() {
        let result = Question::from_details("q6", "label", &json!(["not", "an", "object"]));
        assert!(matches!(result, Err(DomainError::InvalidData(_))));
    }

    #[test]
    fn test_catalog_sorts_by_id() {
        let catalog = QuestionCatalog::new(vec![
            Question::new("b", "second", AnswerType::Text),
            Question::new("a", "first", AnswerType::Integer),
        ]);
        assert_eq!(catalog.ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(catalog.questions()[0].text, "first");
    }
}
