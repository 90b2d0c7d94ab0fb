//! AnswerType - Expected shape of a question's answer

use serde::{Deserialize, Serialize};

/// Answer type hint attached to a question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Boolean,
    Integer,
    Description,
    #[default]
    Text,
}

impl AnswerType {
    /// Parse a stored tag. Unknown tags fall back to `Text`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Constraint sentence used when a question carries no explicit instructions
    pub fn default_constraint(&self) -> &'static str {
        match self {
            AnswerType::Boolean => "Answer must be ONLY 'true' or 'false'",
            AnswerType::Integer => "Answer must be ONLY a number (no units, no text)",
            AnswerType::Description => "Answer must be a descriptive summary",
            AnswerType::Text => "Answer should be clear and concise",
        }
    }
}

impl std::fmt::Display for AnswerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerType::Boolean => write!(f, "boolean"),
            AnswerType::Integer => write!(f, "integer"),
            AnswerType::Description => write!(f, "description"),
            AnswerType::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for AnswerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" => Ok(AnswerType::Boolean),
            "integer" => Ok(AnswerType::Integer),
            "description" => Ok(AnswerType::Description),
            "text" => Ok(AnswerType::Text),
            _ => Err(format!("Unknown answer type: {}", s)),
        }
    }
}
