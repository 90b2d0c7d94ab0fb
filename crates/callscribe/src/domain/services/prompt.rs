//! Transcription Prompt Builder
//!
//! The model never sees question ids. Questions are numbered 1..N in catalog
//! order and the reply is correlated back by that number alone, so the layout
//! requested here must match what `reply_parser` expects.

use std::fmt::Write;

use crate::domain::entities::QuestionCatalog;

/// Marker opening the transcription section of a reply
pub const TRANSCRIPTION_MARKER: &str = "TRANSCRIPTION:";
/// Marker opening the answers section of a reply
pub const ANSWERS_MARKER: &str = "ANSWERS:";
/// Keyword starting each answer line (`Answer <n>: <text>`)
pub const ANSWER_KEYWORD: &str = "Answer";

const TRANSCRIBE_ONLY_PROMPT: &str = "Please transcribe the following audio file.";

/// Which kind of reply the prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Plain transcription, no structured sections
    TranscribeOnly,
    /// `TRANSCRIPTION:` section followed by numbered `ANSWERS:`
    TranscribeAndAnswer,
}

impl std::fmt::Display for PromptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptMode::TranscribeOnly => write!(f, "transcribe_only"),
            PromptMode::TranscribeAndAnswer => write!(f, "transcribe_and_answer"),
        }
    }
}

/// Instruction text sent to the model together with the audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionPrompt {
    pub mode: PromptMode,
    pub text: String,
}

impl TranscriptionPrompt {
    pub fn transcribe_only() -> Self {
        Self {
            mode: PromptMode::TranscribeOnly,
            text: TRANSCRIBE_ONLY_PROMPT.to_string(),
        }
    }

    /// Prompt for a catalog; an empty catalog yields the transcribe-only prompt.
    pub fn for_questions(catalog: &QuestionCatalog) -> Self {
        if catalog.is_empty() {
            return Self::transcribe_only();
        }

        let mut questions = String::new();
        let mut constraints = String::new();
        for (i, question) in catalog.questions().iter().enumerate() {
            let n = i + 1;
            // Writing to a String cannot fail
            let _ = writeln!(questions, "{}. {}", n, question.text.trim());
            let _ = writeln!(constraints, "Question {}: {}", n, question.constraint());
        }

        let text = format!(
            "Please transcribe the following audio file and then answer the questions based on the transcription.\n\
             \n\
             QUESTIONS TO ANSWER:\n\
             {questions}\n\
             ANSWER CONSTRAINTS:\n\
             {constraints}\n\
             IMPORTANT: Follow the answer constraints exactly as specified for each question. \
             Answer every question, in order, using its number.\n\
             \n\
             Please provide your response in the following format:\n\
             {transcription}\n\
             [transcribed text here]\n\
             \n\
             {answers}\n\
             {kw} 1: [your answer]\n\
             {kw} 2: [your answer]\n\
             etc.\n",
            questions = questions,
            constraints = constraints,
            transcription = TRANSCRIPTION_MARKER,
            answers = ANSWERS_MARKER,
            kw = ANSWER_KEYWORD,
        );

        Self {
            mode: PromptMode::TranscribeAndAnswer,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnswerType, Question};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question::new("q2", "How many units were ordered?", AnswerType::Integer),
            Question::new("q1", "Did the customer agree?", AnswerType::Boolean),
            Question::new("q3", "Summarise objections", AnswerType::Description)
                .with_instructions("List objections separated by semicolons"),
        ])
    }

    #[test]
    fn test_empty_catalog_is_transcribe_only() {
        let prompt = TranscriptionPrompt::for_questions(&QuestionCatalog::default());
        assert_eq!(prompt.mode, PromptMode::TranscribeOnly);
        assert!(!prompt.text.contains(ANSWERS_MARKER));
    }

    #[test]
    fn test_questions_numbered_in_catalog_order() {
        let prompt = TranscriptionPrompt::for_questions(&catalog());
        assert_eq!(prompt.mode, PromptMode::TranscribeAndAnswer);

        let first = prompt.text.find("1. Did the customer agree?").unwrap();
        let second = prompt.text.find("2. How many units were ordered?").unwrap();
        let third = prompt.text.find("3. Summarise objections").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_constraints_prefer_instructions() {
        let prompt = TranscriptionPrompt::for_questions(&catalog());
        assert!(prompt
            .text
            .contains("Question 1: Answer must be ONLY 'true' or 'false'"));
        assert!(prompt
            .text
            .contains("Question 2: Answer must be ONLY a number (no units, no text)"));
        assert!(prompt
            .text
            .contains("Question 3: List objections separated by semicolons"));
        assert!(!prompt.text.contains("descriptive summary"));
    }

    #[test]
    fn test_reply_layout_is_requested() {
        let prompt = TranscriptionPrompt::for_questions(&catalog());
        let transcription = prompt.text.find("TRANSCRIPTION:\n").unwrap();
        let answers = prompt.text.find("ANSWERS:\nAnswer 1: ").unwrap();
        assert!(transcription < answers);
    }
}
