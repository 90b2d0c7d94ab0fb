//! Model Reply Parser
//!
//! Recovers the transcription and the answer set from the model's free-text
//! reply. The reply is untrusted: the parser never fails, it only drops what
//! it cannot attribute to a question.
//!
//! Single forward pass over trimmed lines with two exclusive capture modes:
//!
//! ```text
//! TRANSCRIPTION: <seed>   -> capture transcription (seeded with <seed>)
//! ANSWERS:                -> capture answers
//! Answer <n>: <text>      -> answers[ids[n-1]] = <text>, first occurrence wins
//! ```

use super::prompt::{ANSWERS_MARKER, ANSWER_KEYWORD, TRANSCRIPTION_MARKER};
use crate::domain::value_objects::AnswerSet;

/// Structured content recovered from a reply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub transcription: String,
    pub answers: AnswerSet,
}

impl ParsedReply {
    /// True when nothing usable was recovered for the requested ids
    pub fn is_degraded(&self, question_count: usize) -> bool {
        self.transcription.is_empty() || (question_count > 0 && self.answers.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Nothing,
    Transcription,
    Answers,
}

/// Parse a transcribe-and-answer reply.
///
/// `question_ids` must be in the order the questions were numbered in the prompt.
pub fn parse_reply(reply: &str, question_ids: &[String]) -> ParsedReply {
    let mut parsed = ParsedReply::default();
    let mut capture = Capture::Nothing;
    let mut dropped = 0usize;

    for line in reply.lines().map(str::trim) {
        if let Some(seed) = line.strip_prefix(TRANSCRIPTION_MARKER) {
            capture = Capture::Transcription;
            parsed.transcription = seed.trim().to_string();
            continue;
        }

        if line.starts_with(ANSWERS_MARKER) {
            capture = Capture::Answers;
            continue;
        }

        match capture {
            Capture::Transcription if !line.is_empty() => {
                if !parsed.transcription.is_empty() {
                    parsed.transcription.push('\n');
                }
                parsed.transcription.push_str(line);
            }
            Capture::Answers => {
                let Some((n, text)) = parse_answer_line(line) else {
                    continue;
                };
                let attributed = n
                    .checked_sub(1)
                    .and_then(|i| question_ids.get(i))
                    .map(|id| parsed.answers.insert_first(id.as_str(), text))
                    .unwrap_or(false);
                if !attributed {
                    dropped += 1;
                }
            }
            _ => {}
        }
    }

    if dropped > 0 {
        tracing::debug!(
            dropped,
            questions = question_ids.len(),
            "Dropped out-of-range or duplicate answer lines"
        );
    }

    parsed
}

/// Match `Answer <n>: <text>` and return `(n, trimmed text)`.
fn parse_answer_line(line: &str) -> Option<(usize, &str)> {
    let rest = line.strip_prefix(ANSWER_KEYWORD)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (number, text) = rest.split_once(':')?;
    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digit strings too large for usize are out of range anyway
    let n = number.parse::<usize>().ok()?;
    Some((n, text.trim()))
}
