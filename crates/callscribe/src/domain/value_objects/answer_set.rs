//! AnswerSet - Answers keyed by question id

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from question id to the model-derived answer text.
///
/// Keys are always a subset of the question ids presented to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer unless the question already has one.
    ///
    /// Returns `false` when the answer was dropped as a duplicate.
    pub fn insert_first(
        &mut self,
        question_id: impl Into<String>,
        answer: impl Into<String>,
    ) -> bool {
        match self.0.entry(question_id.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(answer.into());
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (k, v) in iter {
            set.insert_first(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_answer_wins() {
        let mut answers = AnswerSet::new();
        assert!(answers.insert_first("q1", "true"));
        assert!(!answers.insert_first("q1", "false"));
        assert_eq!(answers.get("q1"), Some("true"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let answers: AnswerSet = [("q2", "42"), ("q1", "true")].into_iter().collect();
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json, serde_json::json!({"q1": "true", "q2": "42"}));
    }
}
