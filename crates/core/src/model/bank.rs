use serde::Deserialize;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};

/// Ordered, read-only list of questions a session walks through.
///
/// A bank always holds at least one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

/// On-disk shape of one question in a bank file.
#[derive(Debug, Clone, Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    answer: String,
}

impl QuestionBank {
    /// Each question's id must match its position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` if no questions are given, and
    /// `QuestionBankError::Misplaced` if an id does not match its position.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        if let Some((index, question)) = questions
            .iter()
            .enumerate()
            .find(|(index, question)| question.id().index() != *index)
        {
            return Err(QuestionBankError::Misplaced {
                index,
                id: question.id(),
            });
        }
        Ok(Self { questions })
    }

    /// Parse a bank from its JSON form: an array of
    /// `{ "question": .., "options": [..], "answer": .. }` records.
    ///
    /// Question ids are assigned from array position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Json` for malformed JSON, `QuestionBankError::Question`
    /// if a record fails validation, and `QuestionBankError::Empty` for an empty array.
    pub fn from_json_str(raw: &str) -> Result<Self, QuestionBankError> {
        let records: Vec<QuestionRecord> =
            serde_json::from_str(raw).map_err(|err| QuestionBankError::Json(err.to_string()))?;

        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let id = u32::try_from(index).map_err(|_| QuestionBankError::TooLarge)?;
            let question =
                Question::new(QuestionId::new(id), record.question, record.options, record.answer)
                    .map_err(|source| QuestionBankError::Question { index, source })?;
            questions.push(question);
        }

        Self::new(questions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,

    #[error("question bank has too many questions")]
    TooLarge,

    #[error("question {id} is stored at position {index}")]
    Misplaced { index: usize, id: QuestionId },

    #[error("invalid question bank json: {0}")]
    Json(String),

    #[error("invalid question at position {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "question": "2+2?", "options": ["3", "4"], "answer": "4" },
        { "question": "Capital of France?", "options": ["Paris", "Rome", "Oslo"], "answer": "Paris" }
    ]"#;

    #[test]
    fn parses_json_bank_in_order() {
        let bank = QuestionBank::from_json_str(SAMPLE).unwrap();
        assert_eq!(bank.len(), 2);
        let second = bank.get(1).unwrap();
        assert_eq!(second.id(), QuestionId::new(1));
        assert_eq!(second.correct_answer(), "Paris");
        assert!(bank.get(2).is_none());
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert_eq!(QuestionBank::from_json_str("[]"), Err(QuestionBankError::Empty));
        assert_eq!(QuestionBank::new(Vec::new()), Err(QuestionBankError::Empty));
    }

    #[test]
    fn ids_must_follow_positions() {
        let question = |id| {
            Question::new(
                QuestionId::new(id),
                "q",
                vec!["a".to_string(), "b".to_string()],
                "a",
            )
            .unwrap()
        };
        assert!(QuestionBank::new(vec![question(0), question(1)]).is_ok());

        let err = QuestionBank::new(vec![question(0), question(0)]).unwrap_err();
        assert_eq!(
            err,
            QuestionBankError::Misplaced {
                index: 1,
                id: QuestionId::new(0)
            }
        );
        assert_eq!(err.to_string(), "question 0 is stored at position 1");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = QuestionBank::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, QuestionBankError::Json(_)));
    }

    #[test]
    fn invalid_record_reports_position() {
        let raw = r#"[
            { "question": "ok", "options": ["a", "b"], "answer": "a" },
            { "question": "bad", "options": ["a", "b"], "answer": "z" }
        ]"#;
        let err = QuestionBank::from_json_str(raw).unwrap_err();
        assert!(matches!(err, QuestionBankError::Question { index: 1, .. }));
    }
}
