use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::bank::QuestionBank;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Logical phase of the session data, independent of any environment overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Current question shown, nothing chosen yet.
    Answering,
    /// An option is chosen but the session has not advanced.
    Selected,
    /// Every question has been answered.
    Completed,
}

//
// ─── TRANSITION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("session already completed")]
    Completed,

    #[error("an option is already selected for this question")]
    AlreadySelected,

    #[error("option {option:?} does not belong to the current question")]
    UnknownOption { option: String },

    #[error("no option selected")]
    NoSelection,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Serialized projection of a session, written for resume.
///
/// Field names follow the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionSnapshot {
    pub current_question: usize,
    pub selected_option: Option<String>,
    pub violations: u32,
    pub marks: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("question index {index} is out of range for a bank of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("selected option {option:?} is not an option of question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("marks ({marks}) exceed answered questions ({index})")]
    MarksOutOfRange { marks: usize, index: usize },
}

impl SessionSnapshot {
    /// Check a persisted snapshot against the bank it is about to be applied to.
    ///
    /// Snapshots are checkpoints taken before an advance, so they always point at an
    /// answerable question and carry the marks earned on earlier questions only.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` when the snapshot cannot describe a session over `bank`.
    pub fn validate(&self, bank: &QuestionBank) -> Result<(), SnapshotError> {
        let index = self.current_question;
        let Some(question) = bank.get(index) else {
            return Err(SnapshotError::IndexOutOfRange {
                index,
                len: bank.len(),
            });
        };

        if let Some(option) = self.selected_option.as_deref() {
            if !question.has_option(option) {
                return Err(SnapshotError::UnknownOption {
                    index,
                    option: option.to_string(),
                });
            }
        }

        if self.marks > index {
            return Err(SnapshotError::MarksOutOfRange {
                marks: self.marks,
                index,
            });
        }

        Ok(())
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Result of a successful advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// State captured before the advance mutated anything.
    pub checkpoint: SessionSnapshot,
    pub correct: bool,
    pub completed: bool,
}

/// Mutable progress through a question bank.
///
/// Violations are not tracked here; they belong to the environment guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_index: usize,
    selected_option: Option<String>,
    score: usize,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate state from a snapshot, returning the violation count it carried.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot does not fit `bank`.
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        bank: &QuestionBank,
    ) -> Result<(Self, u32), SnapshotError> {
        snapshot.validate(bank)?;
        let state = Self {
            current_index: snapshot.current_question,
            selected_option: snapshot.selected_option,
            score: snapshot.marks,
        };
        Ok((state, snapshot.violations))
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn phase(&self, bank: &QuestionBank) -> SessionPhase {
        if self.current_index >= bank.len() {
            SessionPhase::Completed
        } else if self.selected_option.is_some() {
            SessionPhase::Selected
        } else {
            SessionPhase::Answering
        }
    }

    /// Project the state into a persistable snapshot.
    #[must_use]
    pub fn snapshot(&self, violations: u32) -> SessionSnapshot {
        SessionSnapshot {
            current_question: self.current_index,
            selected_option: self.selected_option.clone(),
            violations,
            marks: self.score,
        }
    }

    /// Choose an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the session is not answering or the option is foreign.
    pub fn select_option(
        &mut self,
        bank: &QuestionBank,
        option: &str,
    ) -> Result<(), TransitionError> {
        match self.phase(bank) {
            SessionPhase::Completed => return Err(TransitionError::Completed),
            SessionPhase::Selected => return Err(TransitionError::AlreadySelected),
            SessionPhase::Answering => {}
        }

        let question = bank
            .get(self.current_index)
            .ok_or(TransitionError::Completed)?;
        if !question.has_option(option) {
            return Err(TransitionError::UnknownOption {
                option: option.to_string(),
            });
        }

        self.selected_option = Some(option.to_string());
        Ok(())
    }

    /// Score the current selection and move to the next question.
    ///
    /// The returned checkpoint is the pre-advance state, which is what gets persisted.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NoSelection` unless an option is selected, and
    /// `TransitionError::Completed` once every question is answered.
    pub fn advance(
        &mut self,
        bank: &QuestionBank,
        violations: u32,
    ) -> Result<Advance, TransitionError> {
        let question = bank
            .get(self.current_index)
            .ok_or(TransitionError::Completed)?;
        let Some(selected) = self.selected_option.as_deref() else {
            return Err(TransitionError::NoSelection);
        };

        let correct = question.is_correct(selected);
        let checkpoint = self.snapshot(violations);

        if correct {
            self.score += 1;
        }
        self.current_index += 1;
        self.selected_option = None;

        Ok(Advance {
            checkpoint,
            correct,
            completed: self.current_index >= bank.len(),
        })
    }

    pub fn restart(&mut self) {
        *self = Self::default();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
