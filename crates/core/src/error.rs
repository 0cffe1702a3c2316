use thiserror::Error;

use crate::guard::EnvironmentError;
use crate::model::{QuestionBankError, QuestionError, SnapshotError, TransitionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}
