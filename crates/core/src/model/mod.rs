mod bank;
mod ids;
mod question;
mod session;

pub use bank::{QuestionBank, QuestionBankError};
pub use ids::QuestionId;
pub use question::{Question, QuestionError};
pub use session::{
    Advance, SessionPhase, SessionSnapshot, SessionState, SnapshotError, TransitionError,
};
