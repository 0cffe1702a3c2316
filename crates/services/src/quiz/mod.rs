mod engine;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use engine::{AdvanceOutcome, QuizEngine};
pub use view::{CompletionView, QuestionView, QuizProgress, QuizView};
