use quiz_core::EnvironmentGuard;
use services::{AdvanceOutcome, AppServices, QuizEngine, QuizError, QuizView};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    EnterFullscreen,
    ExitFullscreen,
    Select(String),
    Advance,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Completed,
}

pub struct QuizVm {
    engine: QuizEngine,
}

impl QuizVm {
    #[must_use]
    pub fn new(engine: QuizEngine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn view(&self, guard: &EnvironmentGuard) -> QuizView {
        self.engine.view(guard)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.engine.state().current_index()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// # Errors
    ///
    /// Returns `QuizError` when the selection is not accepted.
    pub fn select(&mut self, guard: &EnvironmentGuard, option: &str) -> Result<(), QuizError> {
        self.engine.select_option(guard, option)
    }

    /// # Errors
    ///
    /// Returns `QuizError` when the advance is not accepted.
    pub async fn advance(&mut self, guard: &EnvironmentGuard) -> Result<QuizOutcome, QuizError> {
        let AdvanceOutcome { completed, .. } = self.engine.advance(guard).await?;
        Ok(if completed {
            QuizOutcome::Completed
        } else {
            QuizOutcome::Continue
        })
    }

    pub async fn restart(&mut self, guard: &mut EnvironmentGuard) {
        self.engine.restart(guard).await;
    }
}

/// Load the quiz, resuming any stored session into `guard`.
pub async fn start_quiz(services: &AppServices, guard: &mut EnvironmentGuard) -> QuizVm {
    QuizVm::new(services.start_quiz(guard).await)
}
