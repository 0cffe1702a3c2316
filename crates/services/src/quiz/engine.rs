use std::sync::Arc;

use quiz_core::model::{Question, QuestionBank, SessionPhase, SessionState};
use quiz_core::{EnvironmentGuard, Gate, Overlay};
use storage::snapshot::SnapshotStore;

use super::view::{CompletionView, QuestionView, QuizProgress, QuizView};
use crate::error::QuizError;

/// Result of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub correct: bool,
    pub completed: bool,
    /// False if the checkpoint could not be written.
    pub persisted: bool,
}

/// Drives a single quiz session over a question bank.
///
/// The engine owns the session data; the environment guard is passed in by the
/// caller so signal handling never waits on an in-flight operation.
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
    state: SessionState,
    store: SnapshotStore,
}

impl QuizEngine {
    /// Start a session, resuming from the stored snapshot when it is usable.
    ///
    /// Unreadable or invalid snapshots are discarded and the session starts from zero.
    pub async fn load(
        bank: Arc<QuestionBank>,
        store: SnapshotStore,
        guard: &mut EnvironmentGuard,
    ) -> Self {
        let state = match store.load().await {
            Ok(Some(snapshot)) => match SessionState::from_snapshot(snapshot, &bank) {
                Ok((state, violations)) => {
                    guard.restore_violations(violations);
                    tracing::info!(
                        index = state.current_index(),
                        score = state.score(),
                        violations,
                        "resumed quiz session"
                    );
                    state
                }
                Err(err) => {
                    tracing::warn!(error = %err, "discarding stored snapshot");
                    SessionState::new()
                }
            },
            Ok(None) => SessionState::new(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored snapshot");
                SessionState::new()
            }
        };

        Self { bank, state, store }
    }

    /// Start from zero without consulting storage.
    #[must_use]
    pub fn fresh(bank: Arc<QuestionBank>, store: SnapshotStore) -> Self {
        Self {
            bank,
            state: SessionState::new(),
            store,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase(&self.bank)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.state.current_index())
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.bank.len();
        let answered = self.state.current_index().min(total);
        QuizProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: answered == total,
        }
    }

    fn admit(guard: &EnvironmentGuard) -> Result<(), QuizError> {
        match guard.overlay() {
            Some(overlay) => Err(QuizError::Suspended(overlay)),
            None => Ok(()),
        }
    }

    /// Choose an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Suspended` while the guard blocks input, or
    /// `QuizError::Transition` if the session is not answering or the option is foreign.
    /// State is unchanged on error.
    pub fn select_option(
        &mut self,
        guard: &EnvironmentGuard,
        option: &str,
    ) -> Result<(), QuizError> {
        Self::admit(guard)
            .and_then(|()| {
                self.state
                    .select_option(&self.bank, option)
                    .map_err(QuizError::from)
            })
            .inspect_err(|err| tracing::debug!(error = %err, "ignored option selection"))?;
        tracing::debug!(index = self.state.current_index(), option, "option selected");
        Ok(())
    }

    /// Score the selection, checkpoint the pre-advance state and move on.
    ///
    /// A failed checkpoint write is logged; the in-memory transition still stands.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Suspended` while the guard blocks input, or
    /// `QuizError::Transition` when no option is selected or the quiz is complete.
    pub async fn advance(&mut self, guard: &EnvironmentGuard) -> Result<AdvanceOutcome, QuizError> {
        Self::admit(guard).inspect_err(|err| tracing::debug!(error = %err, "ignored advance"))?;
        let advance = self
            .state
            .advance(&self.bank, guard.violation_count())
            .inspect_err(|err| tracing::debug!(error = %err, "ignored advance"))?;

        let persisted = match self.store.save(&advance.checkpoint).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist quiz checkpoint");
                false
            }
        };

        tracing::debug!(
            index = self.state.current_index(),
            score = self.state.score(),
            correct = advance.correct,
            "advanced"
        );
        if advance.completed {
            tracing::info!(
                score = self.state.score(),
                total = self.bank.len(),
                violations = guard.violation_count(),
                "quiz completed"
            );
        }

        Ok(AdvanceOutcome {
            correct: advance.correct,
            completed: advance.completed,
            persisted,
        })
    }

    /// Reset the session and violation count and drop the stored snapshot.
    ///
    /// Allowed in any state. Returns false if the snapshot could not be cleared.
    pub async fn restart(&mut self, guard: &mut EnvironmentGuard) -> bool {
        self.state.restart();
        guard.reset();
        match self.store.clear().await {
            Ok(()) => {
                tracing::info!("quiz restarted");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to clear stored snapshot");
                false
            }
        }
    }

    /// Derive the screen to render for the current guard and session state.
    #[must_use]
    pub fn view(&self, guard: &EnvironmentGuard) -> QuizView {
        match guard.overlay() {
            Some(Overlay::Blocked) => {
                return QuizView::Blocked {
                    unsupported: guard.gate() == Gate::Unsupported,
                };
            }
            Some(Overlay::Violated) => {
                return QuizView::Violated {
                    violations: guard.violation_count(),
                };
            }
            None => {}
        }

        let total = self.bank.len();
        match self.current_question() {
            Some(question) => {
                let selected = self.state.selected_option().map(str::to_string);
                QuizView::Question(QuestionView {
                    number: self.state.current_index() + 1,
                    total,
                    prompt: question.prompt().to_string(),
                    options: question.options().to_vec(),
                    can_advance: selected.is_some(),
                    selected,
                })
            }
            None => QuizView::Completed(CompletionView {
                score: self.state.score(),
                total,
                violations: guard.violation_count(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use quiz_core::{EnvironmentSupport, Visibility};
    use storage::repository::Storage;

    fn one_question_bank() -> Arc<QuestionBank> {
        let question = Question::new(
            QuestionId::new(0),
            "2+2?",
            vec!["3".to_string(), "4".to_string()],
            "4",
        )
        .unwrap();
        Arc::new(QuestionBank::new(vec![question]).unwrap())
    }

    fn open_guard() -> EnvironmentGuard {
        let mut guard = EnvironmentGuard::default();
        guard.on_fullscreen_change(true);
        guard
    }

    #[tokio::test]
    async fn correct_answer_completes_with_score() {
        let storage = Storage::in_memory();
        let guard = open_guard();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());

        engine.select_option(&guard, "4").unwrap();
        let outcome = engine.advance(&guard).await.unwrap();

        assert!(outcome.correct && outcome.completed && outcome.persisted);
        assert_eq!(engine.state().score(), 1);
        assert_eq!(engine.state().current_index(), 1);
        assert_eq!(engine.phase(), SessionPhase::Completed);
        assert_eq!(
            engine.view(&guard),
            QuizView::Completed(CompletionView {
                score: 1,
                total: 1,
                violations: 0
            })
        );
    }

    #[tokio::test]
    async fn wrong_answer_completes_without_score() {
        let storage = Storage::in_memory();
        let guard = open_guard();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());

        engine.select_option(&guard, "3").unwrap();
        let outcome = engine.advance(&guard).await.unwrap();

        assert!(!outcome.correct);
        assert_eq!(engine.state().score(), 0);
        assert!(engine.is_complete());
    }

    #[tokio::test]
    async fn closed_gate_rejects_selection() {
        let storage = Storage::in_memory();
        let guard = EnvironmentGuard::default();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());

        let err = engine.select_option(&guard, "4").unwrap_err();
        assert_eq!(err, QuizError::Suspended(Overlay::Blocked));
        assert_eq!(engine.state().selected_option(), None);
        assert_eq!(engine.view(&guard), QuizView::Blocked { unsupported: false });
    }

    #[tokio::test]
    async fn hidden_tab_preserves_session_and_blocks_input() {
        let storage = Storage::in_memory();
        let mut guard = open_guard();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());
        engine.select_option(&guard, "3").unwrap();

        guard.on_visibility_change(Visibility::Hidden);
        assert_eq!(engine.view(&guard), QuizView::Violated { violations: 1 });
        assert_eq!(
            engine.advance(&guard).await.unwrap_err(),
            QuizError::Suspended(Overlay::Violated)
        );

        guard.on_visibility_change(Visibility::Visible);
        let QuizView::Question(view) = engine.view(&guard) else {
            panic!("expected question view");
        };
        assert_eq!(view.selected.as_deref(), Some("3"));
        assert!(view.can_advance);
    }

    #[tokio::test]
    async fn advance_without_selection_is_ignored() {
        let storage = Storage::in_memory();
        let guard = open_guard();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());

        let err = engine.advance(&guard).await.unwrap_err();
        assert!(matches!(err, QuizError::Transition(_)));
        assert_eq!(engine.state().current_index(), 0);
        assert_eq!(storage.snapshots().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unsupported_environment_renders_blocked() {
        let storage = Storage::in_memory();
        let guard = EnvironmentGuard::new(EnvironmentSupport::none());
        let engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());
        assert_eq!(engine.view(&guard), QuizView::Blocked { unsupported: true });
    }

    #[tokio::test]
    async fn progress_tracks_answered_questions() {
        let storage = Storage::in_memory();
        let guard = open_guard();
        let mut engine = QuizEngine::fresh(one_question_bank(), storage.snapshots());
        assert_eq!(
            engine.progress(),
            QuizProgress {
                total: 1,
                answered: 0,
                remaining: 1,
                is_complete: false
            }
        );
        engine.select_option(&guard, "4").unwrap();
        engine.advance(&guard).await.unwrap();
        assert!(engine.progress().is_complete);
        assert_eq!(engine.progress().remaining, 0);
    }
}
