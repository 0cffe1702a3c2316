/// Question screen contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position of the question.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub can_advance: bool,
}

/// Final screen contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionView {
    pub score: usize,
    pub total: usize,
    pub violations: u32,
}

/// What the quiz screen should render right now.
///
/// `Blocked` and `Violated` preempt the session without changing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizView {
    Blocked { unsupported: bool },
    Violated { violations: u32 },
    Question(QuestionView),
    Completed(CompletionView),
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}
