mod quiz;

pub use quiz::QuizScreen;
#[cfg(test)]
pub(crate) use quiz::QuizTestHandles;
