#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank;
pub mod error;
pub mod quiz;

pub use app_services::AppServices;
pub use bank::{BUNDLED_BANK, bundled_bank, load_bank};
pub use error::{AppServicesError, BankLoadError, QuizError};
pub use quiz::{AdvanceOutcome, CompletionView, QuestionView, QuizEngine, QuizProgress, QuizView};
