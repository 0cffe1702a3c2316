use std::path::Path;

use quiz_core::model::QuestionBank;

use crate::error::BankLoadError;

/// Question bank shipped with the application.
pub const BUNDLED_BANK: &str = include_str!("../assets/quiz.json");

/// Parse the bundled bank.
///
/// # Errors
///
/// Returns `BankLoadError::Invalid` if the bundled file fails validation.
pub fn bundled_bank() -> Result<QuestionBank, BankLoadError> {
    Ok(QuestionBank::from_json_str(BUNDLED_BANK)?)
}

/// Load a bank from `path`, or the bundled bank when no path is given.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read and
/// `BankLoadError::Invalid` if its contents fail validation.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank, BankLoadError> {
    let Some(path) = path else {
        return bundled_bank();
    };
    let raw = std::fs::read_to_string(path).map_err(|source| BankLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bank = QuestionBank::from_json_str(&raw)?;
    tracing::debug!(path = %path.display(), questions = bank.len(), "loaded question bank");
    Ok(bank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_bank_has_ten_questions() {
        let bank = bundled_bank().unwrap();
        assert_eq!(bank.len(), 10);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_bank(Some(Path::new("/definitely/not/here/quiz.json"))).unwrap_err();
        assert!(matches!(err, BankLoadError::Io { .. }));
    }

    #[test]
    fn no_path_falls_back_to_bundled() {
        let bank = load_bank(None).unwrap();
        assert_eq!(bank, bundled_bank().unwrap());
    }
}
