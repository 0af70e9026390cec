//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use wellness_core::model::QuestionBankError;
use wellness_core::scoring::ScoringError;

/// Errors emitted by the quiz session and workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question {question} has {available} choices, got choice {choice}")]
    InvalidChoiceIndex {
        question: usize,
        choice: usize,
        available: usize,
    },
    #[error("cannot submit: question {first_unanswered} is unanswered")]
    PrematureSubmit { first_unanswered: usize },
    #[error("selected answers carry no weight and cannot be scored")]
    UnscoreableInput,
    #[error("quiz already completed")]
    Completed,
    #[error(transparent)]
    Scoring(ScoringError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl From<ScoringError> for QuizError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Unscoreable => Self::UnscoreableInput,
            ScoringError::Incomplete { index } => Self::PrematureSubmit {
                first_unanswered: index,
            },
            other => Self::Scoring(other),
        }
    }
}

/// Errors emitted by `ProfileStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading a question bank document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question {id}: unknown dosha {raw:?}")]
    UnknownDosha { id: u32, raw: String },
    #[error(transparent)]
    Bank(#[from] QuestionBankError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Bank(#[from] BankLoadError),
}
