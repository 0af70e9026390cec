use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use storage::repository::Storage;
use wellness_core::bank;
use wellness_core::model::QuestionBank;

use crate::Clock;
use crate::bank_loader::load_question_bank;
use crate::error::{AppServicesError, BankLoadError};
use crate::profile_store::ProfileStore;
use crate::quiz::QuizLoopService;

/// Assembles app-facing services over one storage backend.
pub struct AppServices {
    quiz: Arc<QuizLoopService>,
    profiles: ProfileStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or profile loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: QuestionBank,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, bank).await
    }

    /// Build services over an already constructed storage backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the profile cannot be loaded.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        bank: QuestionBank,
    ) -> Result<Self, AppServicesError> {
        let profiles = ProfileStore::load(Arc::clone(&storage.profiles)).await?;
        let quiz = Arc::new(QuizLoopService::new(clock, Arc::new(bank)));
        Ok(Self { quiz, profiles })
    }

    /// Change the auto-advance delay for sessions started from now on.
    #[must_use]
    pub fn with_auto_advance(mut self, delay: Option<Duration>) -> Self {
        let quiz = QuizLoopService::clone(&self.quiz).with_auto_advance(delay);
        self.quiz = Arc::new(quiz);
        self
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut ProfileStore {
        &mut self.profiles
    }
}

/// Resolve the question bank: a JSON file when given, otherwise the built-in one.
///
/// # Errors
///
/// Returns `BankLoadError` if the file cannot be loaded.
pub fn resolve_question_bank(path: Option<&Path>) -> Result<QuestionBank, BankLoadError> {
    match path {
        Some(path) => load_question_bank(path),
        None => Ok(bank::standard()?),
    }
}
