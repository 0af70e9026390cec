use std::sync::Arc;

use chrono::Duration;
use wellness_core::Clock;
use wellness_core::model::{QuestionBank, ScoreResult, UserProfile};

use super::auto_advance::default_auto_advance_delay;
use super::session::QuizSession;
use crate::error::QuizError;
use crate::profile_store::ProfileStore;

/// Result of submitting a finished quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizCompletion {
    pub result: ScoreResult,
    pub profile: UserProfile,
}

/// Orchestrates quiz start and submission with profile persistence.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    auto_advance: Option<Duration>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            auto_advance: Some(default_auto_advance_delay()),
        }
    }

    /// Override the delay used for sessions started by this service.
    #[must_use]
    pub fn with_auto_advance(mut self, delay: Option<Duration>) -> Self {
        self.auto_advance = delay;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a new session on the first question.
    #[must_use]
    pub fn start_quiz(&self) -> QuizSession {
        QuizSession::new(Arc::clone(&self.bank), self.clock.now())
            .with_auto_advance(self.auto_advance)
    }

    /// Select a choice on the current question at the service clock's time.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::select_answer`].
    pub fn select_answer(&self, session: &mut QuizSession, choice: usize) -> Result<(), QuizError> {
        session.select_answer(choice, self.clock.now())
    }

    /// Apply a due auto-advance at the service clock's time.
    pub fn tick(&self, session: &mut QuizSession) -> bool {
        session.fire_pending_advance(self.clock.now())
    }

    /// Score the session and merge the result into the stored profile.
    ///
    /// The session only completes if scoring succeeds. If the profile write
    /// fails the session stays completed and the profile keeps the result in
    /// memory; call [`ProfileStore::flush`] to retry.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` from [`QuizSession::submit`] or `QuizError::Profile`
    /// when persisting fails.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        profiles: &mut ProfileStore,
    ) -> Result<QuizCompletion, QuizError> {
        let result = session.submit(self.clock.now())?;
        let profile = profiles.apply_quiz_result(result.clone()).await?.clone();
        Ok(QuizCompletion { result, profile })
    }
}
