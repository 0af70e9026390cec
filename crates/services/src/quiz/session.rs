use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;

use wellness_core::model::{AnswerVector, Question, QuestionBank, ScoreResult};
use wellness_core::scoring::{self, ScoringError};

use super::auto_advance::{PendingAdvance, default_auto_advance_delay};
use super::progress::QuizProgress;
use crate::error::QuizError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory questionnaire run against a question bank.
///
/// The session is `InProgress` at some question index until a successful
/// [`submit`](Self::submit) moves it to its terminal completed state. Finishing
/// the last question never completes the session on its own.
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    answers: AnswerVector,
    current: usize,
    auto_advance_delay: Option<Duration>,
    pending_advance: Option<PendingAdvance>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<ScoreResult>,
}

impl QuizSession {
    /// Start a session on the first question with every answer unset.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, started_at: DateTime<Utc>) -> Self {
        let answers = AnswerVector::unanswered(bank.len());
        Self {
            bank,
            answers,
            current: 0,
            auto_advance_delay: Some(default_auto_advance_delay()),
            pending_advance: None,
            started_at,
            completed_at: None,
            result: None,
        }
    }

    /// Override the auto-advance delay; `None` disables auto-advance.
    #[must_use]
    pub fn with_auto_advance(mut self, delay: Option<Duration>) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerVector {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The result produced by a successful submit.
    #[must_use]
    pub fn result(&self) -> Option<&ScoreResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.bank.questions()[self.current]
    }

    /// Choice recorded for the given question, if any.
    #[must_use]
    pub fn selected_choice(&self, question: usize) -> Option<usize> {
        self.answers.get(question)
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.answers.is_answered(question)
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.answers.is_answered(self.current)
    }

    /// True iff every question has an answer. Submission is still required to finish.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.is_complete()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn pending_advance(&self) -> Option<PendingAdvance> {
        self.pending_advance
    }

    /// Returns a summary of the current quiz progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = self.answers.answered_count();
        QuizProgress {
            total: self.total_questions(),
            answered,
            remaining: self.total_questions().saturating_sub(answered),
            current_index: self.current,
            current_answered: self.is_current_answered(),
            is_complete: self.is_complete(),
            is_submitted: self.is_submitted(),
        }
    }

    fn last_index(&self) -> usize {
        self.bank.len().saturating_sub(1)
    }

    /// Record `choice` for the current question without moving.
    ///
    /// Re-selecting overwrites the earlier choice. When the current question is
    /// not the last one, an auto-advance is scheduled for `now + delay`,
    /// replacing any pending one. A delay that overflows the clock schedules
    /// no advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidChoiceIndex` if `choice` is out of range and
    /// `QuizError::Completed` after submission; neither changes any state.
    pub fn select_answer(&mut self, choice: usize, now: DateTime<Utc>) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::Completed);
        }
        let available = self.current_question().choices().len();
        if choice >= available {
            return Err(QuizError::InvalidChoiceIndex {
                question: self.current,
                choice,
                available,
            });
        }

        self.answers.set(self.current, choice);

        // A deadline past the representable range schedules nothing.
        self.pending_advance = match self.auto_advance_delay {
            Some(delay) if self.current < self.last_index() => now
                .checked_add_signed(delay)
                .map(|due_at| PendingAdvance::new(self.current, due_at)),
            _ => None,
        };
        Ok(())
    }

    /// Move to the next question.
    ///
    /// Does nothing (returns `false`) if the current question is unanswered,
    /// the session is on the last question, or the quiz was submitted.
    pub fn go_next(&mut self) -> bool {
        if self.is_submitted() || !self.is_current_answered() || self.current >= self.last_index()
        {
            return false;
        }
        self.move_to(self.current + 1);
        true
    }

    /// Move to the previous question. No answer is required to go back.
    pub fn go_prev(&mut self) -> bool {
        if self.is_submitted() || self.current == 0 {
            return false;
        }
        self.move_to(self.current - 1);
        true
    }

    fn move_to(&mut self, index: usize) {
        self.current = index;
        self.pending_advance = None;
    }

    /// Apply the pending auto-advance if it is due.
    ///
    /// A pending advance scheduled on a question the session has since left is
    /// discarded without moving. Returns whether the index moved.
    pub fn fire_pending_advance(&mut self, now: DateTime<Utc>) -> bool {
        let Some(pending) = self.pending_advance else {
            return false;
        };
        if pending.from_index() != self.current || self.is_submitted() {
            self.pending_advance = None;
            return false;
        }
        if !pending.is_due(now) {
            return false;
        }
        self.pending_advance = None;
        if self.current >= self.last_index() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Drop the pending auto-advance, returning it if there was one.
    pub fn cancel_pending_advance(&mut self) -> Option<PendingAdvance> {
        self.pending_advance.take()
    }

    /// Score the answers and finish the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PrematureSubmit` while any question is unanswered,
    /// `QuizError::Completed` if already submitted, and
    /// `QuizError::UnscoreableInput` if every selected choice weighs zero.
    /// The session is unchanged on error.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<ScoreResult, QuizError> {
        if self.is_submitted() {
            return Err(QuizError::Completed);
        }
        if let Some(first_unanswered) = self.answers.first_unanswered() {
            return Err(QuizError::PrematureSubmit { first_unanswered });
        }

        let result = match scoring::score(&self.bank, &self.answers, now) {
            Ok(result) => result,
            Err(ScoringError::Unscoreable) => {
                tracing::error!(
                    questions = self.bank.len(),
                    "question bank produced an all-zero score"
                );
                return Err(QuizError::UnscoreableInput);
            }
            Err(err) => return Err(err.into()),
        };

        self.pending_advance = None;
        self.completed_at = Some(now);
        self.result = Some(result.clone());
        tracing::info!(
            dominant = %result.dominant(),
            vata = result.percentages().vata,
            pitta = result.percentages().pitta,
            kapha = result.percentages().kapha,
            "quiz submitted"
        );
        Ok(result)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.bank.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("pending_advance", &self.pending_advance)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
