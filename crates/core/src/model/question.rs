use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Dosha, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank has no questions")]
    Empty,

    #[error("question {id} has no choices")]
    NoChoices { id: QuestionId },

    #[error("question {id} has an empty prompt")]
    EmptyPrompt { id: QuestionId },

    #[error("question id {id} appears more than once")]
    DuplicateId { id: QuestionId },
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// A selectable answer, tagged with the dosha it contributes weight to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    text: String,
    dosha: Dosha,
    weight: u32,
}

impl Choice {
    #[must_use]
    pub fn new(text: impl Into<String>, dosha: Dosha, weight: u32) -> Self {
        Self {
            text: text.into(),
            dosha,
            weight,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn dosha(&self) -> Dosha {
        self.dosha
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A prompt with an ordered list of choices. The choice index is the answer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    choices: Vec<Choice>,
}

impl Question {
    /// Build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::EmptyPrompt` for a blank prompt and
    /// `QuestionBankError::NoChoices` when `choices` is empty.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Result<Self, QuestionBankError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionBankError::EmptyPrompt { id });
        }
        if choices.is_empty() {
            return Err(QuestionBankError::NoChoices { id });
        }
        Ok(Self {
            id,
            prompt,
            choices,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// Doshas with no choice in this question.
    #[must_use]
    pub fn uncovered_doshas(&self) -> Vec<Dosha> {
        Dosha::ALL
            .into_iter()
            .filter(|dosha| !self.choices.iter().any(|choice| choice.dosha == *dosha))
            .collect()
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// Ordered, non-empty set of questions a quiz session is run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from questions in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` when there are no questions and
    /// `QuestionBankError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuestionBankError::DuplicateId { id: question.id });
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Questions that do not offer a choice for every dosha, with the missing ones.
    ///
    /// Such questions are accepted but skew scoring toward the covered doshas.
    #[must_use]
    pub fn uncovered_categories(&self) -> Vec<(QuestionId, Vec<Dosha>)> {
        self.questions
            .iter()
            .filter_map(|question| {
                let missing = question.uncovered_doshas();
                (!missing.is_empty()).then_some((question.id, missing))
            })
            .collect()
    }
}
