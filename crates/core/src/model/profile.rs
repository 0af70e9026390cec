use crate::model::{Dosha, ScoreResult};

/// Name shown when the user has not entered one.
pub const DEFAULT_DISPLAY_NAME: &str = "Wellness Seeker";

/// The single locally persisted user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub age: Option<u32>,
    pub latest_result: Option<ScoreResult>,
    pub has_completed_quiz: bool,
}

impl UserProfile {
    /// Merge a quiz result and mark the questionnaire as completed.
    ///
    /// Name and age are left as they were.
    #[must_use]
    pub fn apply_quiz_result(self, result: ScoreResult) -> Self {
        Self {
            latest_result: Some(result),
            has_completed_quiz: true,
            ..self
        }
    }

    /// Merge only the fields present in `edits`; quiz fields are left untouched.
    #[must_use]
    pub fn apply_edits(self, edits: ProfileEdits) -> Self {
        let ProfileEdits { name, age } = edits;
        Self {
            name: name.unwrap_or(self.name),
            age: age.unwrap_or(self.age),
            ..self
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            trimmed
        }
    }

    #[must_use]
    pub fn dominant_dosha(&self) -> Option<Dosha> {
        self.latest_result.as_ref().map(ScoreResult::dominant)
    }
}

/// Partial update for the editable profile fields.
///
/// `age` is doubly optional: `None` leaves the stored age alone while
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdits {
    pub name: Option<String>,
    pub age: Option<Option<u32>>,
}

impl ProfileEdits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: Option<u32>) -> Self {
        self.age = Some(age);
        self
    }

    /// Build edits from raw form input: both fields are provided, and the age
    /// text is parsed leniently (blank or non-numeric input clears the age).
    #[must_use]
    pub fn from_form(name: &str, age: &str) -> Self {
        Self::new()
            .with_name(name.trim())
            .with_age(parse_age(age))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none()
    }
}

/// Parse a free-text age. Returns `None` for blank or non-numeric input.
#[must_use]
pub fn parse_age(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}
