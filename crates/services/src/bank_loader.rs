//! Loads a question bank from a JSON document.
//!
//! ```json
//! { "questions": [
//!     { "id": 1, "prompt": "How is your sleep?",
//!       "choices": [ { "text": "Light", "dosha": "vata", "weight": 1 } ] }
//! ] }
//! ```
//!
//! `question`, `answers` and `score` are accepted as aliases of `prompt`,
//! `choices` and `weight`.

use std::path::Path;

use serde::Deserialize;
use wellness_core::model::{Choice, Dosha, Question, QuestionBank, QuestionId};

use crate::error::BankLoadError;

#[derive(Debug, Deserialize)]
struct BankDocument {
    questions: Vec<QuestionDocument>,
}

#[derive(Debug, Deserialize)]
struct QuestionDocument {
    id: u32,
    #[serde(alias = "question")]
    prompt: String,
    #[serde(alias = "answers")]
    choices: Vec<ChoiceDocument>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDocument {
    text: String,
    dosha: String,
    #[serde(alias = "score", default = "default_weight")]
    weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// Parse a question bank from JSON text.
///
/// # Errors
///
/// Returns `BankLoadError::Parse` for malformed JSON, `BankLoadError::UnknownDosha`
/// for an unrecognized category, and `BankLoadError::Bank` if the questions do
/// not form a valid bank.
pub fn parse_question_bank(json: &str) -> Result<QuestionBank, BankLoadError> {
    let document: BankDocument = serde_json::from_str(json)?;
    let mut questions = Vec::with_capacity(document.questions.len());
    for question in document.questions {
        let id = question.id;
        let choices = question
            .choices
            .into_iter()
            .map(|choice| {
                let dosha = choice
                    .dosha
                    .parse::<Dosha>()
                    .map_err(|_| BankLoadError::UnknownDosha {
                        id,
                        raw: choice.dosha.clone(),
                    })?;
                Ok(Choice::new(choice.text, dosha, choice.weight))
            })
            .collect::<Result<Vec<_>, BankLoadError>>()?;
        questions.push(Question::new(QuestionId::new(id), question.prompt, choices)?);
    }
    let bank = QuestionBank::new(questions)?;

    for (id, missing) in bank.uncovered_categories() {
        tracing::warn!(question = %id, ?missing, "question does not offer every dosha");
    }
    Ok(bank)
}

/// Read and parse a question bank file.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read, otherwise as
/// [`parse_question_bank`].
pub fn load_question_bank(path: &Path) -> Result<QuestionBank, BankLoadError> {
    let json = std::fs::read_to_string(path)?;
    parse_question_bank(&json)
}
