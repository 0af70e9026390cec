//! Built-in constitution questionnaire.

use crate::model::{Choice, Dosha, Question, QuestionBank, QuestionBankError, QuestionId};

/// (prompt, [vata, pitta, kapha] answer texts)
const STANDARD_QUESTIONS: &[(&str, [&str; 3])] = &[
    (
        "How would you describe your body frame?",
        [
            "Thin and light, I find it hard to gain weight",
            "Medium and muscular, my weight is fairly stable",
            "Broad and solid, I gain weight easily",
        ],
    ),
    (
        "How is your skin most of the time?",
        [
            "Dry, rough or thin",
            "Warm, oily and prone to redness",
            "Thick, smooth and cool",
        ],
    ),
    (
        "How is your appetite?",
        [
            "Irregular, I sometimes forget to eat",
            "Strong, I get irritable if I skip a meal",
            "Steady but moderate, I can skip meals easily",
        ],
    ),
    (
        "How do you usually sleep?",
        [
            "Lightly, I wake up easily",
            "Soundly but not very long",
            "Deeply and for a long time",
        ],
    ),
    (
        "Which climate bothers you most?",
        [
            "Cold and windy weather",
            "Hot and humid weather",
            "Cold and damp weather",
        ],
    ),
    (
        "How do you react to stress?",
        [
            "I become anxious and worried",
            "I become irritable and impatient",
            "I withdraw and become quiet",
        ],
    ),
    (
        "How would you describe the way you speak?",
        [
            "Fast, and I change topics often",
            "Precise and persuasive",
            "Slow, calm and measured",
        ],
    ),
    (
        "How do you learn and remember things?",
        [
            "I learn quickly but forget quickly",
            "I learn at a moderate pace and remember clearly",
            "I learn slowly but never forget",
        ],
    ),
    (
        "What are your energy levels like?",
        [
            "They come in bursts",
            "Strong and focused",
            "Steady and enduring",
        ],
    ),
    (
        "How do you handle decisions?",
        [
            "I change my mind often",
            "I decide quickly and stick to it",
            "I take my time and rarely change course",
        ],
    ),
];

/// The standard ten-question bank, one weight-1 choice per dosha per question.
///
/// # Errors
///
/// Returns `QuestionBankError` only if the built-in table is malformed.
pub fn standard() -> Result<QuestionBank, QuestionBankError> {
    let mut questions = Vec::with_capacity(STANDARD_QUESTIONS.len());
    for (id, (prompt, texts)) in (1_u32..).zip(STANDARD_QUESTIONS) {
        let choices = Dosha::ALL
            .into_iter()
            .zip(texts)
            .map(|(dosha, text)| Choice::new(*text, dosha, 1))
            .collect();
        questions.push(Question::new(QuestionId::new(id), *prompt, choices)?);
    }
    QuestionBank::new(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_covers_every_dosha() {
        let bank = standard().unwrap();
        assert_eq!(bank.len(), 10);
        assert!(bank.uncovered_categories().is_empty());
        for question in bank.questions() {
            assert_eq!(question.choices().len(), 3);
        }
    }
}
