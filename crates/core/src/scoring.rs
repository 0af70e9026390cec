use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerVector, Dosha, QuestionBank, ScorePercentages, ScoreResult, ScoreTotals};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("answer vector has {actual} slots but the bank has {expected} questions")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("question {index} is unanswered")]
    Incomplete { index: usize },

    #[error("question {index} has no choice {choice}")]
    InvalidChoice { index: usize, choice: usize },

    #[error("all selected choices carry zero weight")]
    Unscoreable,
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Reduce a fully answered vector to per-dosha totals, percentages and the dominant dosha.
///
/// The function is pure: the same bank, answers and `computed_at` always
/// produce the same result.
///
/// # Errors
///
/// Returns `ScoringError::LengthMismatch` if the vector was not captured against
/// this bank, `ScoringError::Incomplete` for the first unanswered slot,
/// `ScoringError::InvalidChoice` for an out-of-range selection, and
/// `ScoringError::Unscoreable` when the grand total is zero.
///
/// # Examples
///
/// ```
/// # use wellness_core::model::{AnswerVector, Choice, Dosha, Question, QuestionBank, QuestionId};
/// # use wellness_core::scoring::score;
/// let question = Question::new(
///     QuestionId::new(1),
///     "How is your sleep?",
///     vec![Choice::new("Light", Dosha::Vata, 1), Choice::new("Deep", Dosha::Kapha, 1)],
/// )?;
/// let bank = QuestionBank::new(vec![question])?;
/// let answers = AnswerVector::from_slots(vec![Some(1)]);
///
/// let result = score(&bank, &answers, chrono::Utc::now())?;
/// assert_eq!(result.dominant(), Dosha::Kapha);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn score(
    bank: &QuestionBank,
    answers: &AnswerVector,
    computed_at: DateTime<Utc>,
) -> Result<ScoreResult, ScoringError> {
    let totals = tally(bank, answers)?;

    let grand_total: u64 = totals.iter().map(|(_, total)| u64::from(*total)).sum();
    if grand_total == 0 {
        return Err(ScoringError::Unscoreable);
    }

    let percentages: ScorePercentages =
        totals.map(|_, total| rounded_percent(u64::from(*total), grand_total));

    Ok(ScoreResult::new(
        dominant(&totals),
        totals,
        percentages,
        computed_at,
    ))
}

/// Sum choice weights per dosha.
///
/// # Errors
///
/// See [`score`]; every error except `Unscoreable` can be raised here.
pub fn tally(bank: &QuestionBank, answers: &AnswerVector) -> Result<ScoreTotals, ScoringError> {
    if answers.len() != bank.len() {
        return Err(ScoringError::LengthMismatch {
            expected: bank.len(),
            actual: answers.len(),
        });
    }

    let mut totals = ScoreTotals::default();
    for (index, question) in bank.questions().iter().enumerate() {
        let choice_index = answers
            .get(index)
            .ok_or(ScoringError::Incomplete { index })?;
        let choice = question
            .choice(choice_index)
            .ok_or(ScoringError::InvalidChoice {
                index,
                choice: choice_index,
            })?;
        let slot = totals.get_mut(choice.dosha());
        *slot = slot.saturating_add(choice.weight());
    }
    Ok(totals)
}

/// Highest total wins; ties go to the earlier dosha in `Dosha::ALL`.
#[must_use]
pub fn dominant(totals: &ScoreTotals) -> Dosha {
    let mut best = Dosha::ALL[0];
    for dosha in Dosha::ALL.into_iter().skip(1) {
        if totals.get(dosha) > totals.get(best) {
            best = dosha;
        }
    }
    best
}

/// `round(part / whole * 100)` with halves rounded up, computed in integers.
fn rounded_percent(part: u64, whole: u64) -> u8 {
    let scaled = (part * 200 + whole) / (whole * 2);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Choice, DoshaMap, Question, QuestionId};
    use crate::time::fixed_now;
    use proptest::prelude::*;

    const VATA: usize = 0;
    const PITTA: usize = 1;
    const KAPHA: usize = 2;

    fn uniform_bank(questions: u32, weight: u32) -> QuestionBank {
        let questions = (1..=questions)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Question {id}"),
                    vec![
                        Choice::new("vata", Dosha::Vata, weight),
                        Choice::new("pitta", Dosha::Pitta, weight),
                        Choice::new("kapha", Dosha::Kapha, weight),
                    ],
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn answered(choices: &[usize]) -> AnswerVector {
        AnswerVector::from_slots(choices.iter().copied().map(Some).collect())
    }

    #[test]
    fn scores_two_vata_one_pitta() {
        let bank = uniform_bank(3, 1);
        let result = score(&bank, &answered(&[VATA, VATA, PITTA]), fixed_now()).unwrap();

        assert_eq!(*result.totals(), DoshaMap::new(2, 1, 0));
        assert_eq!(*result.percentages(), DoshaMap::new(67, 33, 0));
        assert_eq!(result.dominant(), Dosha::Vata);
        assert_eq!(result.computed_at(), fixed_now());
    }

    #[test]
    fn ties_resolve_by_fixed_priority() {
        let bank = uniform_bank(4, 1);
        for order in [
            [PITTA, VATA, PITTA, VATA],
            [VATA, PITTA, VATA, PITTA],
            [PITTA, PITTA, VATA, VATA],
        ] {
            let result = score(&bank, &answered(&order), fixed_now()).unwrap();
            assert_eq!(result.dominant(), Dosha::Vata, "order {order:?}");
        }

        let bank = uniform_bank(2, 1);
        let result = score(&bank, &answered(&[KAPHA, PITTA]), fixed_now()).unwrap();
        assert_eq!(result.dominant(), Dosha::Pitta);
    }

    #[test]
    fn weights_are_accumulated() {
        let bank = QuestionBank::new(vec![
            Question::new(
                QuestionId::new(1),
                "Frame?",
                vec![
                    Choice::new("thin", Dosha::Vata, 1),
                    Choice::new("heavy", Dosha::Kapha, 3),
                ],
            )
            .unwrap(),
            Question::new(
                QuestionId::new(2),
                "Temper?",
                vec![Choice::new("sharp", Dosha::Pitta, 2)],
            )
            .unwrap(),
        ])
        .unwrap();

        let result = score(&bank, &answered(&[1, 0]), fixed_now()).unwrap();
        assert_eq!(*result.totals(), DoshaMap::new(0, 2, 3));
        assert_eq!(*result.percentages(), DoshaMap::new(0, 40, 60));
        assert_eq!(result.dominant(), Dosha::Kapha);
    }

    #[test]
    fn rejects_unanswered_slot() {
        let bank = uniform_bank(3, 1);
        let answers = AnswerVector::from_slots(vec![Some(VATA), None, Some(PITTA)]);
        assert_eq!(
            score(&bank, &answers, fixed_now()),
            Err(ScoringError::Incomplete { index: 1 })
        );
    }

    #[test]
    fn rejects_length_mismatch_and_bad_choice() {
        let bank = uniform_bank(2, 1);
        assert_eq!(
            score(&bank, &answered(&[VATA]), fixed_now()),
            Err(ScoringError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            score(&bank, &answered(&[VATA, 7]), fixed_now()),
            Err(ScoringError::InvalidChoice {
                index: 1,
                choice: 7
            })
        );
    }

    #[test]
    fn all_zero_weights_are_unscoreable() {
        let bank = uniform_bank(2, 0);
        assert_eq!(
            score(&bank, &answered(&[VATA, KAPHA]), fixed_now()),
            Err(ScoringError::Unscoreable)
        );
    }

    #[test]
    fn rounding_drift_is_not_corrected() {
        let bank = uniform_bank(6, 1);
        // 2/6, 2/6, 2/6 -> 33 each
        let result = score(
            &bank,
            &answered(&[VATA, VATA, PITTA, PITTA, KAPHA, KAPHA]),
            fixed_now(),
        )
        .unwrap();
        let sum: u32 = result.percentages().iter().map(|(_, p)| u32::from(*p)).sum();
        assert_eq!(sum, 99);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(rounded_percent(1, 201), 0);
        assert_eq!(rounded_percent(5, 5), 100);
    }

    proptest! {
        #[test]
        fn percentages_stay_in_range(
            picks in prop::collection::vec(0_usize..3, 1..40),
            weight in 1_u32..10,
        ) {
            let bank = uniform_bank(u32::try_from(picks.len()).unwrap(), weight);
            let result = score(&bank, &answered(&picks), fixed_now()).unwrap();

            let sum: u32 = result.percentages().iter().map(|(_, p)| u32::from(*p)).sum();
            prop_assert!((98..=102).contains(&sum));
            for (_, pct) in result.percentages().iter() {
                prop_assert!(*pct <= 100);
            }
        }

        #[test]
        fn scoring_is_deterministic(picks in prop::collection::vec(0_usize..3, 1..20)) {
            let bank = uniform_bank(u32::try_from(picks.len()).unwrap(), 2);
            let answers = answered(&picks);
            let first = score(&bank, &answers, fixed_now()).unwrap();
            let second = score(&bank, &answers, fixed_now()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn dominant_holds_the_maximum(picks in prop::collection::vec(0_usize..3, 1..20)) {
            let bank = uniform_bank(u32::try_from(picks.len()).unwrap(), 1);
            let result = score(&bank, &answered(&picks), fixed_now()).unwrap();
            let leader = *result.totals().get(result.dominant());
            for (dosha, total) in result.totals().iter() {
                prop_assert!(*total <= leader);
                if *total == leader {
                    prop_assert!(result.dominant() <= dosha);
                }
            }
        }
    }
}
