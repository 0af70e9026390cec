//! Line-oriented front end: the questionnaire loop plus profile and result views.

use std::fmt;

use services::{AppServices, QuizError, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use wellness_core::catalog;
use wellness_core::model::{ScoreBand, ScoreResult, UserProfile};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// Zero-based choice index.
    Select(usize),
    Next,
    Prev,
    Submit,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "n" | "next" => Input::Next,
        "p" | "prev" | "back" => Input::Prev,
        "s" | "submit" => Input::Submit,
        "q" | "quit" => Input::Quit,
        _ => match line.parse::<usize>() {
            Ok(n) if n > 0 => Input::Select(n - 1),
            _ => Input::Unknown,
        },
    }
}

/// Run the questionnaire on stdin/stdout until it is submitted or abandoned.
///
/// Abandoning (quit or end of input) leaves the profile untouched.
pub async fn run_quiz(app: &mut AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let quiz = app.quiz();
    let mut session = quiz.start_quiz();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Answer with the number of a choice; n next, p previous, s submit, q quit.");
    print!("{}", QuestionView(&session));

    loop {
        let line = match session.pending_advance() {
            Some(pending) => {
                let wait = pending
                    .remaining(quiz.clock().now())
                    .to_std()
                    .unwrap_or_default();
                tokio::select! {
                    () = tokio::time::sleep(wait) => {
                        if quiz.tick(&mut session) {
                            print!("{}", QuestionView(&session));
                        }
                        continue;
                    }
                    line = lines.next_line() => line?,
                }
            }
            None => lines.next_line().await?,
        };

        let Some(line) = line else {
            tracing::debug!(answered = session.answers().answered_count(), "input closed");
            return Ok(());
        };

        match parse_input(&line) {
            Input::Select(choice) => match quiz.select_answer(&mut session, choice) {
                Ok(()) => print!("{}", QuestionView(&session)),
                Err(QuizError::InvalidChoiceIndex { available, .. }) => {
                    println!("Pick a number between 1 and {available}.");
                }
                Err(err) => println!("{err}"),
            },
            Input::Next => {
                if session.go_next() {
                    print!("{}", QuestionView(&session));
                } else if !session.is_current_answered() {
                    println!("Choose an answer first.");
                } else {
                    println!("This is the last question; type s to submit.");
                }
            }
            Input::Prev => {
                if session.go_prev() {
                    print!("{}", QuestionView(&session));
                } else {
                    println!("Already at the first question.");
                }
            }
            Input::Submit => match quiz.submit(&mut session, app.profiles_mut()).await {
                Ok(completion) => {
                    let view = ResultView {
                        profile: &completion.profile,
                        result: &completion.result,
                    };
                    print!("{view}");
                    return Ok(());
                }
                Err(QuizError::PrematureSubmit { first_unanswered }) => {
                    println!(
                        "Question {} is still unanswered ({} of {} done).",
                        first_unanswered + 1,
                        session.answers().answered_count(),
                        session.total_questions()
                    );
                }
                Err(QuizError::Profile(err)) => {
                    // The session completed; only the save failed.
                    if let Some(result) = session.result() {
                        let profile = app.profiles().profile();
                        print!("{}", ResultView { profile, result });
                    }
                    tracing::warn!(error = %err, "quiz result was not saved");
                    return Err(err.into());
                }
                Err(err) => return Err(err.into()),
            },
            Input::Quit => {
                println!("Quiz abandoned; nothing was saved.");
                return Ok(());
            }
            Input::Unknown => {
                println!("Type a choice number, n, p, s or q.");
            }
        }
    }
}

/// The current question with its choices and the progress bar.
struct QuestionView<'a>(&'a QuizSession);

impl fmt::Display for QuestionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let progress = session.progress();
        let question = session.current_question();
        let selected = session.selected_choice(progress.current_index);

        writeln!(
            f,
            "\nQuestion {} of {} [{}] {}% complete",
            progress.current_index + 1,
            progress.total,
            progress_bar(progress.position_percent()),
            progress.position_percent()
        )?;
        writeln!(f, "{}", question.prompt())?;
        for (index, choice) in question.choices().iter().enumerate() {
            let marker = if selected == Some(index) { '*' } else { ' ' };
            writeln!(f, " {marker} {}. {}", index + 1, choice.text())?;
        }
        if progress.on_last_question() && progress.is_complete {
            writeln!(f, "All questions answered; type s to submit.")?;
        }
        Ok(())
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "high",
        ScoreBand::Moderate => "moderate",
        ScoreBand::Low => "low",
    }
}

/// Dominant dosha, balance chart and catalog advice for one result.
struct ResultView<'a> {
    profile: &'a UserProfile,
    result: &'a ScoreResult,
}

impl fmt::Display for ResultView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let dominant = catalog::info(result.dominant());

        writeln!(
            f,
            "\n{}, your dominant dosha is {}",
            self.profile.display_name(),
            dominant.dosha.label()
        )?;
        writeln!(f, "Element: {}", dominant.element)?;
        writeln!(f, "{}", dominant.description)?;

        writeln!(f, "\nDosha balance")?;
        for bar in result.score_bars() {
            writeln!(
                f,
                "  {:<6} [{}] {:>3}% ({} points, {})",
                bar.dosha.label(),
                progress_bar(bar.fill),
                result.percentages().get(bar.dosha),
                bar.total,
                band_label(bar.band)
            )?;
        }

        writeln!(f, "\nCharacteristics")?;
        for item in dominant.characteristics {
            writeln!(f, "  - {item}")?;
        }
        writeln!(f, "\nRecommendations")?;
        for item in dominant.recommendations {
            writeln!(f, "  - {item}")?;
        }
        writeln!(
            f,
            "\nTaken {}",
            result.computed_at().format("%Y-%m-%d %H:%M UTC")
        )
    }
}

struct ProfileView<'a>(&'a UserProfile);

impl fmt::Display for ProfileView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.0;
        writeln!(f, "Name: {}", profile.display_name())?;
        match profile.age {
            Some(age) => writeln!(f, "Age:  {age}")?,
            None => writeln!(f, "Age:  not set")?,
        }

        match &profile.latest_result {
            Some(result) if profile.has_completed_quiz => {
                write!(f, "{}", ResultView { profile, result })
            }
            None if profile.has_completed_quiz => writeln!(
                f,
                "\nYour earlier result could not be restored. Run `quiz` to see it again."
            ),
            _ => writeln!(f, "\nNo quiz taken yet. Run `quiz` to find your dosha."),
        }
    }
}

pub fn print_profile(profile: &UserProfile) {
    print!("{}", ProfileView(profile));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use services::QuizLoopService;
    use wellness_core::bank;
    use wellness_core::time::{fixed_clock, fixed_now};

    use super::*;

    fn finished_result() -> ScoreResult {
        let quiz = QuizLoopService::new(fixed_clock(), Arc::new(bank::standard().unwrap()))
            .with_auto_advance(None);
        let mut session = quiz.start_quiz();
        loop {
            quiz.select_answer(&mut session, 1).unwrap();
            if !session.go_next() {
                break;
            }
        }
        session.submit(fixed_now()).unwrap()
    }

    #[test]
    fn parses_commands_and_one_based_choices() {
        assert_eq!(parse_input(" 2 "), Input::Select(1));
        assert_eq!(parse_input("0"), Input::Unknown);
        assert_eq!(parse_input("n"), Input::Next);
        assert_eq!(parse_input("back"), Input::Prev);
        assert_eq!(parse_input("submit"), Input::Submit);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("maybe"), Input::Unknown);
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), "-".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn question_view_marks_selection() {
        let quiz = QuizLoopService::new(fixed_clock(), Arc::new(bank::standard().unwrap()))
            .with_auto_advance(None);
        let mut session = quiz.start_quiz();
        quiz.select_answer(&mut session, 2).unwrap();

        let view = QuestionView(&session).to_string();
        assert!(view.contains("Question 1 of 10"));
        assert!(view.contains(" * 3. "));
        assert!(view.contains("   1. "));
    }

    #[test]
    fn fresh_profile_uses_fallback_name() {
        let view = ProfileView(&UserProfile::default()).to_string();
        assert!(view.contains("Name: Wellness Seeker"));
        assert!(view.contains("Age:  not set"));
        assert!(view.contains("No quiz taken yet"));
    }

    #[test]
    fn completion_without_result_asks_for_retake() {
        let profile = UserProfile {
            has_completed_quiz: true,
            ..UserProfile::default()
        };
        let view = ProfileView(&profile).to_string();
        assert!(view.contains("could not be restored"));
        assert!(!view.contains("No quiz taken yet"));
    }

    #[test]
    fn completed_profile_shows_result() {
        let profile = UserProfile::default().apply_quiz_result(finished_result());
        let view = ProfileView(&profile).to_string();

        assert!(view.contains("Wellness Seeker, your dominant dosha is Pitta"));
        assert!(view.contains("Pitta  [####################] 100% (10 points, high)"));
        assert!(view.contains("Recommendations"));
    }
}
