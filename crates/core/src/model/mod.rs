mod answers;
mod dosha;
mod ids;
mod profile;
mod question;
mod result;

pub use answers::AnswerVector;
pub use dosha::{Dosha, DoshaMap, DoshaParseError};
pub use ids::QuestionId;
pub use profile::{DEFAULT_DISPLAY_NAME, ProfileEdits, UserProfile, parse_age};
pub use question::{Choice, Question, QuestionBank, QuestionBankError};
pub use result::{
    ScoreBand, ScoreBar, ScorePercentages, ScoreResult, ScoreResultError, ScoreTotals,
};
