/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub current_index: usize,
    pub current_answered: bool,
    pub is_complete: bool,
    pub is_submitted: bool,
}

impl QuizProgress {
    /// Position of the current question as a percentage, for the progress bar.
    #[must_use]
    pub fn position_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.current_index + 1) * 100 / self.total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }

    /// Whether the last question is showing, where "next" turns into "submit".
    #[must_use]
    pub fn on_last_question(&self) -> bool {
        self.current_index + 1 == self.total
    }
}
