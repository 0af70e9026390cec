use chrono::{DateTime, Duration, Utc};

/// Delay between selecting an answer and moving to the next question.
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: i64 = 500;

#[must_use]
pub fn default_auto_advance_delay() -> Duration {
    Duration::milliseconds(DEFAULT_AUTO_ADVANCE_DELAY_MS)
}

/// Deferred move to the next question, scheduled by an answer selection.
///
/// The handle is keyed to the question it was scheduled on; it only applies
/// while the session is still showing that question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    from_index: usize,
    due_at: DateTime<Utc>,
}

impl PendingAdvance {
    #[must_use]
    pub fn new(from_index: usize, due_at: DateTime<Utc>) -> Self {
        Self { from_index, due_at }
    }

    #[must_use]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at
    }

    /// Time left until the advance fires, zero once due.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.due_at - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_core::time::fixed_now;

    #[test]
    fn due_once_deadline_passes() {
        let now = fixed_now();
        let pending = PendingAdvance::new(0, now + default_auto_advance_delay());

        assert!(!pending.is_due(now));
        assert_eq!(pending.remaining(now), Duration::milliseconds(500));
        assert!(pending.is_due(now + Duration::milliseconds(500)));
        assert_eq!(
            pending.remaining(now + Duration::seconds(2)),
            Duration::zero()
        );
    }
}
