//! Time source for result timestamps and auto-advance deadlines.
//!
//! Quiz sessions never read the wall clock themselves. The services layer
//! passes `Clock::now()` into every time-dependent call, so a `Fixed` clock
//! makes auto-advance and `computed_at` reproducible.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Wall-clock UTC.
    #[default]
    System,
    /// Frozen instant that only moves through [`Clock::advance`].
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Step a fixed clock forward, typically past a pending auto-advance deadline.
    ///
    /// A step past the representable range leaves the clock where it was.
    /// `Clock::System` ignores the call.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            if let Some(next) = t.checked_add_signed(delta) {
                *t = next;
            }
        }
    }
}

/// Seconds since the Unix epoch of [`fixed_now`] (2023-11-14T22:13:20Z).
pub const FIXED_TIMESTAMP_SECS: i64 = 1_700_000_000;

/// The instant tests and doc examples pin their clocks to.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::seconds(FIXED_TIMESTAMP_SECS)
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_steps_past_advance_delay() {
        let mut clock = fixed_clock();
        clock.advance(Duration::milliseconds(500));
        assert_eq!(clock.now(), fixed_now() + Duration::milliseconds(500));
        assert_eq!(fixed_now().timestamp(), FIXED_TIMESTAMP_SECS);
    }

    #[test]
    fn overflowing_step_keeps_clock_in_place() {
        let mut clock = fixed_clock();
        clock.advance(Duration::milliseconds(i64::MAX));
        assert_eq!(clock, fixed_clock());
    }

    #[test]
    fn system_clock_is_default_and_ignores_advance() {
        let mut clock = Clock::default();
        clock.advance(Duration::seconds(5));
        assert_eq!(clock, Clock::System);
    }
}
