use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Dosha, DoshaMap};

/// Accumulated choice weight per dosha.
pub type ScoreTotals = DoshaMap<u32>;

/// Rounded share of the grand total per dosha, each in `0..=100`.
pub type ScorePercentages = DoshaMap<u8>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreResultError {
    #[error("percentage for {dosha} is {value}, expected at most 100")]
    PercentageOutOfRange { dosha: Dosha, value: u8 },

    #[error("dominant dosha {dominant} does not hold the highest total")]
    DominantMismatch { dominant: Dosha },
}

/// Outcome of scoring a completed questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    dominant: Dosha,
    totals: ScoreTotals,
    percentages: ScorePercentages,
    computed_at: DateTime<Utc>,
}

impl ScoreResult {
    pub(crate) fn new(
        dominant: Dosha,
        totals: ScoreTotals,
        percentages: ScorePercentages,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dominant,
            totals,
            percentages,
            computed_at,
        }
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ScoreResultError::PercentageOutOfRange` if any percentage exceeds 100,
    /// or `ScoreResultError::DominantMismatch` if another dosha has a strictly larger total.
    pub fn from_persisted(
        dominant: Dosha,
        totals: ScoreTotals,
        percentages: ScorePercentages,
        computed_at: DateTime<Utc>,
    ) -> Result<Self, ScoreResultError> {
        if let Some((dosha, value)) = percentages.iter().find(|(_, value)| **value > 100) {
            return Err(ScoreResultError::PercentageOutOfRange {
                dosha,
                value: *value,
            });
        }
        let dominant_total = *totals.get(dominant);
        if totals.iter().any(|(_, total)| *total > dominant_total) {
            return Err(ScoreResultError::DominantMismatch { dominant });
        }
        Ok(Self::new(dominant, totals, percentages, computed_at))
    }

    #[must_use]
    pub fn dominant(&self) -> Dosha {
        self.dominant
    }

    #[must_use]
    pub fn totals(&self) -> &ScoreTotals {
        &self.totals
    }

    #[must_use]
    pub fn percentages(&self) -> &ScorePercentages {
        &self.percentages
    }

    #[must_use]
    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Score bars for the results view, each relative to the highest total.
    #[must_use]
    pub fn score_bars(&self) -> Vec<ScoreBar> {
        let max = self.totals.iter().map(|(_, total)| *total).max().unwrap_or(0);
        self.totals
            .iter()
            .map(|(dosha, total)| {
                let fill = relative_percent(*total, max);
                ScoreBar {
                    dosha,
                    total: *total,
                    fill,
                    band: ScoreBand::for_fill(fill),
                }
            })
            .collect()
    }
}

//
// ─── RESULTS VIEW ──────────────────────────────────────────────────────────────
//

/// Visual intensity of a score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 70% of the leading total or more.
    High,
    /// 40% up to 70%.
    Moderate,
    Low,
}

impl ScoreBand {
    #[must_use]
    pub fn for_fill(fill: u8) -> Self {
        match fill {
            70.. => Self::High,
            40..=69 => Self::Moderate,
            _ => Self::Low,
        }
    }
}

/// One row of the "dosha balance" chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBar {
    pub dosha: Dosha,
    pub total: u32,
    /// Width of the bar in percent of the leading dosha's total.
    pub fill: u8,
    pub band: ScoreBand,
}

fn relative_percent(value: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let scaled = u64::from(value) * 100 / u64::from(max);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn from_persisted_rejects_out_of_range_percentage() {
        let err = ScoreResult::from_persisted(
            Dosha::Vata,
            DoshaMap::new(3, 0, 0),
            DoshaMap::new(101, 0, 0),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoreResultError::PercentageOutOfRange {
                dosha: Dosha::Vata,
                value: 101
            }
        );
    }

    #[test]
    fn from_persisted_rejects_wrong_dominant() {
        let err = ScoreResult::from_persisted(
            Dosha::Kapha,
            DoshaMap::new(3, 1, 0),
            DoshaMap::new(75, 25, 0),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScoreResultError::DominantMismatch {
                dominant: Dosha::Kapha
            }
        );
    }

    #[test]
    fn score_bars_are_relative_to_leader() {
        let result = ScoreResult::new(
            Dosha::Pitta,
            DoshaMap::new(3, 6, 2),
            DoshaMap::new(27, 55, 18),
            fixed_now(),
        );
        let bars = result.score_bars();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].fill, 50);
        assert_eq!(bars[0].band, ScoreBand::Moderate);
        assert_eq!(bars[1].fill, 100);
        assert_eq!(bars[1].band, ScoreBand::High);
        assert_eq!(bars[2].fill, 33);
        assert_eq!(bars[2].band, ScoreBand::Low);
    }
}
