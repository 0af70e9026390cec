use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DoshaParseError {
    #[error("unknown dosha: {0}")]
    Unknown(String),
}

/// One of the three constitution categories a quiz answer contributes to.
///
/// The declaration order is also the tie-break priority used when scoring:
/// `Vata` wins over `Pitta`, which wins over `Kapha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    /// All doshas in priority order.
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dosha::Vata => "vata",
            Dosha::Pitta => "pitta",
            Dosha::Kapha => "kapha",
        }
    }

    /// Capitalized name for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        }
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dosha {
    type Err = DoshaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vata" => Ok(Dosha::Vata),
            "pitta" => Ok(Dosha::Pitta),
            "kapha" => Ok(Dosha::Kapha),
            _ => Err(DoshaParseError::Unknown(s.to_owned())),
        }
    }
}

//
// ─── PER-DOSHA MAPPING ─────────────────────────────────────────────────────────
//

/// Exhaustive mapping with exactly one value per dosha.
///
/// There is no way to address a category that does not exist, so lookups are
/// infallible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoshaMap<T> {
    pub vata: T,
    pub pitta: T,
    pub kapha: T,
}

impl<T> DoshaMap<T> {
    #[must_use]
    pub fn new(vata: T, pitta: T, kapha: T) -> Self {
        Self { vata, pitta, kapha }
    }

    /// Build a map by evaluating `f` for every dosha in priority order.
    pub fn from_fn(mut f: impl FnMut(Dosha) -> T) -> Self {
        let vata = f(Dosha::Vata);
        let pitta = f(Dosha::Pitta);
        let kapha = f(Dosha::Kapha);
        Self { vata, pitta, kapha }
    }

    #[must_use]
    pub fn get(&self, dosha: Dosha) -> &T {
        match dosha {
            Dosha::Vata => &self.vata,
            Dosha::Pitta => &self.pitta,
            Dosha::Kapha => &self.kapha,
        }
    }

    pub fn get_mut(&mut self, dosha: Dosha) -> &mut T {
        match dosha {
            Dosha::Vata => &mut self.vata,
            Dosha::Pitta => &mut self.pitta,
            Dosha::Kapha => &mut self.kapha,
        }
    }

    /// Iterate entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Dosha, &T)> {
        Dosha::ALL.into_iter().map(move |dosha| (dosha, self.get(dosha)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Dosha, &T) -> U) -> DoshaMap<U> {
        DoshaMap::from_fn(|dosha| f(dosha, self.get(dosha)))
    }
}
