//! Static descriptions of each dosha, shown alongside a result.

use crate::model::Dosha;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoshaInfo {
    pub dosha: Dosha,
    pub element: &'static str,
    pub description: &'static str,
    pub characteristics: &'static [&'static str],
    pub recommendations: &'static [&'static str],
}

const VATA: DoshaInfo = DoshaInfo {
    dosha: Dosha::Vata,
    element: "Air & Space",
    description: "Vata governs movement in body and mind. When balanced it brings \
                  creativity and quick thinking; out of balance it shows up as worry, \
                  dryness and irregular energy.",
    characteristics: &[
        "Light, thin frame",
        "Quick, creative mind",
        "Variable appetite and digestion",
        "Tends toward dry skin and cold hands",
        "Light, easily interrupted sleep",
    ],
    recommendations: &[
        "Keep a regular daily routine",
        "Favor warm, cooked, grounding meals",
        "Practice slow, steady movement such as gentle yoga",
        "Stay warm and avoid cold, dry wind",
        "Oil massage with warm sesame oil",
    ],
};

const PITTA: DoshaInfo = DoshaInfo {
    dosha: Dosha::Pitta,
    element: "Fire & Water",
    description: "Pitta governs transformation and metabolism. When balanced it brings \
                  focus and strong digestion; out of balance it shows up as irritability, \
                  inflammation and overheating.",
    characteristics: &[
        "Medium, athletic build",
        "Sharp intellect and strong focus",
        "Strong appetite, dislikes skipping meals",
        "Runs warm and sweats easily",
        "Driven, competitive temperament",
    ],
    recommendations: &[
        "Favor cooling foods such as cucumber and leafy greens",
        "Avoid excessive heat and midday sun",
        "Make time for leisure without competition",
        "Practice calming breathwork",
        "Limit spicy, fried and sour foods",
    ],
};

const KAPHA: DoshaInfo = DoshaInfo {
    dosha: Dosha::Kapha,
    element: "Earth & Water",
    description: "Kapha governs structure and stability. When balanced it brings \
                  calm, strength and endurance; out of balance it shows up as sluggishness, \
                  congestion and resistance to change.",
    characteristics: &[
        "Solid, sturdy frame",
        "Calm, steady disposition",
        "Slow but steady digestion",
        "Deep, long sleep",
        "Excellent long-term memory",
    ],
    recommendations: &[
        "Get vigorous daily exercise",
        "Favor light, warm and spiced foods",
        "Rise early and avoid daytime naps",
        "Seek variety and new experiences",
        "Reduce heavy, oily and sweet foods",
    ],
};

/// Catalog entry for a dosha.
#[must_use]
pub fn info(dosha: Dosha) -> &'static DoshaInfo {
    match dosha {
        Dosha::Vata => &VATA,
        Dosha::Pitta => &PITTA,
        Dosha::Kapha => &KAPHA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dosha_has_matching_entry() {
        for dosha in Dosha::ALL {
            let entry = info(dosha);
            assert_eq!(entry.dosha, dosha);
            assert!(!entry.characteristics.is_empty());
            assert!(!entry.recommendations.is_empty());
        }
    }
}
