use serde::{Deserialize, Serialize};

use crate::types::Rgb;

const SPRING_LEAVES: &[Rgb] = &[
    Rgb(144, 238, 144),
    Rgb(152, 251, 152),
    Rgb(124, 252, 0),
    Rgb(173, 255, 47),
];
const SUMMER_LEAVES: &[Rgb] = &[
    Rgb(34, 139, 34),
    Rgb(0, 128, 0),
    Rgb(0, 100, 0),
    Rgb(46, 139, 87),
];
const AUTUMN_LEAVES: &[Rgb] = &[
    Rgb(255, 140, 0),
    Rgb(255, 69, 0),
    Rgb(255, 99, 71),
    Rgb(178, 34, 34),
    Rgb(139, 69, 19),
];

/// The four mutually exclusive seasons.
///
/// A season decides the sky, the leaf palette and which ambient particles
/// are spawned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Leaf colours; empty in winter, where tips carry snow instead.
    pub fn leaf_palette(self) -> &'static [Rgb] {
        match self {
            Season::Spring => SPRING_LEAVES,
            Season::Summer => SUMMER_LEAVES,
            Season::Autumn => AUTUMN_LEAVES,
            Season::Winter => &[],
        }
    }

    /// Palette for leaves that have come loose from a branch.
    pub fn falling_palette() -> &'static [Rgb] {
        AUTUMN_LEAVES
    }

    pub fn sky(self) -> Rgb {
        match self {
            Season::Spring => Rgb(135, 206, 235),
            Season::Summer => Rgb(100, 149, 237),
            Season::Autumn => Rgb(255, 165, 0),
            Season::Winter => Rgb(176, 196, 222),
        }
    }

    pub fn ground(self) -> Rgb {
        match self {
            Season::Winter => Rgb(120, 100, 80),
            _ => Rgb(139, 69, 19),
        }
    }

    /// Chance that a tip branch carries a leaf (or a snow clump in winter).
    pub fn foliage_chance(self) -> f32 {
        match self {
            Season::Spring => 0.85,
            Season::Summer => 0.95,
            Season::Autumn => 0.7,
            Season::Winter => 0.5,
        }
    }

    pub fn has_flowers(self) -> bool {
        matches!(self, Season::Spring | Season::Summer)
    }

    pub fn has_butterflies(self) -> bool {
        matches!(self, Season::Spring | Season::Summer)
    }

    pub fn has_birds(self) -> bool {
        !matches!(self, Season::Winter)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
