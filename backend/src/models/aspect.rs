use qtty::Degrees;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::BodyId;

/// Canonical angular relationships between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

pub const ALL_ASPECT_KINDS: [AspectKind; 5] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
];

impl AspectKind {
    /// Exact angle of the aspect in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }

    pub const fn nature(self) -> AspectNature {
        match self {
            AspectKind::Trine | AspectKind::Sextile => AspectNature::Beneficial,
            AspectKind::Conjunction => AspectNature::Neutral,
            AspectKind::Square | AspectKind::Opposition => AspectNature::Challenging,
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectNature {
    Beneficial,
    Neutral,
    Challenging,
}

/// A matched aspect between a transiting body (`body_a`) and a natal body (`body_b`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub kind: AspectKind,
    /// Actual angular separation, in `[0, 180]`.
    pub angle: Degrees,
    /// Distance from the exact aspect angle.
    pub deviation: Degrees,
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub nature: AspectNature,
}

impl Aspect {
    /// Two aspects describe the same relationship when kind and body pair agree.
    pub fn same_relationship(&self, other: &Aspect) -> bool {
        self.kind == other.kind && self.body_a == other.body_a && self.body_b == other.body_b
    }
}
