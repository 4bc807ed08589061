use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;

/// A tracked celestial point: the seven classical planets and the two lunar nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyId {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Rahu,
    Ketu,
}

/// All bodies in traditional weekday-lord order followed by the nodes.
pub const ALL_BODIES: [BodyId; 9] = [
    BodyId::Sun,
    BodyId::Moon,
    BodyId::Mars,
    BodyId::Mercury,
    BodyId::Jupiter,
    BodyId::Venus,
    BodyId::Saturn,
    BodyId::Rahu,
    BodyId::Ketu,
];

impl BodyId {
    pub const fn name(self) -> &'static str {
        match self {
            BodyId::Sun => "sun",
            BodyId::Moon => "moon",
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Rahu => "rahu",
            BodyId::Ketu => "ketu",
        }
    }

    /// The primary luminary widens every orb it takes part in.
    pub const fn is_primary_luminary(self) -> bool {
        matches!(self, BodyId::Sun)
    }

    /// The secondary luminary widens orbs further than the primary one.
    pub const fn is_secondary_luminary(self) -> bool {
        matches!(self, BodyId::Moon)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "surya" => Ok(BodyId::Sun),
            "moon" | "chandra" => Ok(BodyId::Moon),
            "mercury" | "budha" => Ok(BodyId::Mercury),
            "venus" | "shukra" => Ok(BodyId::Venus),
            "mars" | "mangala" => Ok(BodyId::Mars),
            "jupiter" | "guru" => Ok(BodyId::Jupiter),
            "saturn" | "shani" => Ok(BodyId::Saturn),
            "rahu" | "north_node" => Ok(BodyId::Rahu),
            "ketu" | "south_node" => Ok(BodyId::Ketu),
            other => Err(ModelError::UnknownBody(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names_and_aliases() {
        assert_eq!("Sun".parse::<BodyId>().unwrap(), BodyId::Sun);
        assert_eq!(" guru ".parse::<BodyId>().unwrap(), BodyId::Jupiter);
        assert_eq!("north_node".parse::<BodyId>().unwrap(), BodyId::Rahu);
    }

    #[test]
    fn test_parse_unknown_is_error() {
        let err = "pluto".parse::<BodyId>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownBody(ref s) if s == "pluto"));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BodyId::Saturn).unwrap();
        assert_eq!(json, "\"saturn\"");
        let back: BodyId = serde_json::from_str("\"ketu\"").unwrap();
        assert_eq!(back, BodyId::Ketu);
    }

    #[test]
    fn test_luminaries() {
        assert!(BodyId::Sun.is_primary_luminary());
        assert!(BodyId::Moon.is_secondary_luminary());
        assert!(!BodyId::Mars.is_primary_luminary());
    }
}
