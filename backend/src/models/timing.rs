//! Types for auspicious-timing requests and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BodyId, ModelError};

/// What a timing request is for. Unknown purposes fall back to [`Purpose::General`]
/// through [`Purpose::parse_lenient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Marriage,
    Business,
    Travel,
    Education,
    Property,
    Spiritual,
    Medical,
    General,
}

impl Purpose {
    pub const fn name(self) -> &'static str {
        match self {
            Purpose::Marriage => "marriage",
            Purpose::Business => "business",
            Purpose::Travel => "travel",
            Purpose::Education => "education",
            Purpose::Property => "property",
            Purpose::Spiritual => "spiritual",
            Purpose::Medical => "medical",
            Purpose::General => "general",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            log::warn!("Unknown timing purpose '{}', using general rules", s);
            Purpose::General
        })
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Purpose {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marriage" | "wedding" | "engagement" => Ok(Purpose::Marriage),
            "business" | "contract" | "investment" => Ok(Purpose::Business),
            "travel" | "journey" => Ok(Purpose::Travel),
            "education" | "study" | "exam" => Ok(Purpose::Education),
            "property" | "housewarming" | "griha_pravesh" => Ok(Purpose::Property),
            "spiritual" | "ritual" | "puja" => Ok(Purpose::Spiritual),
            "medical" | "surgery" | "health" => Ok(Purpose::Medical),
            "general" | "" => Ok(Purpose::General),
            other => Err(ModelError::UnknownPurpose(other.to_string())),
        }
    }
}

/// A caller-supplied weighting for one body, in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInfluence")]
pub struct PlanetaryInfluence {
    pub body: BodyId,
    pub strength: f64,
}

#[derive(Deserialize)]
struct RawInfluence {
    body: BodyId,
    strength: f64,
}

impl TryFrom<RawInfluence> for PlanetaryInfluence {
    type Error = ModelError;

    fn try_from(raw: RawInfluence) -> Result<Self, Self::Error> {
        PlanetaryInfluence::new(raw.body, raw.strength)
    }
}

impl PlanetaryInfluence {
    pub fn new(body: BodyId, strength: f64) -> Result<Self, ModelError> {
        if !strength.is_finite() || !(-1.0..=1.0).contains(&strength) {
            return Err(ModelError::InvalidStrength {
                body,
                value: strength,
            });
        }
        Ok(Self { body, strength })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowQuality {
    Avoid,
    Challenging,
    Neutral,
    Good,
    Excellent,
}

impl WindowQuality {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            WindowQuality::Excellent
        } else if score >= 0.6 {
            WindowQuality::Good
        } else if score >= 0.4 {
            WindowQuality::Neutral
        } else {
            WindowQuality::Challenging
        }
    }
}

/// A scored segment of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quality: WindowQuality,
    pub score: f64,
    pub reasons: Vec<String>,
}

impl TimingWindow {
    /// Half-open containment: `start <= instant < end`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Constraints a proposed instant must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRequirements {
    #[serde(default = "default_purpose")]
    pub purpose: Purpose,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_true")]
    pub avoid_rahu_kaal: bool,
    /// How many days ahead to look for the next qualifying window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_days: Option<u32>,
    #[serde(default)]
    pub influences: Vec<PlanetaryInfluence>,
}

fn default_purpose() -> Purpose {
    Purpose::General
}

fn default_min_score() -> f64 {
    0.6
}

fn default_true() -> bool {
    true
}

impl TimingRequirements {
    pub fn for_purpose(purpose: Purpose) -> Self {
        Self {
            purpose,
            min_score: default_min_score(),
            avoid_rahu_kaal: true,
            search_days: None,
            influences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingValidation {
    pub is_auspicious: bool,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_auspicious_time: Option<DateTime<Utc>>,
}
