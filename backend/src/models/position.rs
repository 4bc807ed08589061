//! Ecliptic positions and natal charts.
//!
//! Both types validate their invariants at construction and again when
//! deserialized, so a chart that reaches the scanner is always well formed.

use chrono::{DateTime, Utc};
use qtty::Degrees;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{BodyId, ModelError};

/// Ecliptic longitude of a single body at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct PlanetaryPosition {
    pub body: BodyId,
    pub longitude: Degrees,
}

#[derive(Deserialize)]
struct RawPosition {
    body: BodyId,
    longitude: f64,
}

impl TryFrom<RawPosition> for PlanetaryPosition {
    type Error = ModelError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        PlanetaryPosition::new(raw.body, raw.longitude)
    }
}

impl PlanetaryPosition {
    /// Create a position, rejecting longitudes outside `[0, 360)`.
    pub fn new(body: BodyId, longitude: f64) -> Result<Self, ModelError> {
        if !longitude.is_finite() || !(0.0..360.0).contains(&longitude) {
            return Err(ModelError::InvalidLongitude {
                body,
                value: longitude,
            });
        }
        Ok(Self {
            body,
            longitude: Degrees::new(longitude),
        })
    }

    /// Create a position from an unwrapped longitude, folding it into `[0, 360)`.
    ///
    /// Only non-finite input is rejected.
    pub fn normalized(body: BodyId, longitude: f64) -> Result<Self, ModelError> {
        if !longitude.is_finite() {
            return Err(ModelError::InvalidLongitude {
                body,
                value: longitude,
            });
        }
        let wrapped = Degrees::new(longitude).wrap_pos().value();
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        let wrapped = if wrapped >= 360.0 { 0.0 } else { wrapped };
        Self::new(body, wrapped)
    }
}

/// Zodiac sign index (0..12) of an ecliptic longitude in `[0, 360)`.
pub fn sign_of(longitude: Degrees) -> u8 {
    ((longitude.value() / 30.0).floor() as u8).min(11)
}

/// A natal (reference) chart: the positions transits are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBirthChart")]
pub struct BirthChart {
    /// Moment of birth, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_time: Option<DateTime<Utc>>,
    /// Ascendant longitude; houses are counted from its sign when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendant: Option<Degrees>,
    positions: Vec<PlanetaryPosition>,
}

#[derive(Deserialize)]
struct RawBirthChart {
    #[serde(default)]
    birth_time: Option<DateTime<Utc>>,
    #[serde(default)]
    ascendant: Option<f64>,
    positions: Vec<PlanetaryPosition>,
}

impl TryFrom<RawBirthChart> for BirthChart {
    type Error = ModelError;

    fn try_from(raw: RawBirthChart) -> Result<Self, Self::Error> {
        let mut chart = BirthChart::new(raw.positions)?;
        chart.birth_time = raw.birth_time;
        if let Some(asc) = raw.ascendant {
            chart = chart.with_ascendant(asc)?;
        }
        Ok(chart)
    }
}

impl BirthChart {
    /// Build a chart from natal positions.
    ///
    /// A chart must contain at least one body and no body twice.
    pub fn new(positions: Vec<PlanetaryPosition>) -> Result<Self, ModelError> {
        if positions.is_empty() {
            return Err(ModelError::EmptyChart);
        }
        let mut seen = HashSet::with_capacity(positions.len());
        for position in &positions {
            if !seen.insert(position.body) {
                return Err(ModelError::DuplicateBody(position.body));
            }
        }
        Ok(Self {
            birth_time: None,
            ascendant: None,
            positions,
        })
    }

    pub fn with_ascendant(mut self, longitude: f64) -> Result<Self, ModelError> {
        if !longitude.is_finite() || !(0.0..360.0).contains(&longitude) {
            return Err(ModelError::InvalidAscendant(longitude));
        }
        self.ascendant = Some(Degrees::new(longitude));
        Ok(self)
    }

    pub fn positions(&self) -> &[PlanetaryPosition] {
        &self.positions
    }

    /// Whole-sign house (1..=12) of a longitude relative to this chart.
    ///
    /// Without an ascendant the natural zodiac is used, so Aries is the first house.
    pub fn house_of(&self, longitude: Degrees) -> u8 {
        let reference = self.ascendant.map(sign_of).unwrap_or(0);
        (sign_of(longitude) + 12 - reference) % 12 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(body: BodyId, lon: f64) -> PlanetaryPosition {
        PlanetaryPosition::new(body, lon).unwrap()
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(PlanetaryPosition::new(BodyId::Sun, 360.0).is_err());
        assert!(PlanetaryPosition::new(BodyId::Sun, -0.1).is_err());
        assert!(PlanetaryPosition::new(BodyId::Sun, f64::NAN).is_err());
        assert!(PlanetaryPosition::new(BodyId::Sun, 359.99).is_ok());
    }

    #[test]
    fn test_normalized_wraps() {
        let p = PlanetaryPosition::normalized(BodyId::Moon, 370.0).unwrap();
        assert!((p.longitude.value() - 10.0).abs() < 1e-9);
        let p = PlanetaryPosition::normalized(BodyId::Moon, -30.0).unwrap();
        assert!((p.longitude.value() - 330.0).abs() < 1e-9);
        assert!(PlanetaryPosition::normalized(BodyId::Moon, f64::INFINITY).is_err());
    }

    #[test]
    fn test_chart_rejects_empty_and_duplicates() {
        assert!(matches!(BirthChart::new(vec![]), Err(ModelError::EmptyChart)));
        let dup = BirthChart::new(vec![pos(BodyId::Sun, 1.0), pos(BodyId::Sun, 2.0)]);
        assert!(matches!(dup, Err(ModelError::DuplicateBody(BodyId::Sun))));
    }

    #[test]
    fn test_house_without_ascendant_uses_natural_zodiac() {
        let chart = BirthChart::new(vec![pos(BodyId::Sun, 10.0)]).unwrap();
        assert_eq!(chart.house_of(Degrees::new(5.0)), 1);
        assert_eq!(chart.house_of(Degrees::new(95.0)), 4);
        assert_eq!(chart.house_of(Degrees::new(359.0)), 12);
    }

    #[test]
    fn test_house_counts_from_ascendant_sign() {
        let chart = BirthChart::new(vec![pos(BodyId::Sun, 10.0)])
            .unwrap()
            .with_ascendant(125.0)
            .unwrap();
        // Ascendant in Leo: Leo is the first house, Cancer the twelfth.
        assert_eq!(chart.house_of(Degrees::new(121.0)), 1);
        assert_eq!(chart.house_of(Degrees::new(100.0)), 12);
        assert_eq!(chart.house_of(Degrees::new(10.0)), 9);
    }

    #[test]
    fn test_chart_deserialization_validates() {
        let ok: BirthChart = serde_json::from_str(
            r#"{"ascendant": 42.0, "positions": [{"body": "sun", "longitude": 10.0}]}"#,
        )
        .unwrap();
        assert_eq!(ok.positions().len(), 1);
        assert!(ok.ascendant.is_some());

        let bad = serde_json::from_str::<BirthChart>(
            r#"{"positions": [{"body": "sun", "longitude": 400.0}]}"#,
        );
        assert!(bad.is_err());
        let empty = serde_json::from_str::<BirthChart>(r#"{"positions": []}"#);
        assert!(empty.is_err());
    }
}
