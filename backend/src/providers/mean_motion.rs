//! Low-precision mean-motion ephemeris.
//!
//! Good to a degree or two for the Sun and Moon and a few degrees for the
//! planets, which is enough for daily aspect scanning with multi-degree orbs.
//! Planets follow circular heliocentric orbits projected to a geocentric
//! longitude; the lunar nodes use the mean node.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PositionProvider, ProviderError};
use crate::models::time::days_since_j2000;
use crate::models::{BodyId, PlanetaryPosition, ALL_BODIES};

/// Lahiri ayanamsha at J2000.0, degrees.
const LAHIRI_J2000: f64 = 23.853;
/// Precession rate, degrees per day (50.29 arcsec per Julian year).
const PRECESSION_PER_DAY: f64 = 50.29 / 3600.0 / 365.25;

/// Heliocentric mean longitude at J2000 (deg), daily motion (deg/day) and
/// semi-major axis (AU).
struct Orbit {
    l0: f64,
    rate: f64,
    a: f64,
}

const MERCURY: Orbit = Orbit {
    l0: 252.2509,
    rate: 4.092_334_45,
    a: 0.3871,
};
const VENUS: Orbit = Orbit {
    l0: 181.9798,
    rate: 1.602_130_34,
    a: 0.7233,
};
const MARS: Orbit = Orbit {
    l0: 355.4330,
    rate: 0.524_020_68,
    a: 1.5237,
};
const JUPITER: Orbit = Orbit {
    l0: 34.3515,
    rate: 0.083_085_29,
    a: 5.2026,
};
const SATURN: Orbit = Orbit {
    l0: 50.0774,
    rate: 0.033_444_14,
    a: 9.5549,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    #[default]
    Tropical,
    Sidereal,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanMotionEphemeris {
    zodiac: Zodiac,
}

impl MeanMotionEphemeris {
    pub fn new(zodiac: Zodiac) -> Self {
        Self { zodiac }
    }

    pub fn tropical() -> Self {
        Self::new(Zodiac::Tropical)
    }

    pub fn sidereal() -> Self {
        Self::new(Zodiac::Sidereal)
    }

    /// Linear Lahiri ayanamsha `d` days after J2000.
    pub fn ayanamsha(d: f64) -> f64 {
        LAHIRI_J2000 + PRECESSION_PER_DAY * d
    }

    /// Unwrapped tropical longitude of `body`, `d` days after J2000.
    pub fn tropical_longitude(body: BodyId, d: f64) -> f64 {
        match body {
            BodyId::Sun => sun_longitude(d),
            BodyId::Moon => {
                let mean = 218.316 + 13.176_396 * d;
                let anomaly = (134.963 + 13.064_993 * d).to_radians();
                mean + 6.289 * anomaly.sin()
            }
            BodyId::Mercury => geocentric(&MERCURY, d),
            BodyId::Venus => geocentric(&VENUS, d),
            BodyId::Mars => geocentric(&MARS, d),
            BodyId::Jupiter => geocentric(&JUPITER, d),
            BodyId::Saturn => geocentric(&SATURN, d),
            BodyId::Rahu => mean_node(d),
            BodyId::Ketu => mean_node(d) + 180.0,
        }
    }
}

fn sun_longitude(d: f64) -> f64 {
    let mean = 280.460 + 0.985_647_4 * d;
    let g = (357.528 + 0.985_600_3 * d).to_radians();
    mean + 1.915 * g.sin() + 0.020 * (2.0 * g).sin()
}

fn mean_node(d: f64) -> f64 {
    125.0445 - 0.052_953_8 * d
}

fn geocentric(orbit: &Orbit, d: f64) -> f64 {
    let planet = (orbit.l0 + orbit.rate * d).to_radians();
    let earth = (sun_longitude(d) + 180.0).to_radians();
    let x = orbit.a * planet.cos() - earth.cos();
    let y = orbit.a * planet.sin() - earth.sin();
    y.atan2(x).to_degrees()
}

impl PositionProvider for MeanMotionEphemeris {
    fn positions_at(&self, date: NaiveDate) -> Result<Vec<PlanetaryPosition>, ProviderError> {
        let d = days_since_j2000(date);
        let shift = match self.zodiac {
            Zodiac::Tropical => 0.0,
            Zodiac::Sidereal => Self::ayanamsha(d),
        };
        ALL_BODIES
            .iter()
            .map(|body| {
                let lon = Self::tropical_longitude(*body, d) - shift;
                PlanetaryPosition::normalized(*body, lon).map_err(ProviderError::from)
            })
            .collect()
    }
}
