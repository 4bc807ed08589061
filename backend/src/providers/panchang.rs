use chrono::NaiveDate;

use super::{longitude_of, PanchangCalculator, ProviderError};
use crate::models::{BodyId, PanchangIndices, PlanetaryPosition};

const TITHI_SPAN: f64 = 12.0;
const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Derives the calendar indices from the Sun and Moon longitudes of the day.
///
/// Works with tropical or sidereal longitudes alike; the tithi and yoga only
/// depend on the difference and sum of the two, but the nakshatra follows the
/// zodiac the positions are expressed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuniSolarPanchang;

impl LuniSolarPanchang {
    pub fn indices(sun: f64, moon: f64) -> PanchangIndices {
        let elongation = (moon - sun).rem_euclid(360.0);
        let sum = (moon + sun).rem_euclid(360.0);
        PanchangIndices {
            tithi: index_in(elongation, TITHI_SPAN, 30),
            nakshatra: index_in(moon.rem_euclid(360.0), NAKSHATRA_SPAN, 27),
            yoga: index_in(sum, NAKSHATRA_SPAN, 27),
        }
    }
}

/// 1-based bucket of `value` in spans of `span`, clamped to `count`.
fn index_in(value: f64, span: f64, count: u8) -> u8 {
    ((value / span).floor() as u8).min(count - 1) + 1
}

impl PanchangCalculator for LuniSolarPanchang {
    fn panchang_for(
        &self,
        _date: NaiveDate,
        positions: &[PlanetaryPosition],
    ) -> Result<PanchangIndices, ProviderError> {
        let sun = longitude_of(positions, BodyId::Sun)?;
        let moon = longitude_of(positions, BodyId::Moon)?;
        Ok(Self::indices(sun, moon))
    }
}
