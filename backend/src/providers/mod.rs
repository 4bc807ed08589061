//! Ephemeris collaborators.
//!
//! The engine never computes positions itself. It asks a [`PositionProvider`]
//! for the longitudes of the day and a [`PanchangCalculator`] for the day's
//! calendar indices. Both traits are object safe so callers can inject mocks or
//! a high-precision ephemeris behind an `Arc<dyn ...>`.

use chrono::NaiveDate;

use crate::models::{BodyId, ModelError, PanchangIndices, PlanetaryPosition};

pub mod mean_motion;
pub mod panchang;

pub use mean_motion::{MeanMotionEphemeris, Zodiac};
pub use panchang::LuniSolarPanchang;

/// Errors raised by ephemeris collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("no position for {0}")]
    MissingBody(BodyId),

    #[error("ephemeris unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    InvalidPosition(#[from] ModelError),
}

/// Source of daily body positions.
///
/// Implementations must be deterministic for a given date.
pub trait PositionProvider: Send + Sync {
    fn positions_at(&self, date: NaiveDate) -> Result<Vec<PlanetaryPosition>, ProviderError>;
}

/// Source of the day's tithi, nakshatra and yoga.
pub trait PanchangCalculator: Send + Sync {
    fn panchang_for(
        &self,
        date: NaiveDate,
        positions: &[PlanetaryPosition],
    ) -> Result<PanchangIndices, ProviderError>;
}

/// Longitude of `body` among `positions`.
pub(crate) fn longitude_of(
    positions: &[PlanetaryPosition],
    body: BodyId,
) -> Result<f64, ProviderError> {
    positions
        .iter()
        .find(|p| p.body == body)
        .map(|p| p.longitude.value())
        .ok_or(ProviderError::MissingBody(body))
}
