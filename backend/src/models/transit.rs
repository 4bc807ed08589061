//! Scanner output and consolidated transit periods.

use chrono::NaiveDate;
use qtty::Degrees;
use serde::{Deserialize, Serialize};

use super::{Aspect, BodyId, PanchangIndices};

/// One transiting body on one day, with the natal aspects it formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitObservation {
    pub body: BodyId,
    pub date: NaiveDate,
    pub longitude: Degrees,
    /// Whole-sign house relative to the natal chart, 1..=12.
    pub house: u8,
    pub aspects: Vec<Aspect>,
    /// In `(0, 1]`.
    pub significance: f64,
}

/// Which of the day's calendar indices fell in an auspicious set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuspiciousFlags {
    pub tithi: bool,
    pub nakshatra: bool,
    pub yoga: bool,
}

impl AuspiciousFlags {
    pub fn any(&self) -> bool {
        self.tithi || self.nakshatra || self.yoga
    }
}

/// A significant day found by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanObservation {
    pub date: NaiveDate,
    pub panchang: PanchangIndices,
    pub auspicious: AuspiciousFlags,
    /// Transiting bodies that formed at least one aspect; empty when the day
    /// is significant through its calendar indices alone.
    pub transits: Vec<TransitObservation>,
}

impl ScanObservation {
    pub fn into_transits(self) -> Vec<TransitObservation> {
        self.transits
    }
}

/// A contiguous span during which a body kept aspecting the natal chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitPeriod {
    pub body: BodyId,
    pub house: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub aspects: Vec<Aspect>,
    pub effect_summary: String,
    pub significance: f64,
}

impl TransitPeriod {
    /// Number of calendar days covered, inclusive of both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
