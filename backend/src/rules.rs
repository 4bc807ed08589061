//! Replaceable astrological rule data.
//!
//! The engine only asks questions of these tables ("is this tithi auspicious?",
//! "which bodies favour travel?"). Index sets can be overridden from the
//! `[rules]` section of the configuration file; the per-body and per-purpose
//! lookups are exhaustive matches over closed enums.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{BodyId, PanchangIndices, Purpose};

/// Auspicious calendar index sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Tithi numbers within a paksha (1..=15).
    pub auspicious_tithis: BTreeSet<u8>,
    /// Nakshatra numbers (1..=27).
    pub auspicious_nakshatras: BTreeSet<u8>,
    /// Yoga numbers (1..=27).
    pub auspicious_yogas: BTreeSet<u8>,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            // Dvitiya, Tritiya, Panchami, Saptami, Dashami, Ekadashi, Trayodashi
            auspicious_tithis: [2, 3, 5, 7, 10, 11, 13].into_iter().collect(),
            // Ashwini, Rohini, Mrigashira, Punarvasu, Pushya, Hasta, Chitra, Swati,
            // Anuradha, Shravana, Dhanishta, Shatabhisha, Revati
            auspicious_nakshatras: [1, 4, 5, 7, 8, 13, 14, 15, 17, 22, 23, 24, 27]
                .into_iter()
                .collect(),
            // Ayushman, Saubhagya, Dhriti, Dhruva, Siddhi, Siddha, Shubha, Brahma
            auspicious_yogas: [3, 4, 8, 12, 16, 21, 23, 25].into_iter().collect(),
        }
    }
}

impl RuleTables {
    pub fn is_auspicious_tithi(&self, indices: &PanchangIndices) -> bool {
        self.auspicious_tithis.contains(&indices.tithi_in_paksha())
    }

    pub fn is_auspicious_nakshatra(&self, indices: &PanchangIndices) -> bool {
        self.auspicious_nakshatras.contains(&indices.nakshatra)
    }

    pub fn is_auspicious_yoga(&self, indices: &PanchangIndices) -> bool {
        self.auspicious_yogas.contains(&indices.yoga)
    }
}

/// Short description of what a transit of `body` tends to bring.
pub fn transit_effect(body: BodyId) -> &'static str {
    match body {
        BodyId::Sun => "vitality, recognition and dealings with authority",
        BodyId::Moon => "mood, family matters and short-lived emotional tides",
        BodyId::Mercury => "communication, trade and learning",
        BodyId::Venus => "relationships, comfort and creative work",
        BodyId::Mars => "energy, conflict and decisive action",
        BodyId::Jupiter => "growth, guidance and good fortune",
        BodyId::Saturn => "discipline, delays and lasting structures",
        BodyId::Rahu => "ambition, disruption and unconventional opportunities",
        BodyId::Ketu => "detachment, endings and spiritual insight",
    }
}

/// Relative weight of a transit; slow movers shape longer stretches of time.
pub fn transit_weight(body: BodyId) -> f64 {
    match body {
        BodyId::Saturn | BodyId::Jupiter | BodyId::Rahu | BodyId::Ketu => 1.0,
        BodyId::Mars => 0.9,
        BodyId::Sun | BodyId::Venus | BodyId::Mercury => 0.8,
        BodyId::Moon => 0.6,
    }
}

/// Bodies whose strength supports an undertaking.
pub fn favoured_bodies(purpose: Purpose) -> &'static [BodyId] {
    match purpose {
        Purpose::Marriage => &[BodyId::Venus, BodyId::Jupiter, BodyId::Moon],
        Purpose::Business => &[BodyId::Mercury, BodyId::Jupiter],
        Purpose::Travel => &[BodyId::Moon, BodyId::Mercury],
        Purpose::Education => &[BodyId::Mercury, BodyId::Jupiter],
        Purpose::Property => &[BodyId::Mars, BodyId::Venus, BodyId::Saturn],
        Purpose::Spiritual => &[BodyId::Jupiter, BodyId::Ketu, BodyId::Sun],
        Purpose::Medical => &[BodyId::Sun, BodyId::Mars],
        Purpose::General => &[BodyId::Jupiter],
    }
}

pub fn weekday_lord(weekday: Weekday) -> BodyId {
    match weekday {
        Weekday::Sun => BodyId::Sun,
        Weekday::Mon => BodyId::Moon,
        Weekday::Tue => BodyId::Mars,
        Weekday::Wed => BodyId::Mercury,
        Weekday::Thu => BodyId::Jupiter,
        Weekday::Fri => BodyId::Venus,
        Weekday::Sat => BodyId::Saturn,
    }
}

/// 1-based index of the Rahu Kaal segment when daylight is cut into eight parts.
pub fn rahu_kaal_segment(weekday: Weekday) -> usize {
    match weekday {
        Weekday::Mon => 2,
        Weekday::Sat => 3,
        Weekday::Fri => 4,
        Weekday::Wed => 5,
        Weekday::Thu => 6,
        Weekday::Tue => 7,
        Weekday::Sun => 8,
    }
}
