use serde::{Deserialize, Serialize};

/// Traditional calendar indices for a single day, all 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanchangIndices {
    /// Lunar day, 1..=30 (1..=15 waxing, 16..=30 waning).
    pub tithi: u8,
    /// Lunar mansion, 1..=27.
    pub nakshatra: u8,
    /// Luni-solar yoga, 1..=27.
    pub yoga: u8,
}

impl PanchangIndices {
    /// Tithi number within its fortnight, 1..=15.
    pub fn tithi_in_paksha(&self) -> u8 {
        (self.tithi.saturating_sub(1)) % 15 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tithi_in_paksha() {
        let waxing = PanchangIndices {
            tithi: 5,
            nakshatra: 1,
            yoga: 1,
        };
        assert_eq!(waxing.tithi_in_paksha(), 5);

        let waning = PanchangIndices {
            tithi: 20,
            nakshatra: 1,
            yoga: 1,
        };
        assert_eq!(waning.tithi_in_paksha(), 5);

        let amavasya = PanchangIndices {
            tithi: 30,
            nakshatra: 1,
            yoga: 1,
        };
        assert_eq!(amavasya.tithi_in_paksha(), 15);
    }
}
