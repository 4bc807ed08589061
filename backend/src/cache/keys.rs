//! Cache key construction and per-category TTLs.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of result an entry memoizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    PlanetaryPositions,
    TransitWindows,
    RitualTiming,
    AuspiciousMoments,
}

impl CacheCategory {
    pub const fn segment(self) -> &'static str {
        match self {
            CacheCategory::PlanetaryPositions => "planetary_positions",
            CacheCategory::TransitWindows => "transit_windows",
            CacheCategory::RitualTiming => "ritual_timing",
            CacheCategory::AuspiciousMoments => "auspicious_moments",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Upper bound on any TTL, one century.
const MAX_TTL_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Default time to live per category, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlTable {
    pub planetary_positions: u64,
    pub transit_windows: u64,
    pub ritual_timing: u64,
    pub auspicious_moments: u64,
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            planetary_positions: 60 * 60,
            transit_windows: 2 * 60 * 60,
            ritual_timing: 24 * 60 * 60,
            auspicious_moments: 30 * 60,
        }
    }
}

impl TtlTable {
    pub fn ttl_for(&self, category: CacheCategory) -> Duration {
        let secs = match category {
            CacheCategory::PlanetaryPositions => self.planetary_positions,
            CacheCategory::TransitWindows => self.transit_windows,
            CacheCategory::RitualTiming => self.ritual_timing,
            CacheCategory::AuspiciousMoments => self.auspicious_moments,
        };
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(MAX_TTL_SECS))
    }
}

/// A deterministic composite key: category followed by request parameters.
///
/// Rendered as `namespace:category:part:part...` by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    category: CacheCategory,
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(category: CacheCategory) -> Self {
        Self {
            category,
            parts: Vec::new(),
        }
    }

    pub fn for_date(category: CacheCategory, date: NaiveDate) -> Self {
        Self::new(category).with_part(date.format("%Y-%m-%d"))
    }

    pub fn for_range(category: CacheCategory, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(category)
            .with_part(start.format("%Y-%m-%d"))
            .with_part(end.format("%Y-%m-%d"))
    }

    pub fn with_part(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    pub fn category(&self) -> CacheCategory {
        self.category
    }

    pub fn render(&self, namespace: &str) -> String {
        let mut key = format!("{}:{}", namespace, self.category);
        for part in &self.parts {
            key.push(':');
            key.push_str(part);
        }
        key
    }
}
