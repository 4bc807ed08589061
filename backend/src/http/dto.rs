//! Data Transfer Objects for the HTTP API.
//!
//! Domain types (charts, periods, windows) already derive Serialize and
//! Deserialize and are embedded as-is; these types only add the request and
//! response envelopes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    BirthChart, PanchangIndices, PlanetaryInfluence, PlanetaryPosition, Purpose,
    TimingRequirements, TimingWindow, TransitPeriod,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "connected" or "unavailable"; an unavailable cache degrades to recomputation.
    pub cache: String,
}

/// Request body for POST /v1/transits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitRequest {
    pub chart: BirthChart,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitResponse {
    pub periods: Vec<TransitPeriod>,
    pub total: usize,
}

/// Request body for POST /v1/timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingRequest {
    pub date: NaiveDate,
    /// Free-form purpose; unknown values fall back to general rules.
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub influences: Vec<PlanetaryInfluence>,
}

impl TimingRequest {
    pub fn purpose(&self) -> Purpose {
        self.purpose
            .as_deref()
            .map(Purpose::parse_lenient)
            .unwrap_or(Purpose::General)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingResponse {
    pub date: NaiveDate,
    pub purpose: Purpose,
    pub windows: Vec<TimingWindow>,
}

/// Request body for POST /v1/timing/validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTimingRequest {
    pub proposed_time: DateTime<Utc>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub avoid_rahu_kaal: Option<bool>,
    #[serde(default)]
    pub search_days: Option<u32>,
    #[serde(default)]
    pub influences: Vec<PlanetaryInfluence>,
}

impl ValidateTimingRequest {
    pub fn requirements(&self) -> TimingRequirements {
        let purpose = self
            .purpose
            .as_deref()
            .map(Purpose::parse_lenient)
            .unwrap_or(Purpose::General);
        let mut requirements = TimingRequirements::for_purpose(purpose);
        if let Some(min_score) = self.min_score {
            requirements.min_score = min_score;
        }
        if let Some(avoid) = self.avoid_rahu_kaal {
            requirements.avoid_rahu_kaal = avoid;
        }
        requirements.search_days = self.search_days;
        requirements.influences = self.influences.clone();
        requirements
    }
}

/// Response for GET /v1/positions/{date}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    pub date: NaiveDate,
    pub positions: Vec<PlanetaryPosition>,
    pub panchang: PanchangIndices,
}

/// Response for cache maintenance endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMaintenanceResponse {
    pub removed: usize,
}
