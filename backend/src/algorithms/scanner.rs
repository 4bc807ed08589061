//! Day-by-day significance scanning against a natal chart.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::aspects::{exactness, find_aspect};
use crate::error::{EngineError, EngineResult};
use crate::models::time::days_inclusive;
use crate::models::{
    AuspiciousFlags, BirthChart, PanchangIndices, PlanetaryPosition, ScanObservation,
    TransitObservation,
};
use crate::providers::{PanchangCalculator, PositionProvider, ProviderError};
use crate::rules::{transit_weight, RuleTables};

/// What to do when an ephemeris collaborator fails for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderFailurePolicy {
    /// Stop the scan and return the error.
    #[default]
    Abort,
    /// Log the failure and carry on with the next day.
    SkipDay,
}

pub struct SignificanceScanner<'a> {
    provider: &'a dyn PositionProvider,
    panchang: &'a dyn PanchangCalculator,
    rules: &'a RuleTables,
    failure_policy: ProviderFailurePolicy,
}

impl<'a> SignificanceScanner<'a> {
    pub fn new(
        provider: &'a dyn PositionProvider,
        panchang: &'a dyn PanchangCalculator,
        rules: &'a RuleTables,
    ) -> Self {
        Self {
            provider,
            panchang,
            rules,
            failure_policy: ProviderFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: ProviderFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Scan `[start, end]` inclusive and return one observation per significant day,
    /// in ascending date order. `start > end` yields an empty result.
    pub fn scan(
        &self,
        chart: &BirthChart,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<ScanObservation>> {
        let mut observations = Vec::new();

        for date in days_inclusive(start, end) {
            match self.evaluate_day(chart, date) {
                Ok(Some(observation)) => observations.push(observation),
                Ok(None) => {}
                Err(e) => match self.failure_policy {
                    ProviderFailurePolicy::Abort => return Err(EngineError::provider(date, e)),
                    ProviderFailurePolicy::SkipDay => {
                        warn!("Skipping {} after ephemeris failure: {}", date, e);
                    }
                },
            }
        }

        debug!(
            "Scanned {}..={}: {} significant day(s)",
            start,
            end,
            observations.len()
        );
        Ok(observations)
    }

    /// Evaluate a single day; `None` when nothing about it is significant.
    pub fn evaluate_day(
        &self,
        chart: &BirthChart,
        date: NaiveDate,
    ) -> Result<Option<ScanObservation>, ProviderError> {
        let positions = self.provider.positions_at(date)?;
        let panchang = self.panchang.panchang_for(date, &positions)?;

        let auspicious = self.auspicious_flags(&panchang);
        let transits = transits_for_day(chart, date, &positions);

        if !auspicious.any() && transits.is_empty() {
            return Ok(None);
        }

        Ok(Some(ScanObservation {
            date,
            panchang,
            auspicious,
            transits,
        }))
    }

    fn auspicious_flags(&self, panchang: &PanchangIndices) -> AuspiciousFlags {
        AuspiciousFlags {
            tithi: self.rules.is_auspicious_tithi(panchang),
            nakshatra: self.rules.is_auspicious_nakshatra(panchang),
            yoga: self.rules.is_auspicious_yoga(panchang),
        }
    }
}

/// Every transiting body that aspects at least one natal body on `date`.
pub fn transits_for_day(
    chart: &BirthChart,
    date: NaiveDate,
    positions: &[PlanetaryPosition],
) -> Vec<TransitObservation> {
    positions
        .iter()
        .filter_map(|transit| {
            let aspects: Vec<_> = chart
                .positions()
                .iter()
                .filter_map(|natal| {
                    find_aspect(transit.body, transit.longitude, natal.body, natal.longitude)
                })
                .collect();

            if aspects.is_empty() {
                return None;
            }

            let best = aspects.iter().map(exactness).fold(0.0, f64::max);
            let significance = (transit_weight(transit.body) * (0.5 + 0.5 * best)).clamp(0.0, 1.0);

            Some(TransitObservation {
                body: transit.body,
                date,
                longitude: transit.longitude,
                house: chart.house_of(transit.longitude),
                aspects,
                significance,
            })
        })
        .collect()
}
