//! Folding per-day transit observations into contiguous periods.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Aspect, BodyId, TransitObservation, TransitPeriod};
use crate::rules::transit_effect;

/// How far past the end of a period a new observation may fall and still extend it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeWindow {
    pub default_days: u32,
    /// Per-body overrides, e.g. a wider window for slow movers.
    pub per_body: BTreeMap<BodyId, u32>,
}

impl Default for MergeWindow {
    fn default() -> Self {
        Self {
            default_days: 1,
            per_body: BTreeMap::new(),
        }
    }
}

impl MergeWindow {
    pub fn days_for(&self, body: BodyId) -> i64 {
        i64::from(*self.per_body.get(&body).unwrap_or(&self.default_days))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransitConsolidator {
    window: MergeWindow,
}

/// A period under construction plus the tick it was last touched at.
struct OpenPeriod {
    period: TransitPeriod,
    touched: u64,
}

impl TransitConsolidator {
    pub fn new(window: MergeWindow) -> Self {
        Self { window }
    }

    /// Consolidate observations into periods, ordered by first occurrence.
    ///
    /// Observations are processed in date order (stable for equal dates). An
    /// observation of body B on day D extends the most recently updated period
    /// of B with `start <= D` and `D - end <= window(B)`; otherwise it opens a
    /// new period. Periods only ever grow.
    pub fn consolidate<I>(&self, observations: I) -> Vec<TransitPeriod>
    where
        I: IntoIterator<Item = TransitObservation>,
    {
        let mut observations: Vec<_> = observations.into_iter().collect();
        observations.sort_by_key(|o| o.date);
        let count = observations.len();

        let periods = self.fold(observations.into_iter().map(|o| {
            let house = o.house;
            TransitPeriod {
                body: o.body,
                house,
                start_date: o.date,
                end_date: o.date,
                effect_summary: effect_summary(o.body, house),
                aspects: o.aspects,
                significance: o.significance,
            }
        }));

        debug!(
            "Consolidated {} observation(s) into {} period(s)",
            count,
            periods.len()
        );
        periods
    }

    /// Apply the same merge rule to periods that are already built.
    ///
    /// Feeding the output of [`consolidate`](Self::consolidate) back in returns it unchanged.
    pub fn merge_periods<I>(&self, periods: I) -> Vec<TransitPeriod>
    where
        I: IntoIterator<Item = TransitPeriod>,
    {
        let mut periods: Vec<_> = periods.into_iter().collect();
        periods.sort_by_key(|p| p.start_date);
        self.fold(periods.into_iter())
    }

    fn fold(&self, incoming: impl Iterator<Item = TransitPeriod>) -> Vec<TransitPeriod> {
        let mut open: Vec<OpenPeriod> = Vec::new();

        for (tick, candidate) in (1u64..).zip(incoming) {
            match self.find_target(&open, candidate.body, candidate.start_date) {
                Some(idx) => {
                    let target = &mut open[idx];
                    absorb(&mut target.period, candidate);
                    target.touched = tick;
                }
                None => open.push(OpenPeriod {
                    period: candidate,
                    touched: tick,
                }),
            }
        }

        open.into_iter().map(|o| o.period).collect()
    }

    fn find_target(&self, open: &[OpenPeriod], body: BodyId, date: NaiveDate) -> Option<usize> {
        let window = self.window.days_for(body);
        open.iter()
            .enumerate()
            .filter(|(_, o)| {
                o.period.body == body
                    && o.period.start_date <= date
                    && (date - o.period.end_date).num_days() <= window
            })
            .max_by_key(|(_, o)| o.touched)
            .map(|(idx, _)| idx)
    }
}

fn absorb(period: &mut TransitPeriod, other: TransitPeriod) {
    period.end_date = period.end_date.max(other.end_date);
    period.significance = period.significance.max(other.significance);
    for aspect in other.aspects {
        push_unique(&mut period.aspects, aspect);
    }
}

fn push_unique(aspects: &mut Vec<Aspect>, aspect: Aspect) {
    if !aspects.iter().any(|a| a.same_relationship(&aspect)) {
        aspects.push(aspect);
    }
}

pub fn effect_summary(body: BodyId, house: u8) -> String {
    format!("{} transiting house {}: {}", body, house, transit_effect(body))
}
