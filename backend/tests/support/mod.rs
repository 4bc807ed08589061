#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use transit_engine::cache::{LocalStore, ResultCache};
use transit_engine::models::{BodyId, PanchangIndices, PlanetaryPosition};
use transit_engine::providers::{
    LuniSolarPanchang, MeanMotionEphemeris, PanchangCalculator, PositionProvider, ProviderError,
};
use transit_engine::TransitEngine;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars so tests running in parallel do not see each other's changes.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn pos(body: BodyId, longitude: f64) -> PlanetaryPosition {
    PlanetaryPosition::new(body, longitude).unwrap()
}

/// Returns scripted positions for chosen dates and a fallback everywhere else.
/// Dates listed in `failing` make the provider error out.
pub struct ScriptedProvider {
    pub by_date: HashMap<NaiveDate, Vec<PlanetaryPosition>>,
    pub fallback: Vec<PlanetaryPosition>,
    pub failing: HashSet<NaiveDate>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(fallback: Vec<PlanetaryPosition>) -> Self {
        Self {
            by_date: HashMap::new(),
            fallback,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn on(mut self, date: NaiveDate, positions: Vec<PlanetaryPosition>) -> Self {
        self.by_date.insert(date, positions);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PositionProvider for ScriptedProvider {
    fn positions_at(&self, date: NaiveDate) -> Result<Vec<PlanetaryPosition>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&date) {
            return Err(ProviderError::Unavailable(format!("scripted failure on {}", date)));
        }
        Ok(self
            .by_date
            .get(&date)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// A panchang whose indices are never in the default auspicious sets.
pub struct QuietPanchang;

impl PanchangCalculator for QuietPanchang {
    fn panchang_for(
        &self,
        _date: NaiveDate,
        _positions: &[PlanetaryPosition],
    ) -> Result<PanchangIndices, ProviderError> {
        Ok(PanchangIndices {
            tithi: 15,
            nakshatra: 2,
            yoga: 1,
        })
    }
}

/// Engine over a scripted provider and the quiet panchang, caching in `store`.
pub fn scripted_engine(provider: Arc<ScriptedProvider>, store: LocalStore) -> TransitEngine {
    TransitEngine::new(
        provider,
        Arc::new(QuietPanchang),
        ResultCache::new(Arc::new(store)),
    )
}

/// Engine over the built-in mean-motion ephemeris and luni-solar panchang.
pub fn ephemeris_engine(store: LocalStore) -> TransitEngine {
    TransitEngine::new(
        Arc::new(MeanMotionEphemeris::tropical()),
        Arc::new(LuniSolarPanchang),
        ResultCache::new(Arc::new(store)),
    )
}
