//! The produced API: transit periods, auspicious timing and timing validation.

use chrono::{DateTime, Days, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::algorithms::{MuhurtaCalculator, SignificanceScanner, TransitConsolidator};
use crate::cache::{fingerprint, CacheCategory, CacheKey, ResultCache, StoreFactory};
use crate::config::{EngineConfig, ScanSettings, TimingSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BirthChart, PanchangIndices, PlanetaryInfluence, PlanetaryPosition, Purpose,
    TimingRequirements, TimingValidation, TimingWindow, TransitPeriod, WindowQuality,
};
use crate::providers::{
    LuniSolarPanchang, MeanMotionEphemeris, PanchangCalculator, PositionProvider,
};
use crate::rules::RuleTables;

/// Longest look-ahead `validate_timing` accepts.
pub const MAX_SEARCH_DAYS: u32 = 366;

/// Orchestrates the calculations and memoizes their results.
///
/// Cheap to clone; clones share the providers and the cache.
#[derive(Clone)]
pub struct TransitEngine {
    provider: Arc<dyn PositionProvider>,
    panchang: Arc<dyn PanchangCalculator>,
    cache: ResultCache,
    rules: Arc<RuleTables>,
    scan: ScanSettings,
    timing: TimingSettings,
}

impl TransitEngine {
    pub fn new(
        provider: Arc<dyn PositionProvider>,
        panchang: Arc<dyn PanchangCalculator>,
        cache: ResultCache,
    ) -> Self {
        Self {
            provider,
            panchang,
            cache,
            rules: Arc::new(RuleTables::default()),
            scan: ScanSettings::default(),
            timing: TimingSettings::default(),
        }
    }

    /// Build the engine a configuration describes: its store, cache settings,
    /// the mean-motion ephemeris in the configured zodiac and the luni-solar panchang.
    pub async fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let store = StoreFactory::create(&config.store)
            .await
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        let cache = ResultCache::new(store)
            .with_namespace(config.store.namespace.clone())
            .with_ttl_table(config.cache.ttl);

        Ok(Self::new(
            Arc::new(MeanMotionEphemeris::new(config.scan.zodiac)),
            Arc::new(LuniSolarPanchang),
            cache,
        )
        .with_rules(config.rules.clone())
        .with_scan_settings(config.scan.clone())
        .with_timing_settings(config.timing.clone()))
    }

    pub fn with_rules(mut self, rules: RuleTables) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn with_scan_settings(mut self, scan: ScanSettings) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_timing_settings(mut self, timing: TimingSettings) -> Self {
        self.timing = timing;
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    // ==================== Positions & Panchang ====================

    /// Body positions for `date`, cached under planetary positions.
    pub async fn positions_at(&self, date: NaiveDate) -> EngineResult<Vec<PlanetaryPosition>> {
        let key = CacheKey::for_date(CacheCategory::PlanetaryPositions, date);
        if let Some(positions) = self.cache.get(&key).await {
            return Ok(positions);
        }

        let positions = self
            .provider
            .positions_at(date)
            .map_err(|e| EngineError::provider(date, e))?;
        self.cache.set(&key, &positions, None).await;
        Ok(positions)
    }

    /// Calendar indices for `date`, cached under ritual timing.
    pub async fn panchang_for(&self, date: NaiveDate) -> EngineResult<PanchangIndices> {
        let key = CacheKey::for_date(CacheCategory::RitualTiming, date);
        if let Some(indices) = self.cache.get(&key).await {
            return Ok(indices);
        }

        let positions = self.positions_at(date).await?;
        let indices = self
            .panchang
            .panchang_for(date, &positions)
            .map_err(|e| EngineError::provider(date, e))?;
        self.cache.set(&key, &indices, None).await;
        Ok(indices)
    }

    // ==================== Transits ====================

    /// Consolidated transit periods of `chart` over `[start, end]`.
    ///
    /// `start > end` yields no periods. Results are cached per chart
    /// fingerprint and range.
    pub async fn calculate_transit_periods(
        &self,
        chart: &BirthChart,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<TransitPeriod>> {
        if start > end {
            debug!("Empty transit range {}..={}", start, end);
            return Ok(Vec::new());
        }

        info!(
            "Service layer: calculating transit periods for {}..={}",
            start, end
        );

        let key = cache_key(
            CacheKey::for_range(CacheCategory::TransitWindows, start, end),
            chart,
        );
        if let Some(key) = &key {
            if let Some(periods) = self.cache.get(key).await {
                return Ok(periods);
            }
        }

        let provider = Arc::clone(&self.provider);
        let panchang = Arc::clone(&self.panchang);
        let rules = Arc::clone(&self.rules);
        let policy = self.scan.on_provider_failure;
        let consolidator = TransitConsolidator::new(self.scan.merge_window());
        let chart = chart.clone();

        let periods = tokio::task::spawn_blocking(move || -> EngineResult<Vec<TransitPeriod>> {
            let scanner = SignificanceScanner::new(provider.as_ref(), panchang.as_ref(), &rules)
                .with_failure_policy(policy);
            let observations = scanner.scan(&chart, start, end)?;
            Ok(consolidator.consolidate(
                observations
                    .into_iter()
                    .flat_map(|observation| observation.into_transits()),
            ))
        })
        .await??;

        info!("Service layer: found {} transit period(s)", periods.len());

        if let Some(key) = &key {
            self.cache.set(key, &periods, None).await;
        }
        Ok(periods)
    }

    // ==================== Timing ====================

    /// Scored daylight windows of `date` for `purpose`, in chronological order.
    pub async fn calculate_auspicious_timing(
        &self,
        date: NaiveDate,
        purpose: Purpose,
        influences: &[PlanetaryInfluence],
    ) -> EngineResult<Vec<TimingWindow>> {
        let key = cache_key(
            CacheKey::for_date(CacheCategory::AuspiciousMoments, date).with_part(purpose),
            influences,
        );
        if let Some(key) = &key {
            if let Some(windows) = self.cache.get(key).await {
                return Ok(windows);
            }
        }

        let panchang = self.panchang_for(date).await?;
        let windows = MuhurtaCalculator::new(&self.rules, self.timing.daylight())
            .windows_for(date, purpose, &panchang, influences);

        if let Some(key) = &key {
            self.cache.set(key, &windows, None).await;
        }
        Ok(windows)
    }

    /// Whether `proposed` satisfies `requirements`, and if not, the next time that does.
    pub async fn validate_timing(
        &self,
        proposed: DateTime<Utc>,
        requirements: &TimingRequirements,
    ) -> EngineResult<TimingValidation> {
        if !(0.0..=1.0).contains(&requirements.min_score) {
            return Err(EngineError::InvalidRequest(format!(
                "min_score must be within [0, 1], got {}",
                requirements.min_score
            )));
        }
        let search_days = requirements.search_days.unwrap_or(self.timing.search_days);
        if search_days > MAX_SEARCH_DAYS {
            return Err(EngineError::InvalidRequest(format!(
                "search_days must be at most {}, got {}",
                MAX_SEARCH_DAYS, search_days
            )));
        }

        info!(
            "Service layer: validating {} for {}",
            proposed, requirements.purpose
        );

        let date = proposed.date_naive();
        let windows = self
            .calculate_auspicious_timing(date, requirements.purpose, &requirements.influences)
            .await?;

        let mut reasons = Vec::new();
        match windows.iter().find(|w| w.contains(proposed)) {
            Some(window) => {
                reasons.extend(window.reasons.iter().cloned());
                let verdict = judge(window, requirements);
                reasons.push(verdict.reason);
                if verdict.qualifies {
                    return Ok(TimingValidation {
                        is_auspicious: true,
                        reasons,
                        next_auspicious_time: None,
                    });
                }
            }
            None => reasons.push("Outside the daylight windows".to_string()),
        }

        let next = self
            .next_qualifying_start(proposed, &windows, requirements, search_days)
            .await?;
        match next {
            Some(start) => reasons.push(format!("Next qualifying window starts at {}", start)),
            None => reasons.push(format!(
                "No qualifying window in the next {} day(s)",
                search_days
            )),
        }

        Ok(TimingValidation {
            is_auspicious: false,
            reasons,
            next_auspicious_time: next,
        })
    }

    /// First qualifying window starting after `proposed`, looking `search_days` days ahead.
    async fn next_qualifying_start(
        &self,
        proposed: DateTime<Utc>,
        same_day: &[TimingWindow],
        requirements: &TimingRequirements,
        search_days: u32,
    ) -> EngineResult<Option<DateTime<Utc>>> {
        let qualifying_after = |windows: &[TimingWindow]| {
            windows
                .iter()
                .find(|w| w.start > proposed && judge(w, requirements).qualifies)
                .map(|w| w.start)
        };

        if let Some(start) = qualifying_after(same_day) {
            return Ok(Some(start));
        }

        let today = proposed.date_naive();
        for offset in 1..=u64::from(search_days) {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                warn!("Timing search ran past the calendar at {}", today);
                break;
            };
            let windows = self
                .calculate_auspicious_timing(date, requirements.purpose, &requirements.influences)
                .await?;
            if let Some(start) = qualifying_after(&windows) {
                return Ok(Some(start));
            }
        }
        Ok(None)
    }
}

struct Verdict {
    qualifies: bool,
    reason: String,
}

fn judge(window: &TimingWindow, requirements: &TimingRequirements) -> Verdict {
    if requirements.avoid_rahu_kaal && window.quality == WindowQuality::Avoid {
        return Verdict {
            qualifies: false,
            reason: "Falls within Rahu Kaal".to_string(),
        };
    }
    if window.score >= requirements.min_score {
        Verdict {
            qualifies: true,
            reason: format!(
                "Score {:.2} meets the minimum of {:.2}",
                window.score, requirements.min_score
            ),
        }
    } else {
        Verdict {
            qualifies: false,
            reason: format!(
                "Score {:.2} is below the minimum of {:.2}",
                window.score, requirements.min_score
            ),
        }
    }
}

/// `key` extended with a fingerprint of `input`, or `None` (skip caching) if it cannot be hashed.
fn cache_key<T: Serialize + ?Sized>(key: CacheKey, input: &T) -> Option<CacheKey> {
    match fingerprint(input) {
        Ok(digest) => Some(key.with_part(digest)),
        Err(e) => {
            warn!("Not caching: failed to fingerprint request: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{KeyValueStore, LocalStore};
    use crate::models::BodyId;
    use chrono::TimeZone;

    fn engine() -> (LocalStore, TransitEngine) {
        let store = LocalStore::new();
        let engine = TransitEngine::new(
            Arc::new(MeanMotionEphemeris::tropical()),
            Arc::new(LuniSolarPanchang),
            ResultCache::new(Arc::new(store.clone())),
        );
        (store, engine)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_reversed_range_is_empty_and_uncached() {
        let (store, engine) = engine();
        let chart =
            BirthChart::new(vec![PlanetaryPosition::new(BodyId::Sun, 10.0).unwrap()]).unwrap();
        let periods = engine
            .calculate_transit_periods(&chart, date(2024, 2, 1), date(2024, 1, 1))
            .await
            .unwrap();
        assert!(periods.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_positions_are_cached() {
        let (store, engine) = engine();
        let first = engine.positions_at(date(2024, 1, 1)).await.unwrap();
        assert_eq!(store.len(), 1);
        let second = engine.positions_at(date(2024, 1, 1)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_timing_windows_are_cached_per_purpose() {
        let (store, engine) = engine();
        let d = date(2024, 6, 3);
        engine
            .calculate_auspicious_timing(d, Purpose::Travel, &[])
            .await
            .unwrap();
        engine
            .calculate_auspicious_timing(d, Purpose::Business, &[])
            .await
            .unwrap();
        let keys = store.list_keys().await.unwrap();
        assert_eq!(
            keys.iter()
                .filter(|k| k.contains("auspicious_moments"))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_invalid_requirements_are_rejected() {
        let (_, engine) = engine();
        let proposed = Utc.with_ymd_and_hms(2024, 6, 3, 12, 30, 0).unwrap();
        let mut req = TimingRequirements::for_purpose(Purpose::General);
        req.min_score = 1.5;
        let err = engine.validate_timing(proposed, &req).await.unwrap_err();
        assert!(err.is_client_error());

        let mut req = TimingRequirements::for_purpose(Purpose::General);
        req.search_days = Some(MAX_SEARCH_DAYS + 1);
        assert!(engine.validate_timing(proposed, &req).await.is_err());
    }

    #[test]
    fn test_judge_prefers_rahu_kaal_over_score() {
        let window = TimingWindow {
            start: Utc.with_ymd_and_hms(2024, 6, 3, 7, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
            quality: WindowQuality::Avoid,
            score: 0.2,
            reasons: vec![],
        };
        let mut req = TimingRequirements::for_purpose(Purpose::General);
        req.min_score = 0.1;
        assert!(!judge(&window, &req).qualifies);
        req.avoid_rahu_kaal = false;
        assert!(judge(&window, &req).qualifies);
    }
}
