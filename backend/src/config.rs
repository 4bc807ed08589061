//! Engine configuration file support.
//!
//! Everything has a default, so an empty file (or no file at all) yields a
//! working in-memory setup. Example `transit.toml`:
//!
//! ```toml
//! [store]
//! type = "file"
//! path = "/var/cache/transit"
//!
//! [cache]
//! sweep_interval_secs = 300
//!
//! [cache.ttl]
//! transit_windows = 7200
//!
//! [scan]
//! on_provider_failure = "skip-day"
//! merge_window_days = 1
//!
//! [scan.merge_window_overrides]
//! saturn = 3
//!
//! [timing]
//! sunrise_hour = 6.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::algorithms::{Daylight, MergeWindow, ProviderFailurePolicy};
use crate::cache::{StoreType, TtlTable, DEFAULT_NAMESPACE};
use crate::error::EngineError;
use crate::models::BodyId;
use crate::providers::Zodiac;
use crate::rules::RuleTables;

pub const CONFIG_PATH_VAR: &str = "TRANSIT_CONFIG";
pub const STORE_TYPE_VAR: &str = "TRANSIT_STORE";
pub const STORE_PATH_VAR: &str = "TRANSIT_STORE_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub rules: RuleTables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(rename = "type", default = "default_store_type")]
    pub kind: String,
    /// Directory for the file store.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Prefix of every cache key; sweeps and clears stay inside it.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_store_type() -> String {
    "memory".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: default_store_type(),
            path: None,
            namespace: default_namespace(),
        }
    }
}

impl StoreSettings {
    pub fn store_type(&self) -> Result<StoreType, String> {
        StoreType::from_str(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// How often the server sweeps expired entries; 0 disables the sweeper.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    #[serde(default)]
    pub ttl: TtlTable,
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            ttl: TtlTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default)]
    pub on_provider_failure: ProviderFailurePolicy,
    #[serde(default = "default_merge_window_days")]
    pub merge_window_days: u32,
    #[serde(default)]
    pub merge_window_overrides: BTreeMap<BodyId, u32>,
    #[serde(default)]
    pub zodiac: Zodiac,
}

fn default_merge_window_days() -> u32 {
    1
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            on_provider_failure: ProviderFailurePolicy::default(),
            merge_window_days: default_merge_window_days(),
            merge_window_overrides: BTreeMap::new(),
            zodiac: Zodiac::default(),
        }
    }
}

impl ScanSettings {
    pub fn merge_window(&self) -> MergeWindow {
        MergeWindow {
            default_days: self.merge_window_days,
            per_body: self.merge_window_overrides.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Start of daylight, hours after 00:00 UTC.
    #[serde(default = "default_sunrise_hour")]
    pub sunrise_hour: f64,
    #[serde(default = "default_daylight_hours")]
    pub daylight_hours: f64,
    /// Days `validate_timing` searches ahead when the request does not say.
    #[serde(default = "default_search_days")]
    pub search_days: u32,
}

fn default_sunrise_hour() -> f64 {
    6.0
}

fn default_daylight_hours() -> f64 {
    12.0
}

fn default_search_days() -> u32 {
    7
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            sunrise_hour: default_sunrise_hour(),
            daylight_hours: default_daylight_hours(),
            search_days: default_search_days(),
        }
    }
}

impl TimingSettings {
    pub fn daylight(&self) -> Daylight {
        Daylight {
            sunrise_hour: self.sunrise_hour,
            daylight_hours: self.daylight_hours,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if the file was read, parsed and validated
    /// * `Err(EngineError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| {
            EngineError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `transit.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(Some(config))` for the first file found
    /// * `Ok(None)` when there is no file
    /// * `Err` when a file exists but is invalid
    pub fn from_default_location() -> Result<Option<Self>, EngineError> {
        let search_paths = [
            PathBuf::from("transit.toml"),
            PathBuf::from("backend/transit.toml"),
            PathBuf::from("../transit.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve the configuration for a process.
    ///
    /// `TRANSIT_CONFIG` names the file explicitly; otherwise the default
    /// locations are searched and built-in defaults used when nothing is found.
    /// `TRANSIT_STORE` and `TRANSIT_STORE_PATH` then override the store section.
    pub fn from_env() -> Result<Self, EngineError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), EngineError> {
        if let Ok(kind) = std::env::var(STORE_TYPE_VAR) {
            self.store.kind = kind;
        }
        if let Ok(path) = std::env::var(STORE_PATH_VAR) {
            self.store.path = Some(PathBuf::from(path));
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.store
            .store_type()
            .map_err(|e| EngineError::Configuration(format!("Invalid store type: {}", e)))?;

        if self.store.namespace.is_empty() || self.store.namespace.contains(':') {
            return Err(EngineError::Configuration(format!(
                "store.namespace must be non-empty and free of ':' (got '{}')",
                self.store.namespace
            )));
        }

        let t = &self.timing;
        if !(0.0..24.0).contains(&t.sunrise_hour) {
            return Err(EngineError::Configuration(format!(
                "timing.sunrise_hour must be in [0, 24) (got {})",
                t.sunrise_hour
            )));
        }
        if !(t.daylight_hours > 0.0 && t.sunrise_hour + t.daylight_hours <= 24.0) {
            return Err(EngineError::Configuration(format!(
                "timing.daylight_hours must be positive and end within the day (got {})",
                t.daylight_hours
            )));
        }

        Ok(())
    }
}
