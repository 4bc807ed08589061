//! # Transit Engine
//!
//! Astronomical transit analysis with a time-to-live result cache.
//!
//! Given a natal chart and a date range, the engine walks the range day by day,
//! matches transiting bodies against the chart with orb-based aspects, folds
//! the hits into contiguous [`TransitPeriod`](models::TransitPeriod)s and
//! memoizes the result. It also scores the daylight segments of a day for an
//! undertaking and validates proposed instants against those scores.
//!
//! ## Architecture
//!
//! - [`models`]: validated domain types (bodies, positions, charts, aspects, periods, timing)
//! - [`rules`]: replaceable rule tables (auspicious index sets, effects, weights)
//! - [`providers`]: ephemeris collaborators behind traits, plus a mean-motion implementation
//! - [`algorithms`]: aspect matching, scanning, consolidation, timing windows
//! - [`cache`]: TTL cache over an abstract key-value store
//! - [`services`]: the [`TransitEngine`](services::TransitEngine) tying it together
//! - [`config`]: TOML configuration
//! - [`http`]: axum REST API (feature `http-server`)

pub mod algorithms;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod rules;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use services::TransitEngine;
