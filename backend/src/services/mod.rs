//! Service layer for orchestration.
//!
//! Sits between the pure calculations in [`crate::algorithms`] and the callers
//! (HTTP handlers, the server binary, library users). Services own caching and
//! move CPU-bound work off the async runtime.

pub mod engine;

pub use engine::{TransitEngine, MAX_SEARCH_DAYS};
