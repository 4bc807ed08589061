//! Pure calculations: aspect matching, scanning, consolidation and timing windows.
//!
//! Nothing in here touches the cache or the runtime; everything is synchronous
//! and deterministic for a given provider.

pub mod aspects;
pub mod consolidation;
pub mod muhurta;
pub mod scanner;

pub use aspects::{angular_separation, find_aspect, is_significant, is_within_orb, orb_for};
pub use consolidation::{MergeWindow, TransitConsolidator};
pub use muhurta::{Daylight, MuhurtaCalculator};
pub use scanner::{ProviderFailurePolicy, SignificanceScanner};
