//! Time-to-live result cache over an abstract key-value store.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ResultCache (TTL, envelopes, namespaces)     │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  KeyValueStore trait                          │
//! └───────────────────┬──────────────────────────┘
//!          ┌──────────┴──────────┐
//!     LocalStore            FileStore
//!     (in-memory)           (one file per key)
//! ```
//!
//! Entries are JSON [`CacheEntry`] envelopes keyed by [`CacheKey`]. Expiry is
//! checked lazily on read; [`ResultCache::sweep_expired`] removes stale entries
//! proactively.

pub mod checksum;
pub mod clock;
pub mod entry;
pub mod error;
pub mod factory;
pub mod keys;
pub mod result_cache;
pub mod store;
pub mod stores;

pub use checksum::{calculate_checksum, fingerprint};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use error::{ErrorContext, StoreError, StoreResult};
pub use factory::{StoreFactory, StoreType};
pub use keys::{CacheCategory, CacheKey, TtlTable};
pub use result_cache::{ResultCache, DEFAULT_NAMESPACE};
pub use store::KeyValueStore;
pub use stores::{FileStore, LocalStore};
