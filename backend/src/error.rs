//! Errors surfaced by the produced API.
//!
//! Cache and store failures never appear here: the cache degrades to a miss
//! and logs instead. What remains are precondition violations, collaborator
//! failures and configuration problems.

use chrono::NaiveDate;

use crate::models::ModelError;
use crate::providers::ProviderError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A structurally invalid chart, position or influence.
    #[error("invalid input: {0}")]
    Model(#[from] ModelError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The ephemeris failed for one day of a scan.
    #[error("position provider failed for {date}: {source}")]
    Provider {
        date: NaiveDate,
        #[source]
        source: ProviderError,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn provider(date: NaiveDate, source: ProviderError) -> Self {
        Self::Provider { date, source }
    }

    /// Whether the caller is at fault (bad chart, bad parameters).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Model(_) | Self::InvalidRequest(_))
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        EngineError::Internal(format!("calculation task failed: {}", err))
    }
}
