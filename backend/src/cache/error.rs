//! Error types for key-value store operations.
//!
//! Store errors never escape the [`ResultCache`](super::ResultCache): it logs
//! them and degrades to a miss. They carry structured context so those log
//! lines say which operation failed on which key.

use std::fmt;

pub type StoreResult<T> = Result<T, StoreError>;

/// Where and why a store operation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g. "read", "list_keys")
    pub operation: Option<String>,
    pub key: Option<String>,
    pub details: Option<String>,
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref key) = self.key {
            parts.push(format!("key={}", key));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached. Usually transient.
    #[error("Store unavailable: {message} {context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {message} {context}")]
    Io {
        message: String,
        context: ErrorContext,
    },

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {message} {context}")]
    Serialization {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

}

impl StoreError {
    pub fn unavailable_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Unavailable {
            message: message.into(),
            context: context.retryable(),
        }
    }

    pub fn io_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Io {
            message: message.into(),
            context,
        }
    }

    pub fn serialization_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Serialization {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Unavailable { context, .. }
            | Self::Io { context, .. }
            | Self::Serialization { context, .. }
            | Self::Configuration { context, .. } => context,
        }
    }

    /// Add or update the key in the error context.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        match &mut self {
            Self::Unavailable { context, .. }
            | Self::Io { context, .. }
            | Self::Serialization { context, .. }
            | Self::Configuration { context, .. } => {
                context.key = Some(key.into());
            }
        }
        self
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        let context = ErrorContext::default().with_details(format!("kind={:?}", err.kind()));
        // Interrupted and timed-out calls are worth another attempt
        let context = if matches!(
            err.kind(),
            std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut
        ) {
            context.retryable()
        } else {
            context
        };
        StoreError::Io {
            message: err.to_string(),
            context,
        }
    }
}
