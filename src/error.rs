//! # Error Types
//!
//! Structured error handling for the PGMQ client using thiserror.
//!
//! Every operation that reaches the database funnels failures through
//! [`PgmqError::Operation`], which names the operation and the queue or message
//! involved and keeps the original error reachable through
//! [`std::error::Error::source`].

use thiserror::Error;

/// Boxed cause carried by [`PgmqError::Operation`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for PGMQ client operations
pub type Result<T> = std::result::Result<T, PgmqError>;

/// Errors returned by the PGMQ client
#[derive(Error, Debug)]
pub enum PgmqError {
    /// No usable connection source was available when a command was provisioned
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The caller supplied arguments that can never be valid
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// A server-reachable operation failed
    #[error("{description}")]
    Operation {
        description: String,
        #[source]
        source: BoxError,
    },

    /// The server broke a result-shape contract the client relies on
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// The server returned a value of an unexpected type
    #[error("Unexpected result: {description}")]
    UnexpectedResult { description: String },

    /// Payload could not be encoded to or decoded from JSON text
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PgmqError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Wrap an underlying failure with a description of the operation
    pub fn operation(description: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Operation {
            description: description.into(),
            source: source.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an unexpected result error
    pub fn unexpected_result(description: impl Into<String>) -> Self {
        Self::UnexpectedResult {
            description: description.into(),
        }
    }

    /// Whether the error originated from the database driver
    pub fn is_database_error(&self) -> bool {
        match self {
            Self::Operation { source, .. } => source.downcast_ref::<sqlx::Error>().is_some(),
            _ => false,
        }
    }
}
