use thiserror::Error;

use crate::context::Operation;

/// Convenient result alias for the Acciresque library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Each variant is decided at the failure site: transport, store status,
/// reply shape, absence, or caller input.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be reached, or the call timed out.
    #[error("store unavailable during {operation}: {source}")]
    UpstreamUnavailable {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-success HTTP status.
    #[error("store answered {status} during {operation}")]
    UpstreamStatus { operation: Operation, status: u16 },

    /// The store reply was not JSON or lacked the expected shape.
    #[error("malformed store reply during {operation}: {message}")]
    UpstreamMalformed {
        operation: Operation,
        message: String,
    },

    /// No document exists for the requested accident id.
    #[error("accident {id} not found")]
    NotFound { id: String },

    /// Caller-supplied input failed a structural check.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Building the HTTP client failed.
    #[error("failed to build store client: {0}")]
    Client(#[source] reqwest::Error),

    /// Store configuration could not be used.
    #[error("invalid store configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(operation: Operation, message: impl Into<String>) -> Self {
        Error::UpstreamMalformed {
            operation,
            message: message.into(),
        }
    }

    /// Short, stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UpstreamUnavailable { source, .. } if source.is_timeout() => "timeout",
            Error::UpstreamUnavailable { .. } => "upstream_unavailable",
            Error::UpstreamStatus { .. } => "upstream_status",
            Error::UpstreamMalformed { .. } => "upstream_malformed",
            Error::NotFound { .. } => "not_found",
            Error::Validation { .. } => "validation_error",
            Error::Client(_) => "client",
            Error::InvalidConfig { .. } => "invalid_config",
        }
    }
}
