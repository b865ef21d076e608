//! Error types for full-text search and keyword suggestion.
//!
//! Errors are split the same way callers need to react to them: invalid requests
//! are reported back to the client verbatim, resource errors come from identity
//! resolution, index errors come from the text index, and internal errors wrap
//! failures raised while post-processing suggestion hits.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all full-text operations.
#[derive(Error, Debug)]
pub enum FulltextError {
    /// The request is malformed (blank argument, bad context, unknown identity).
    #[error("{message}")]
    InvalidRequest { message: String },

    /// Resource state errors raised by an identity resolver.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Errors raised by the text index.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Failure while processing index results.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// The configuration failed validation.
    #[error("invalid configuration: {}", errors.join("; "))]
    InvalidConfig { errors: Vec<String> },
}

impl FulltextError {
    /// Creates an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        FulltextError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        FulltextError::Internal {
            message: message.into(),
        }
    }

    /// Creates a configuration error from `FulltextConfig::validate` output.
    pub fn invalid_config(errors: Vec<String>) -> Self {
        FulltextError::InvalidConfig { errors }
    }

    /// Returns true if this error was caused by the caller's input.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, FulltextError::InvalidRequest { .. })
    }

    /// Returns true if this error is a resource-not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FulltextError::Resource(ResourceError::NotFound { .. }))
    }
}

/// Errors related to resource identity.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No stored resource exists for the logical id.
    #[error("resource not found: {resource_type}/{id}")]
    NotFound { resource_type: String, id: String },
}

/// Errors originating from the text index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index is currently unavailable.
    #[error("text index unavailable: {message}")]
    Unavailable { message: String },

    /// The query references a field the index does not know.
    #[error("unknown index field: {field}")]
    UnknownField { field: String },

    /// The query could not be executed.
    #[error("malformed index query: {message}")]
    MalformedQuery { message: String },
}

/// Result type for full-text operations.
pub type FulltextResult<T> = Result<T, FulltextError>;

/// Result type for text index operations.
pub type IndexResult<T> = Result<T, IndexError>;
