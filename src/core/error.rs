//! Error types for core module
//!
//! Provides custom error types for the persisted client state and the
//! client configuration.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum StoreError {
    /// Session file I/O error
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file serialization/deserialization error
    #[error("Session store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while assembling [`crate::core::config::ClientConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid collaborator endpoint {endpoint:?}: {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Endpoint {0} cannot carry a path")]
    EndpointNotBase(String),

    #[error("HTTP client initialization failed: {message}")]
    HttpClient { message: String },
}

/// Result type alias for session store operations
pub type StoreResult<T> = Result<T, StoreError>;
