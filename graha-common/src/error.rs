//! Common error types for GRAHA

use thiserror::Error;

/// Common result type for GRAHA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across GRAHA services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Computation provider failure (critical facts unavailable)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Document rendering error
    #[error("Render error: {0}")]
    Render(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
