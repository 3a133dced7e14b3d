//! Error types for Mailcast

use thiserror::Error;

/// Main error type for Mailcast
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Transient I/O failure: {0}")]
    Transient(String),

    #[error("Broker unavailable: {0}")]
    BrokerUnavailable(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Ambiguous header: {0}")]
    AmbiguousHeader(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Mailcast
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this failure class is worth retrying.
    ///
    /// Bad credentials and missing folders never recover on their own,
    /// so they abort the enclosing task immediately instead of burning
    /// retry attempts.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}
