//! Resource system error types.

use std::io;
use thiserror::Error;

/// Resource system error type.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No mount matches the path, or the target is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Path is malformed or escapes its root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Operation is not implemented by the backend.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Payload kind cannot be written by the backend.
    #[error("unsupported payload type: {0}")]
    UnsupportedType(String),

    /// Operation attempted on a disposed provider.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A mount is already registered at this prefix.
    #[error("already mounted: {0}")]
    Conflict(String),

    /// Delegating mounts nested deeper than the configured bound.
    #[error("delegation depth {depth} exceeded while resolving {path}")]
    Cycle { path: String, depth: usize },

    /// Underlying storage error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Mount configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl ResourceError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Create an Unsupported error.
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported(what.into())
    }

    /// Create an UnsupportedType error.
    pub fn unsupported_type(kind: impl Into<String>) -> Self {
        Self::UnsupportedType(kind.into())
    }

    /// Create an InvalidState error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a Conflict error.
    pub fn conflict(prefix: impl Into<String>) -> Self {
        Self::Conflict(prefix.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for a routing-level miss and for a backend `NotFound` I/O failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Convert ResourceError to std::io::Error for callers working in io terms.
impl From<ResourceError> for io::Error {
    fn from(e: ResourceError) -> Self {
        match e {
            ResourceError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            ResourceError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            ResourceError::Unsupported(msg) => io::Error::new(io::ErrorKind::Unsupported, msg),
            ResourceError::UnsupportedType(msg) => {
                io::Error::new(io::ErrorKind::InvalidData, msg)
            }
            ResourceError::Conflict(msg) => io::Error::new(io::ErrorKind::AlreadyExists, msg),
            ResourceError::Io(e) => e,
            other => io::Error::other(other.to_string()),
        }
    }
}

/// Resource system result type.
pub type ResourceResult<T> = Result<T, ResourceError>;
