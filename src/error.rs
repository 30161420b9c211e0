//! Error types for the pawhaven data layer
//!
//! All errors use thiserror for structured error handling.
//! Backend failures carry a machine-readable kind so the UI layer
//! can show a differentiated message per failure class.

use thiserror::Error;

/// Machine-readable classification of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    Unavailable,
    Unauthenticated,
    Unknown,
}

impl ErrorKind {
    /// Stable string form, matching the backend's own error codes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unknown => "unknown",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Permission denied by the backend: {0}")]
    PermissionDenied(String),

    #[error("Backend is temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Invalid email or password: {0}")]
    InvalidCredentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image too large: {0} bytes (limit {1})")]
    ImageTooLarge(u64, u64),

    #[error("{0}")]
    Unknown(String),
}

impl AppError {
    /// Classify into the backend error taxonomy.
    ///
    /// Local failures (IO, oversized image, bad credentials) have no
    /// backend kind and report as `unknown`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AppError::Unavailable(_) => ErrorKind::Unavailable,
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::Http(e) if e.is_connect() || e.is_timeout() => ErrorKind::Unavailable,
            _ => ErrorKind::Unknown,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
