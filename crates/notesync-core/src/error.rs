//! Error types for notesync.

use thiserror::Error;

/// Result type alias using notesync's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notesync operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note absent, or present but owned by a different user.
    /// The two cases are deliberately indistinguishable to the caller.
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Missing or malformed required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Registration conflict on the username
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password. Carries no detail so the
    /// two cases cannot be told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password hashing/verification failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(e.to_string())
    }
}
