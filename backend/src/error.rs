//! Centralized error handling for the bingo-maker backend.
//!
//! Every service and store operation fails with one of these variants so
//! the REST layer can map failures to responses without string matching.

use thiserror::Error;

/// The primary error type for backend operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registration with an email that already has an account
    #[error("Email already in use")]
    DuplicateEmail,

    /// Login with no exactly-matching user record
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Operation that requires an active session user
    #[error("User not authenticated")]
    NotAuthenticated,

    /// Resource lookup miss (board, user, square, snapshot)
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Precondition failure (length caps, malformed input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image upload precondition failure
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Store I/O failure
    #[error("Persistence failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

/// A specialized Result type for backend logic.
pub type Result<T> = std::result::Result<T, AppError>;
