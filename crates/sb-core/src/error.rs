//! # AppError
//!
//! Centralized error handling for the suggestion box.
//! Every user-initiated action either succeeds or reports exactly one of these.

use thiserror::Error;

/// The primary error type for all sb-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., Suggestion)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty title, wrong human-check answer)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Authentication failure (e.g., bad credentials, no session)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (e.g., moderation without admin mode)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate signup email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message fit for showing to the user, without the category prefix.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(..) => self.to_string(),
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

/// A specialized Result type for suggestion box logic.
pub type Result<T> = std::result::Result<T, AppError>;
