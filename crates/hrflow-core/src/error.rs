//! Error types for the workflow core.

use thiserror::Error;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the workflow core.
///
/// Persistence and validation errors abort the current operation and roll
/// back its transaction. Notification errors are logged by the caller and
/// never fail the parent operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Employee, review, or record absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing input fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A decision validation rule was not met. Carries the specific
    /// denial reason, not a generic message.
    #[error("Policy denied: {0}")]
    PolicyDenied(String),

    /// Store transaction failed.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Notification dispatch failed.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether this error kind may be swallowed after logging.
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification(_))
    }
}
