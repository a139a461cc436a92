//! Error types for the notification gateway.

use thiserror::Error;

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while dispatching a notice.
///
/// These stay inside the gateway: callers see at most a logged warning or a
/// `hrflow_core::Error::Notification` when they explicitly ask for one.
#[derive(Debug, Error)]
pub enum Error {
    /// Channel not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Channel is disabled.
    #[error("Channel disabled: {0}")]
    ChannelDisabled(String),

    /// Send operation failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Invalid channel configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Other error.
    #[error("Other: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<Error> for hrflow_core::Error {
    fn from(err: Error) -> Self {
        hrflow_core::Error::Notification(err.to_string())
    }
}
