//! Presentation port error types.

use thiserror::Error;

/// Errors raised while showing something to the user.
///
/// None of these are fatal: the reminder keeps counting when a notification
/// cannot be delivered.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// The platform helper could not be started.
    #[error("Presentation helper is not available: {0}")]
    Unavailable(String),

    /// The platform helper ran but reported a failure.
    #[error("Presentation helper failed: {0}")]
    CommandFailed(String),

    /// The menu bar or notification queue is gone.
    #[error("Desktop is no longer listening")]
    Disconnected,
}

impl PresenterError {
    /// Returns true if retrying cannot help on this machine.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Disconnected)
    }
}
