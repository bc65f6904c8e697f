//! Notification center error types.

use thiserror::Error;

/// Errors raised while talking to the system notification center.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The authorization request itself failed.
    #[error("Failed to request notification permission: {0}")]
    AuthorizationFailed(String),

    /// A notification request was rejected.
    #[error("Failed to deliver notification: {0}")]
    SendFailed(String),

    /// The user turned notifications off for this app.
    #[error("Notifications are not allowed")]
    PermissionDenied,

    /// The notification center could not be set up.
    #[error("Failed to initialize notifications: {0}")]
    InitializationFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a hint for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "Allow notifications in System Settings > Notifications"
            }
            Self::SendFailed(_) => "Check Notification Center",
            Self::InitializationFailed(_) => {
                "Run the signed application bundle instead of the bare binary"
            }
        }
    }
}
