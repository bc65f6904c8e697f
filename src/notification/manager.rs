//! Native notification manager.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use objc2::rc::Retained;
use objc2::MainThreadMarker;

use super::actions::create_categories;
use super::center::NotificationCenter;
use super::content::content_for;
use super::delegate::NotificationDelegate;
use super::error::NotificationError;
use super::request::create_notification_request_with_id;
use super::NotificationActionEvent;
use crate::presenter::Notification;

/// Maximum retry attempts for delivering a notification.
const MAX_RETRIES: u32 = 3;

/// Delay between retry attempts.
const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Owns the notification delegate and talks to the notification center.
///
/// Not `Send`: the delegate belongs to the main thread.
pub struct NotificationManager {
    action_receiver: Receiver<NotificationActionEvent>,
    _delegate: Retained<NotificationDelegate>,
}

impl NotificationManager {
    /// Requests permission, installs the delegate, and registers the
    /// button categories.
    ///
    /// # Errors
    ///
    /// Returns an error if permission is denied or this is not the main
    /// thread.
    pub async fn new() -> Result<Self, NotificationError> {
        let mtm = MainThreadMarker::new().ok_or_else(|| {
            NotificationError::InitializationFailed(
                "notifications must be set up on the main thread".to_string(),
            )
        })?;

        let granted = NotificationCenter::request_authorization().await?;
        if !granted {
            return Err(NotificationError::PermissionDenied);
        }

        let (sender, receiver) = mpsc::channel();
        let delegate = NotificationDelegate::new(mtm, sender);
        NotificationCenter::set_delegate(&NotificationDelegate::as_protocol(&delegate));
        NotificationCenter::set_notification_categories(&create_categories());

        Ok(Self {
            action_receiver: receiver,
            _delegate: delegate,
        })
    }

    /// Like [`NotificationManager::new`], but logs the failure and returns
    /// `None` so the reminder keeps running from the menu bar alone.
    pub async fn new_with_fallback() -> Option<Self> {
        match Self::new().await {
            Ok(manager) => Some(manager),
            Err(e) => {
                tracing::warn!(error = %e, hint = e.suggestion(), "Native notifications disabled");
                None
            }
        }
    }

    /// Shows `notification` under `id`, retrying transient failures.
    pub async fn deliver(&self, id: &str, notification: &Notification) -> Result<(), NotificationError> {
        let content = content_for(notification);
        let request = create_notification_request_with_id(id, &content);
        let mut retries = 0;

        loop {
            match NotificationCenter::add_notification_request(&request).await {
                Ok(()) => return Ok(()),
                Err(e) if retries < MAX_RETRIES => {
                    retries += 1;
                    tracing::warn!(retry = retries, max = MAX_RETRIES, error = %e, "Notification delivery failed");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Removes the notification shown under `id`.
    pub fn withdraw(&self, id: &str) {
        NotificationCenter::remove(id);
    }

    /// Tries to receive an action event without blocking.
    #[must_use]
    pub fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        match self.action_receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Removes every pending and delivered notification of this app.
    pub fn clear_all(&self) {
        NotificationCenter::remove_all();
    }
}
