//! Native notifications.
//!
//! On macOS notifications go through `UNUserNotificationCenter`. Stand-up
//! prompts carry "I moved" and "Snooze" buttons; update offers carry
//! "Install" and "Later". A delegate turns button clicks, body clicks, and
//! dismissals into [`NotificationActionEvent`]s for the run loop.
//!
//! The presenter never touches the notification center itself. It queues a
//! [`Delivery`] and [`run_notifier`] performs it on the main thread, which
//! owns the (non-`Send`) delegate. Elsewhere notifications are printed.
//!
//! # Requirements
//!
//! The binary must run from a signed application bundle for macOS to grant
//! notification permission. Without it the reminder still works from the
//! menu bar.

mod actions;
#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod content;
#[cfg(target_os = "macos")]
mod delegate;
pub mod error;
#[cfg(target_os = "macos")]
mod manager;
#[cfg(target_os = "macos")]
mod request;

#[cfg(target_os = "macos")]
use std::rc::Rc;
#[cfg(target_os = "macos")]
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

pub use self::actions::{action_ids, category_for, category_ids};
pub use self::error::NotificationError;
#[cfg(target_os = "macos")]
pub use self::manager::NotificationManager;

use crate::presenter::Notification;

/// How often delegate responses are forwarded to the run loop.
#[cfg(target_os = "macos")]
const ACTION_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// NotificationActionEvent
// ============================================================================

/// A user response to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationActionEvent {
    /// "I moved", or a click on the stand-up prompt
    Moved,
    /// "Snooze" on the stand-up prompt
    Snooze,
    /// The stand-up prompt was closed without an answer
    Dismiss,
    /// "Install", or a click on the update offer
    Install,
    /// "Later", or the update offer was closed
    Later,
}

impl NotificationActionEvent {
    /// Maps a response to an event.
    ///
    /// Responses to notifications without buttons map to `None`.
    #[must_use]
    pub fn from_response(category: &str, action: &str) -> Option<Self> {
        match (category, action) {
            (category_ids::STAND_UP, action_ids::MOVED | action_ids::DEFAULT) => Some(Self::Moved),
            (category_ids::STAND_UP, action_ids::SNOOZE) => Some(Self::Snooze),
            (category_ids::STAND_UP, action_ids::DISMISS) => Some(Self::Dismiss),
            (category_ids::UPDATE_OFFER, action_ids::INSTALL | action_ids::DEFAULT) => {
                Some(Self::Install)
            }
            (category_ids::UPDATE_OFFER, action_ids::LATER | action_ids::DISMISS) => {
                Some(Self::Later)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Delivery
// ============================================================================

/// Work queued for the notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Show `notification` under `id`.
    Show {
        id: String,
        notification: Notification,
    },
    /// Remove the notification shown under `id`.
    Withdraw { id: String },
}

// ============================================================================
// Notifier task
// ============================================================================

/// Performs queued deliveries until the queue closes, passing every user
/// response to `on_action`.
///
/// Must be spawned with `spawn_local` on the main thread. Stops forwarding
/// responses once `on_action` returns false.
#[cfg(target_os = "macos")]
pub async fn run_notifier<F>(mut deliveries: UnboundedReceiver<Delivery>, on_action: F)
where
    F: Fn(NotificationActionEvent) -> bool + 'static,
{
    let Some(manager) = NotificationManager::new_with_fallback().await else {
        return print_deliveries(deliveries).await;
    };
    let manager = Rc::new(manager);

    let poller = {
        let manager = Rc::clone(&manager);
        tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(ACTION_POLL_INTERVAL);
            loop {
                ticker.tick().await;
                while let Some(event) = manager.try_recv_action() {
                    tracing::debug!(event = ?event, "Notification response");
                    if !on_action(event) {
                        return;
                    }
                }
            }
        })
    };

    while let Some(delivery) = deliveries.recv().await {
        match delivery {
            Delivery::Show { id, notification } => {
                if let Err(e) = manager.deliver(&id, &notification).await {
                    tracing::warn!(error = %e, title = %notification.title, "Failed to deliver notification");
                }
            }
            Delivery::Withdraw { id } => manager.withdraw(&id),
        }
    }

    poller.abort();
    manager.clear_all();
}

/// Prints queued notifications until the queue closes.
#[cfg(not(target_os = "macos"))]
pub async fn run_notifier<F>(deliveries: UnboundedReceiver<Delivery>, _on_action: F)
where
    F: Fn(NotificationActionEvent) -> bool + 'static,
{
    print_deliveries(deliveries).await;
}

async fn print_deliveries(mut deliveries: UnboundedReceiver<Delivery>) {
    while let Some(delivery) = deliveries.recv().await {
        if let Delivery::Show { notification, .. } = delivery {
            println!("[{}] {}", notification.title, notification.message);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
