//! Presentation port.
//!
//! The reminder engine and the update checker never talk to the desktop
//! directly. Every user-visible side effect goes through [`Presenter`]:
//!
//! - `set_title`: menu bar glyph and countdown line
//! - `show_notification`: a transient message
//! - `prompt_user`: a yes/no question (used before installing an update)
//!
//! [`DesktopPresenter`] is the real implementation; [`MockPresenter`]
//! records every call for tests. The desktop answers prompts through
//! notification buttons, so its answer arrives later as a
//! [`NotificationActionEvent`](crate::notification::NotificationActionEvent)
//! instead of as the return value.

mod desktop;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub use self::desktop::DesktopPresenter;
pub use self::error::PresenterError;

use crate::menubar::StatusView;
use crate::stats::StatsSummary;

/// How long sit-down and snooze notices stay up.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(10);

// ============================================================================
// Notification
// ============================================================================

/// Kind of notification, used for routing and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Time to stand up
    StandUp,
    /// Standing period over
    SitDown,
    /// Stand-up postponed
    Snoozed,
    /// A newer version exists
    UpdateAvailable,
    /// No newer version
    UpToDate,
    /// Update check or install failed
    UpdateFailed,
    /// A newer version with Install / Later buttons
    UpdateOffer,
    /// One-time explanation of notification permissions
    Welcome,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Kind of notification
    pub kind: NotificationKind,
    /// Title line
    pub title: String,
    /// Body text
    pub message: String,
    /// Remove the notification after this long, if set
    pub dismiss_after: Option<Duration>,
}

impl Notification {
    /// Creates a notification that stays until the user dismisses it.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            dismiss_after: None,
        }
    }

    /// Sets the auto-dismiss delay.
    pub fn dismiss_after(mut self, delay: Duration) -> Self {
        self.dismiss_after = Some(delay);
        self
    }
}

/// A yes/no question for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub message: String,
    /// Label of the accepting button
    pub accept_label: String,
    /// Label of the declining button
    pub decline_label: String,
}

impl Prompt {
    /// Creates a prompt.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        accept_label: impl Into<String>,
        decline_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            accept_label: accept_label.into(),
            decline_label: decline_label.into(),
        }
    }
}

/// How the user answered a [`Prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    /// The accepting button was chosen
    Accepted,
    /// The declining button was chosen, or the prompt was closed
    Declined,
    /// The prompt is showing; the answer arrives as a notification action
    Pending,
}

// ============================================================================
// Presenter
// ============================================================================

/// Narrow interface to the desktop.
pub trait Presenter {
    /// Updates the menu bar glyph and countdown line.
    fn set_title(&self, view: &StatusView);

    /// Shows a transient message.
    fn show_notification(&self, notification: &Notification) -> Result<(), PresenterError>;

    /// Asks a yes/no question.
    fn prompt_user(&self, prompt: &Prompt) -> Result<PromptAnswer, PresenterError>;

    /// Shows fresh streak figures. Optional.
    fn show_stats(&self, _stats: &StatsSummary) {}
}

// ============================================================================
// MockPresenter
// ============================================================================

/// Presenter that records every call.
#[derive(Debug, Default)]
pub struct MockPresenter {
    titles: Mutex<Vec<StatusView>>,
    notifications: Mutex<Vec<Notification>>,
    prompts: Mutex<Vec<Prompt>>,
    accept_prompts: AtomicBool,
    defer_prompts: AtomicBool,
    should_fail: AtomicBool,
}

impl MockPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later prompt return `accept`.
    pub fn set_accept_prompts(&self, accept: bool) {
        self.accept_prompts.store(accept, Ordering::SeqCst);
    }

    /// Makes every later prompt stay pending, like a notification prompt.
    pub fn set_defer_prompts(&self, defer: bool) {
        self.defer_prompts.store(defer, Ordering::SeqCst);
    }

    /// Makes notifications and prompts fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn titles(&self) -> Vec<StatusView> {
        self.titles.lock().unwrap().clone()
    }

    pub fn last_title(&self) -> Option<StatusView> {
        self.titles.lock().unwrap().last().cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Kinds of every notification shown, in order.
    pub fn notification_kinds(&self) -> Vec<NotificationKind> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.kind)
            .collect()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.titles.lock().unwrap().clear();
        self.notifications.lock().unwrap().clear();
        self.prompts.lock().unwrap().clear();
    }
}

impl Presenter for MockPresenter {
    fn set_title(&self, view: &StatusView) {
        self.titles.lock().unwrap().push(view.clone());
    }

    fn show_notification(&self, notification: &Notification) -> Result<(), PresenterError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(PresenterError::CommandFailed("mock failure".to_string()));
        }
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn prompt_user(&self, prompt: &Prompt) -> Result<PromptAnswer, PresenterError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(PresenterError::CommandFailed("mock failure".to_string()));
        }
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(if self.defer_prompts.load(Ordering::SeqCst) {
            PromptAnswer::Pending
        } else if self.accept_prompts.load(Ordering::SeqCst) {
            PromptAnswer::Accepted
        } else {
            PromptAnswer::Declined
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
