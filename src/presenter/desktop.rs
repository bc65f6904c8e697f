//! Desktop presenter.
//!
//! Titles and notices go to the tray icon over a crossbeam channel.
//! Notifications are queued for the notification task (see
//! [`run_notifier`](crate::notification::run_notifier)), which shows them
//! with action buttons and withdraws them once they expire.

use crossbeam_channel::Sender;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::{Notification, NotificationKind, Presenter, PresenterError, Prompt, PromptAnswer};
use crate::menubar::{StatusView, TrayUpdate};
use crate::notification::Delivery;
use crate::stats::StatsSummary;

/// Presenter backed by the tray icon and the notification center.
#[derive(Debug, Clone)]
pub struct DesktopPresenter {
    tray_tx: Sender<TrayUpdate>,
    deliveries: UnboundedSender<Delivery>,
}

impl DesktopPresenter {
    /// Creates a presenter that feeds the given tray and notification queues.
    pub fn new(tray_tx: Sender<TrayUpdate>, deliveries: UnboundedSender<Delivery>) -> Self {
        Self {
            tray_tx,
            deliveries,
        }
    }

    fn send(&self, update: TrayUpdate) {
        if self.tray_tx.send(update).is_err() {
            tracing::debug!("Menu bar is gone; dropping update");
        }
    }

    /// Queues `notification` and returns the id it is shown under.
    fn deliver(&self, notification: &Notification) -> Result<String, PresenterError> {
        let id = Uuid::new_v4().to_string();
        self.deliveries
            .send(Delivery::Show {
                id: id.clone(),
                notification: notification.clone(),
            })
            .map_err(|_| PresenterError::Disconnected)?;
        Ok(id)
    }

    /// Clears the notice line and withdraws the notification later, from a
    /// detached task.
    ///
    /// The task owns its own sender clones and touches nothing else.
    fn schedule_clear(&self, notification: &Notification, id: String) {
        let Some(delay) = notification.dismiss_after else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let tray_tx = self.tray_tx.clone();
        let deliveries = self.deliveries.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tray_tx.send(TrayUpdate::ClearNotice);
            let _ = deliveries.send(Delivery::Withdraw { id });
        });
    }
}

impl Presenter for DesktopPresenter {
    fn set_title(&self, view: &StatusView) {
        self.send(TrayUpdate::SetView(view.clone()));
    }

    fn show_stats(&self, stats: &StatsSummary) {
        self.send(TrayUpdate::SetStats(stats.clone()));
    }

    fn show_notification(&self, notification: &Notification) -> Result<(), PresenterError> {
        self.send(TrayUpdate::ShowNotice(notification.title.clone()));
        let id = self.deliver(notification)?;
        self.schedule_clear(notification, id);
        Ok(())
    }

    /// Posts the question as a notification with Install / Later buttons.
    ///
    /// The answer comes back as a notification action, so this always
    /// returns [`PromptAnswer::Pending`].
    fn prompt_user(&self, prompt: &Prompt) -> Result<PromptAnswer, PresenterError> {
        if !cfg!(target_os = "macos") {
            return Err(PresenterError::Unavailable(
                "notification buttons require macOS".to_string(),
            ));
        }

        let offer = Notification::new(NotificationKind::UpdateOffer, &prompt.title, &prompt.message);
        self.send(TrayUpdate::ShowNotice(prompt.title.clone()));
        self.deliver(&offer)?;
        Ok(PromptAnswer::Pending)
    }
}
