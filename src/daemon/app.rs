//! The reminder run loop.
//!
//! [`App`] owns every long-lived piece: the engine, the configuration
//! document, and the update service. It serializes ticks, menu actions,
//! notification responses, wake detection, and update checks on one task.

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::engine::{ReminderEngine, ReminderEvent};
use super::settings::RunSettings;
use super::wake::WakeDetector;
use crate::menubar::MenuAction;
use crate::notification::NotificationActionEvent;
use crate::presenter::{Notification, NotificationKind, Presenter};
use crate::stats::StatsTracker;
use crate::store::ConfigStore;
use crate::types::ReminderPhase;
use crate::update::{auto_check_due, CheckOutcome, UpdateService, Version};

// ============================================================================
// ReminderCommand
// ============================================================================

/// Input to the run loop from the menu, notifications, signals, and dev
/// triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    /// A menu item was clicked
    Menu(MenuAction),
    /// A notification button was clicked or the notification was closed
    Notification(NotificationActionEvent),
    /// Show the stand prompt now
    DevPrompt,
    /// Pretend to run another version
    DevVersion(Version),
}

impl From<MenuAction> for ReminderCommand {
    fn from(action: MenuAction) -> Self {
        Self::Menu(action)
    }
}

// ============================================================================
// App
// ============================================================================

/// The running reminder.
pub struct App {
    engine: ReminderEngine,
    events: mpsc::UnboundedReceiver<ReminderEvent>,
    config: ConfigStore,
    updates: UpdateService,
    presenter: Arc<dyn Presenter>,
    wake: WakeDetector,
    settings: RunSettings,
}

impl App {
    /// Loads configuration and statistics from the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a first-launch user id cannot be persisted.
    pub fn new(
        settings: RunSettings,
        presenter: Arc<dyn Presenter>,
        updates: UpdateService,
    ) -> Result<Self> {
        let mut config = ConfigStore::open_in(&settings.data_dir);
        let user_id = config
            .ensure_user_id()
            .context("Failed to save user id")?;
        tracing::debug!(user_id = %user_id, "Loaded configuration");

        let stats = StatsTracker::open_in(&settings.data_dir);
        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = ReminderEngine::new(config.interval(), stats, presenter.clone(), event_tx);

        Ok(Self {
            engine,
            events,
            config,
            updates,
            presenter,
            wake: WakeDetector::new(Utc::now()),
            settings,
        })
    }

    pub fn engine(&self) -> &ReminderEngine {
        &self.engine
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Runs until Quit, an installed update, or the command channel closing.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<ReminderCommand>) -> Result<()> {
        self.startup(Utc::now()).await?;

        let mut ticker = interval(self.settings.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.on_tick(Utc::now()).await {
                        Ok(ControlFlow::Continue(())) => {}
                        Ok(ControlFlow::Break(())) => break,
                        Err(e) => tracing::error!(error = %format!("{e:#}"), "Tick failed"),
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Command channel closed");
                        break;
                    };
                    match self.handle(command).await {
                        Ok(ControlFlow::Continue(())) => {}
                        Ok(ControlFlow::Break(())) => break,
                        Err(e) => tracing::error!(error = %format!("{e:#}"), "Action failed"),
                    }
                }
            }
        }

        tracing::info!("Reminder stopped");
        Ok(())
    }

    /// Shows the one-time welcome and runs the automatic update check.
    pub async fn startup(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.config.config().notification_prompt_shown {
            let welcome = Notification::new(
                NotificationKind::Welcome,
                "Stand-Up Reminder",
                "Reminders arrive as notifications. If none appear, allow them in \
                 System Settings > Notifications.",
            );
            match self.presenter.show_notification(&welcome) {
                Ok(()) => self
                    .config
                    .mark_notification_prompt_shown()
                    .context("Failed to save notification prompt flag")?,
                Err(e) => tracing::warn!(error = %e, "Failed to show welcome notification"),
            }
        }

        self.auto_check(now).await.map(|_| ())
    }

    /// Runs a silent update check if the last one is more than a day old.
    ///
    /// The timestamp is saved before the check, so a failing check still
    /// waits a full day before the next attempt.
    pub async fn auto_check(&mut self, now: DateTime<Utc>) -> Result<ControlFlow<()>> {
        let now = now.timestamp();
        if !auto_check_due(self.config.config().last_update_check, now) {
            return Ok(ControlFlow::Continue(()));
        }

        self.config
            .mark_update_checked(now)
            .context("Failed to save update check time")?;
        let outcome = self
            .updates
            .check_for_updates(true, self.presenter.as_ref())
            .await;
        Ok(flow_after(&outcome))
    }

    /// Advances the reminder by one tick observed at `now`.
    pub async fn on_tick(&mut self, now: DateTime<Utc>) -> Result<ControlFlow<()>> {
        if self.wake.observe(now) {
            self.engine.wake()?;
        }
        self.engine.tick()?;
        self.drain_events();
        self.auto_check(now).await
    }

    /// Applies one command.
    pub async fn handle(&mut self, command: ReminderCommand) -> Result<ControlFlow<()>> {
        tracing::debug!(command = ?command, "Handling command");

        match command {
            ReminderCommand::Menu(MenuAction::SelectInterval(interval)) => {
                // A choice that cannot be saved leaves the countdown alone.
                self.config
                    .set_interval(interval)
                    .context("Failed to save interval")?;
                self.engine.select_interval(interval)?;
            }
            ReminderCommand::Menu(MenuAction::Snooze) => self.engine.snooze()?,
            ReminderCommand::Menu(MenuAction::Acknowledge) => {
                let streak = self.engine.acknowledge()?;
                tracing::info!(streak, "Stand-up confirmed");
            }
            ReminderCommand::Menu(MenuAction::Dismiss) => self.engine.dismiss_prompt()?,
            ReminderCommand::Menu(MenuAction::TogglePause) => self.engine.toggle_pause()?,
            ReminderCommand::Menu(MenuAction::Reset) => self.engine.reset()?,
            ReminderCommand::Menu(MenuAction::CheckForUpdates) => {
                let outcome = self
                    .updates
                    .check_for_updates(false, self.presenter.as_ref())
                    .await;
                self.drain_events();
                return Ok(flow_after(&outcome));
            }
            ReminderCommand::Menu(MenuAction::Quit) => return Ok(ControlFlow::Break(())),
            ReminderCommand::Notification(event) => return self.on_notification(event).await,
            ReminderCommand::DevPrompt => self.engine.force_prompt()?,
            ReminderCommand::DevVersion(version) => self.updates.override_version(version),
        }

        self.drain_events();
        Ok(ControlFlow::Continue(()))
    }

    /// Applies a notification response.
    ///
    /// Responses can arrive after the prompt they belong to has been settled
    /// from the menu or has run out; those are ignored.
    async fn on_notification(&mut self, event: NotificationActionEvent) -> Result<ControlFlow<()>> {
        let state = self.engine.state();
        let prompt_open = state.pending_acknowledgement;
        let can_snooze = prompt_open && state.phase == ReminderPhase::Standing;

        match event {
            NotificationActionEvent::Moved if prompt_open => {
                let streak = self.engine.acknowledge()?;
                tracing::info!(streak, "Stand-up confirmed");
            }
            NotificationActionEvent::Dismiss if prompt_open => self.engine.dismiss_prompt()?,
            NotificationActionEvent::Snooze if can_snooze => self.engine.snooze()?,
            NotificationActionEvent::Moved
            | NotificationActionEvent::Dismiss
            | NotificationActionEvent::Snooze => {
                tracing::debug!(event = ?event, "Stand-up already settled");
            }
            NotificationActionEvent::Install => {
                let outcome = self.updates.accept_offer(self.presenter.as_ref()).await;
                self.drain_events();
                return Ok(flow_after(&outcome));
            }
            NotificationActionEvent::Later => {
                if !self.updates.decline_offer() {
                    tracing::debug!("No update offer to decline");
                }
            }
        }

        self.drain_events();
        Ok(ControlFlow::Continue(()))
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ReminderEvent::Tick { .. } => {}
                event => tracing::debug!(event = ?event, "Reminder event"),
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("engine", &self.engine)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn flow_after(outcome: &CheckOutcome) -> ControlFlow<()> {
    if outcome.should_quit() {
        tracing::info!("Quitting for the new version");
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

// ============================================================================
// Tests
// ============================================================================
