//! Reminder engine.
//!
//! This module provides the stand-up state machine:
//! - State transitions (Working → Standing → Working, Snoozed, Paused)
//! - Streak bookkeeping through the stats tracker
//! - Event firing for the run loop and the presenter
//!
//! The engine is driven from outside: the run loop calls [`ReminderEngine::tick`]
//! once per second and forwards user actions to the other methods. Every
//! transition refreshes the menu bar through the presenter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::menubar::StatusView;
use crate::presenter::{Notification, NotificationKind, Presenter, NOTICE_LIFETIME};
use crate::stats::StatsTracker;
use crate::types::{Interval, ReminderPhase, ReminderState, STANDING_SECONDS};

// ============================================================================
// ReminderEvent
// ============================================================================

/// Reminder events for the run loop and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderEvent {
    /// Work period ran out and the user was asked to stand
    StandPromptShown,
    /// Standing period ran out
    StandingEnded {
        /// Whether the prompt was confirmed in time
        acknowledged: bool,
    },
    /// The user confirmed the stand-up
    Acknowledged {
        /// Streak after confirming
        streak: u32,
    },
    /// The streak was reset
    StreakCleared,
    /// The prompt was snoozed
    SnoozeStarted,
    /// Snooze ran out
    SnoozeEnded,
    /// Reminders paused
    Paused,
    /// Reminders resumed
    Resumed,
    /// Work countdown restarted by the user
    Reset,
    /// Work countdown restarted after sleep
    Woke,
    /// Interval switched
    IntervalChanged {
        /// New interval
        interval: Interval,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        time_remaining: i64,
    },
}

// ============================================================================
// ReminderEngine
// ============================================================================

/// Engine that owns the countdown state and applies transitions.
pub struct ReminderEngine {
    state: ReminderState,
    interval: Interval,
    stats: StatsTracker,
    presenter: Arc<dyn Presenter>,
    event_tx: mpsc::UnboundedSender<ReminderEvent>,
}

impl ReminderEngine {
    /// Creates an engine in the Working phase for `interval`.
    pub fn new(
        interval: Interval,
        stats: StatsTracker,
        presenter: Arc<dyn Presenter>,
        event_tx: mpsc::UnboundedSender<ReminderEvent>,
    ) -> Self {
        let engine = Self {
            state: ReminderState::new(interval),
            interval,
            stats,
            presenter,
            event_tx,
        };
        engine.refresh_display();
        engine.presenter.show_stats(&engine.stats.summary());
        engine
    }

    /// Returns a reference to the current state.
    pub fn state(&self) -> &ReminderState {
        &self.state
    }

    /// Returns the selected interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the stats tracker.
    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Advances the countdown by one second.
    ///
    /// # Errors
    ///
    /// Returns an error if a stats write fails or the event channel is closed.
    pub fn tick(&mut self) -> Result<()> {
        if self.state.is_paused() {
            return Ok(());
        }

        let expired = self.state.tick();
        self.emit(ReminderEvent::Tick {
            time_remaining: self.state.time_remaining,
        })?;

        if expired {
            self.handle_expiry()?;
        }
        self.refresh_display();
        Ok(())
    }

    /// Handles the current phase running out.
    fn handle_expiry(&mut self) -> Result<()> {
        match self.state.phase {
            ReminderPhase::Working => self.prompt_stand(),
            ReminderPhase::Standing => {
                let acknowledged = !self.state.pending_acknowledgement;
                self.emit(ReminderEvent::StandingEnded { acknowledged })?;
                self.rearm_work()?;
                self.notify(
                    Notification::new(
                        NotificationKind::SitDown,
                        "Sit Down",
                        format!("{} timer has been reset.", self.interval),
                    )
                    .dismiss_after(NOTICE_LIFETIME),
                );
                Ok(())
            }
            ReminderPhase::Snoozed => {
                self.emit(ReminderEvent::SnoozeEnded)?;
                self.prompt_stand()
            }
            ReminderPhase::Paused => Ok(()),
        }
    }

    /// Enters Standing and asks the user to move.
    fn prompt_stand(&mut self) -> Result<()> {
        self.stats
            .record_prompt()
            .context("Failed to record stand prompt")?;
        self.state.start_standing();
        self.emit(ReminderEvent::StandPromptShown)?;

        tracing::info!("Stand-up prompt");
        self.notify(
            Notification::new(
                NotificationKind::StandUp,
                "Stand Up",
                "Stand up, stretch, and move around for 5 minutes.",
            )
            // answerable for the whole standing period
            .dismiss_after(Duration::from_secs(STANDING_SECONDS.unsigned_abs())),
        );
        self.presenter.show_stats(&self.stats.summary());
        Ok(())
    }

    /// Restarts the work countdown, clearing the streak first if the last
    /// prompt was never confirmed.
    fn rearm_work(&mut self) -> Result<()> {
        if self.state.pending_acknowledgement {
            self.stats
                .clear_streak()
                .context("Failed to clear streak")?;
            self.state.pending_acknowledgement = false;
            self.emit(ReminderEvent::StreakCleared)?;
            self.presenter.show_stats(&self.stats.summary());
        }
        self.state.start_working();
        Ok(())
    }

    /// Switches to another interval and restarts the work countdown.
    ///
    /// The caller persists the choice.
    pub fn select_interval(&mut self, interval: Interval) -> Result<()> {
        self.rearm_work()?;
        self.interval = interval;
        self.state.set_interval(interval);
        self.emit(ReminderEvent::IntervalChanged { interval })?;
        self.refresh_display();

        tracing::info!(interval = %interval, "Interval changed");
        Ok(())
    }

    /// Confirms the current stand prompt ("I moved").
    ///
    /// # Errors
    ///
    /// Returns an error if no prompt is waiting for confirmation.
    pub fn acknowledge(&mut self) -> Result<u32> {
        if !self.state.pending_acknowledgement {
            anyhow::bail!("There is no stand-up to confirm");
        }

        let streak = self
            .stats
            .record_completed()
            .context("Failed to record stand-up")?;
        self.state.confirm();
        self.emit(ReminderEvent::Acknowledged { streak })?;
        self.refresh_display();
        self.presenter.show_stats(&self.stats.summary());
        Ok(streak)
    }

    /// Handles the stand prompt being dismissed without a "moved" response.
    ///
    /// # Errors
    ///
    /// Returns an error if no prompt is waiting for confirmation.
    pub fn dismiss_prompt(&mut self) -> Result<()> {
        if !self.state.pending_acknowledgement {
            anyhow::bail!("There is no stand-up to dismiss");
        }

        self.stats
            .clear_streak()
            .context("Failed to clear streak")?;
        self.state.pending_acknowledgement = false;
        self.emit(ReminderEvent::StreakCleared)?;
        self.refresh_display();
        self.presenter.show_stats(&self.stats.summary());
        Ok(())
    }

    /// Postpones the stand-up by five minutes.
    ///
    /// # Errors
    ///
    /// Returns an error unless an unconfirmed prompt is showing.
    pub fn snooze(&mut self) -> Result<()> {
        if self.state.phase != ReminderPhase::Standing || !self.state.pending_acknowledgement {
            anyhow::bail!("Only an unconfirmed stand-up prompt can be snoozed");
        }

        self.stats
            .record_snoozed()
            .context("Failed to record snooze")?;
        self.state.start_snooze();
        self.emit(ReminderEvent::SnoozeStarted)?;
        self.notify(
            Notification::new(
                NotificationKind::Snoozed,
                "Snoozed",
                "I'll remind you again in 5 minutes.",
            )
            .dismiss_after(NOTICE_LIFETIME),
        );
        self.refresh_display();
        Ok(())
    }

    /// Pauses reminders, or resumes them at a full work period.
    pub fn toggle_pause(&mut self) -> Result<()> {
        if self.state.is_paused() {
            self.rearm_work()?;
            self.emit(ReminderEvent::Resumed)?;
            tracing::info!("Reminders resumed");
        } else {
            self.state.pause();
            self.emit(ReminderEvent::Paused)?;
            tracing::info!("Reminders paused");
        }
        self.refresh_display();
        Ok(())
    }

    /// Restarts the work countdown at full duration.
    ///
    /// # Errors
    ///
    /// Returns an error if reminders are paused.
    pub fn reset(&mut self) -> Result<()> {
        if self.state.is_paused() {
            anyhow::bail!("Reminders are paused");
        }

        self.rearm_work()?;
        self.emit(ReminderEvent::Reset)?;
        self.refresh_display();
        Ok(())
    }

    /// Forces a fresh work period after the machine wakes up.
    pub fn wake(&mut self) -> Result<()> {
        self.rearm_work()?;
        self.emit(ReminderEvent::Woke)?;
        self.refresh_display();

        tracing::info!("Woke from sleep; work countdown restarted");
        Ok(())
    }

    /// Skips straight to the stand prompt.
    pub fn force_prompt(&mut self) -> Result<()> {
        if self.state.is_paused() {
            anyhow::bail!("Reminders are paused");
        }

        self.rearm_work()?;
        self.prompt_stand()?;
        self.refresh_display();
        Ok(())
    }

    fn refresh_display(&self) {
        self.presenter
            .set_title(&StatusView::new(&self.state, self.interval));
    }

    fn notify(&self, notification: Notification) {
        if let Err(e) = self.presenter.show_notification(&notification) {
            tracing::warn!(error = %e, kind = ?notification.kind, "Failed to show notification");
        }
    }

    fn emit(&self, event: ReminderEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send reminder event")
    }

    /// Returns a mutable reference to the state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut ReminderState {
        &mut self.state
    }
}

impl std::fmt::Debug for ReminderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderEngine")
            .field("state", &self.state)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::MockPresenter;
    use crate::stats::STATS_FILE;
    use chrono::NaiveDate;

    struct Harness {
        engine: ReminderEngine,
        rx: mpsc::UnboundedReceiver<ReminderEvent>,
        presenter: Arc<MockPresenter>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn drain(&mut self) -> Vec<ReminderEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.rx.try_recv() {
                if !matches!(event, ReminderEvent::Tick { .. }) {
                    events.push(event);
                }
            }
            events
        }

        fn ticks(&mut self, count: usize) {
            for _ in 0..count {
                self.engine.tick().unwrap();
            }
        }

        fn streak(&self) -> u32 {
            self.engine.stats().snapshot().streak
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn harness(interval: Interval) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let stats = StatsTracker::with_date_source(dir.path().join(STATS_FILE), today);
        let presenter = Arc::new(MockPresenter::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = ReminderEngine::new(interval, stats, presenter.clone(), tx);
        Harness {
            engine,
            rx,
            presenter,
            _dir: dir,
        }
    }

    fn standing(interval: Interval) -> Harness {
        let mut h = harness(interval);
        h.engine.force_prompt().unwrap();
        h.drain();
        h.presenter.clear();
        h
    }

    // ------------------------------------------------------------------------
    // Working phase
    // ------------------------------------------------------------------------

    mod working_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let h = harness(Interval::OneMinute);
            let state = h.engine.state();

            assert_eq!(state.phase, ReminderPhase::Working);
            assert_eq!(state.time_remaining, 60);
            assert_eq!(state.work_duration, 60);
            assert!(!state.pending_acknowledgement);
            assert_eq!(h.presenter.titles().len(), 1);
        }

        #[test]
        fn test_work_period_ends_in_stand_prompt() {
            let mut h = harness(Interval::OneMinute);

            h.ticks(59);
            assert_eq!(h.engine.state().phase, ReminderPhase::Working);
            assert_eq!(h.engine.state().time_remaining, 1);

            h.ticks(1);
            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Standing);
            assert_eq!(state.time_remaining, 300);
            assert!(state.pending_acknowledgement);

            assert_eq!(h.drain(), vec![ReminderEvent::StandPromptShown]);
            assert_eq!(h.engine.stats().snapshot().day(today()).prompts, 1);
            assert_eq!(
                h.presenter.notification_kinds(),
                vec![NotificationKind::StandUp]
            );
            // the prompt stays answerable until standing ends
            assert_eq!(
                h.presenter.notifications()[0].dismiss_after,
                Some(Duration::from_secs(300))
            );
        }

        #[test]
        fn test_tick_updates_title() {
            let mut h = harness(Interval::ThirtyMinutes);
            h.presenter.clear();

            h.ticks(61);

            let title = h.presenter.last_title().unwrap();
            assert_eq!(title.glyph, "🪑");
            assert_eq!(title.status_line, "Time until standing up: 29m");
        }

        #[test]
        fn test_tick_emits_remaining_time() {
            let mut h = harness(Interval::OneMinute);
            h.engine.tick().unwrap();

            assert_eq!(
                h.rx.try_recv().unwrap(),
                ReminderEvent::Tick { time_remaining: 59 }
            );
        }

        #[test]
        fn test_select_interval_resets_countdown() {
            for interval in Interval::ALL {
                let mut h = harness(Interval::OneMinute);
                h.ticks(10);

                h.engine.select_interval(interval).unwrap();

                let state = h.engine.state();
                assert_eq!(state.phase, ReminderPhase::Working);
                assert_eq!(state.work_duration, interval.seconds());
                assert_eq!(state.time_remaining, interval.seconds());
                assert_eq!(h.engine.interval(), interval);
                assert!(h
                    .drain()
                    .contains(&ReminderEvent::IntervalChanged { interval }));
            }
        }

        #[test]
        fn test_acknowledge_without_prompt_fails() {
            let mut h = harness(Interval::OneMinute);
            let result = h.engine.acknowledge();

            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("no stand-up"));
        }

        #[test]
        fn test_snooze_outside_standing_fails() {
            let mut h = harness(Interval::OneMinute);
            assert!(h.engine.snooze().is_err());
            assert_eq!(h.engine.stats().snapshot().day(today()).snoozed, 0);
        }
    }

    // ------------------------------------------------------------------------
    // Standing phase
    // ------------------------------------------------------------------------

    mod standing_tests {
        use super::*;

        #[test]
        fn test_unacknowledged_standing_clears_streak() {
            let mut h = standing(Interval::OneMinute);
            h.engine.stats().record_completed().unwrap();
            h.engine.stats().record_completed().unwrap();
            assert_eq!(h.streak(), 2);

            h.ticks(300);

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Working);
            assert_eq!(state.time_remaining, 60);
            assert!(!state.pending_acknowledgement);
            assert_eq!(h.streak(), 0);
            assert_eq!(
                h.drain(),
                vec![
                    ReminderEvent::StandingEnded {
                        acknowledged: false
                    },
                    ReminderEvent::StreakCleared,
                ]
            );
            assert_eq!(
                h.presenter.notification_kinds(),
                vec![NotificationKind::SitDown]
            );
        }

        #[test]
        fn test_acknowledged_standing_keeps_streak() {
            let mut h = standing(Interval::OneMinute);

            assert_eq!(h.engine.acknowledge().unwrap(), 1);
            assert!(!h.engine.state().pending_acknowledgement);
            assert_eq!(h.engine.state().phase, ReminderPhase::Standing);

            h.ticks(300);

            assert_eq!(h.engine.state().phase, ReminderPhase::Working);
            assert_eq!(h.streak(), 1);
            assert_eq!(
                h.drain(),
                vec![
                    ReminderEvent::Acknowledged { streak: 1 },
                    ReminderEvent::StandingEnded { acknowledged: true },
                ]
            );
        }

        #[test]
        fn test_acknowledge_twice_fails() {
            let mut h = standing(Interval::OneMinute);
            h.engine.acknowledge().unwrap();

            assert!(h.engine.acknowledge().is_err());
            assert_eq!(h.streak(), 1);
        }

        #[test]
        fn test_dismiss_prompt_clears_streak() {
            let mut h = standing(Interval::OneMinute);
            h.engine.stats().record_completed().unwrap();

            h.engine.dismiss_prompt().unwrap();

            assert_eq!(h.streak(), 0);
            assert!(!h.engine.state().pending_acknowledgement);
            assert_eq!(h.engine.state().phase, ReminderPhase::Standing);
        }

        #[test]
        fn test_streak_counts_consecutive_acknowledgements() {
            let mut h = harness(Interval::OneMinute);

            for expected in 1..=3 {
                h.ticks(60);
                assert_eq!(h.engine.state().phase, ReminderPhase::Standing);
                assert_eq!(h.engine.acknowledge().unwrap(), expected);
                h.ticks(300);
            }

            let record = h.engine.stats().snapshot();
            assert_eq!(record.streak, 3);
            assert_eq!(record.best_streak, 3);
            assert_eq!(record.day(today()).prompts, 3);
            assert_eq!(record.day(today()).completed, 3);
        }

        #[test]
        fn test_standing_title() {
            let mut h = standing(Interval::OneMinute);
            h.ticks(1);

            let title = h.presenter.last_title().unwrap();
            assert_eq!(title.glyph, "🧍");
            assert_eq!(title.status_line, "Stand up time: 5m");
        }
    }

    // ------------------------------------------------------------------------
    // Snoozed phase
    // ------------------------------------------------------------------------

    mod snooze_tests {
        use super::*;

        #[test]
        fn test_snooze_records_at_entry() {
            let mut h = standing(Interval::OneMinute);

            h.engine.snooze().unwrap();

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Snoozed);
            assert_eq!(state.time_remaining, 300);
            assert_eq!(h.engine.stats().snapshot().day(today()).snoozed, 1);
            assert_eq!(h.drain(), vec![ReminderEvent::SnoozeStarted]);
        }

        #[test]
        fn test_snooze_expiry_prompts_again() {
            let mut h = standing(Interval::OneMinute);
            h.engine.snooze().unwrap();
            h.drain();

            h.ticks(300);

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Standing);
            assert_eq!(state.time_remaining, 300);
            assert!(state.pending_acknowledgement);
            assert_eq!(
                h.drain(),
                vec![ReminderEvent::SnoozeEnded, ReminderEvent::StandPromptShown]
            );
            assert_eq!(h.engine.stats().snapshot().day(today()).prompts, 2);
        }

        #[test]
        fn test_snooze_does_not_touch_streak() {
            let mut h = standing(Interval::OneMinute);
            h.engine.stats().record_completed().unwrap();

            h.engine.snooze().unwrap();

            assert_eq!(h.streak(), 1);
        }

        #[test]
        fn test_acknowledge_while_snoozed() {
            let mut h = standing(Interval::OneMinute);
            h.engine.snooze().unwrap();

            assert_eq!(h.engine.acknowledge().unwrap(), 1);
            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Standing);
            assert!(!state.pending_acknowledgement);

            // the snooze no longer ends in a second prompt
            h.ticks(300);
            assert_eq!(h.engine.state().phase, ReminderPhase::Working);
            assert_eq!(h.streak(), 1);
            assert_eq!(h.engine.stats().snapshot().day(today()).prompts, 1);
        }

        #[test]
        fn test_cannot_snooze_confirmed_prompt() {
            let mut h = standing(Interval::OneMinute);
            h.engine.acknowledge().unwrap();

            assert!(h.engine.snooze().is_err());
            assert_eq!(h.engine.state().phase, ReminderPhase::Standing);
        }

        #[test]
        fn test_cannot_snooze_twice() {
            let mut h = standing(Interval::OneMinute);
            h.engine.snooze().unwrap();

            assert!(h.engine.snooze().is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Pause, reset, wake
    // ------------------------------------------------------------------------

    mod control_tests {
        use super::*;

        #[test]
        fn test_pause_suspends_ticks() {
            let mut h = harness(Interval::OneMinute);
            h.ticks(10);

            h.engine.toggle_pause().unwrap();
            h.ticks(100);

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Paused);
            assert_eq!(state.time_remaining, 50);
            assert_eq!(h.drain(), vec![ReminderEvent::Paused]);
        }

        #[test]
        fn test_resume_restarts_full_period() {
            let mut h = harness(Interval::OneMinute);
            h.ticks(10);
            h.engine.toggle_pause().unwrap();

            h.engine.toggle_pause().unwrap();

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Working);
            assert_eq!(state.time_remaining, 60);
        }

        #[test]
        fn test_reset_while_paused_fails() {
            let mut h = harness(Interval::OneMinute);
            h.engine.toggle_pause().unwrap();

            assert!(h.engine.reset().is_err());
        }

        #[test]
        fn test_reset_from_standing_clears_pending_streak() {
            let mut h = standing(Interval::OneMinute);
            h.engine.stats().record_completed().unwrap();

            h.engine.reset().unwrap();

            assert_eq!(h.engine.state().phase, ReminderPhase::Working);
            assert_eq!(h.engine.state().time_remaining, 60);
            assert_eq!(h.streak(), 0);
        }

        #[test]
        fn test_wake_resets_every_phase() {
            let mut h = standing(Interval::OneMinute);
            h.engine.snooze().unwrap();

            h.engine.wake().unwrap();

            let state = h.engine.state();
            assert_eq!(state.phase, ReminderPhase::Working);
            assert_eq!(state.time_remaining, 60);
            assert!(h.drain().contains(&ReminderEvent::Woke));

            h.engine.toggle_pause().unwrap();
            h.engine.wake().unwrap();
            assert_eq!(h.engine.state().phase, ReminderPhase::Working);
        }

        #[test]
        fn test_wake_after_acknowledged_prompt_keeps_streak() {
            let mut h = standing(Interval::OneMinute);
            h.engine.acknowledge().unwrap();

            h.engine.wake().unwrap();

            assert_eq!(h.streak(), 1);
        }

        #[test]
        fn test_notification_failure_does_not_stop_engine() {
            let mut h = harness(Interval::OneMinute);
            h.presenter.set_should_fail(true);

            h.ticks(60);

            assert_eq!(h.engine.state().phase, ReminderPhase::Standing);
        }

        #[test]
        fn test_closed_event_channel_is_an_error() {
            let mut h = harness(Interval::OneMinute);
            let Harness { engine, rx, .. } = &mut h;
            drop(std::mem::replace(rx, mpsc::unbounded_channel().1));

            assert!(engine.tick().is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Persistence failures
    // ------------------------------------------------------------------------

    mod persistence_failure_tests {
        use super::*;
        use std::fs;

        #[test]
        fn test_stats_write_failure_propagates() {
            let dir = tempfile::tempdir().unwrap();
            let blocker = dir.path().join("blocker");
            fs::write(&blocker, "").unwrap();
            let stats = StatsTracker::with_date_source(blocker.join(STATS_FILE), today);
            let presenter = Arc::new(MockPresenter::new());
            let (tx, _rx) = mpsc::unbounded_channel();
            let mut engine = ReminderEngine::new(Interval::OneMinute, stats, presenter, tx);
            engine.state_mut().time_remaining = 1;

            let result = engine.tick();

            assert!(result.is_err());
            assert_eq!(engine.state().phase, ReminderPhase::Working);
        }
    }
}
