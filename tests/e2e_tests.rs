//! End-to-End Tests for the stand-up reminder.
//!
//! These tests drive complete user workflows through the public library API
//! with a recording presenter and a temporary data directory:
//! - Work period → stand prompt → "I moved" → back to work
//! - Missed prompt resets the streak
//! - Snooze and re-prompt
//! - Pause / resume
//! - Statistics and configuration survive a restart

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use standup::presenter::{MockPresenter, NotificationKind};
use standup::stats::{StatsTracker, STATS_FILE};
use standup::store::ConfigStore;
use standup::{Interval, ReminderEngine, ReminderEvent, ReminderPhase};

// ============================================================================
// Test Helpers
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

struct Session {
    engine: ReminderEngine,
    events: mpsc::UnboundedReceiver<ReminderEvent>,
    presenter: Arc<MockPresenter>,
}

impl Session {
    fn start(dir: &Path, interval: Interval) -> Self {
        let stats = StatsTracker::with_date_source(dir.join(STATS_FILE), today);
        let presenter = Arc::new(MockPresenter::new());
        let (tx, events) = mpsc::unbounded_channel();
        let engine = ReminderEngine::new(interval, stats, presenter.clone(), tx);
        Self {
            engine,
            events,
            presenter,
        }
    }

    fn run_for(&mut self, seconds: i64) {
        for _ in 0..seconds {
            self.engine.tick().unwrap();
        }
    }

    fn transitions(&mut self) -> Vec<ReminderEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if !matches!(event, ReminderEvent::Tick { .. }) {
                out.push(event);
            }
        }
        out
    }
}

// ============================================================================
// Full cycle
// ============================================================================

#[test]
fn test_complete_stand_up_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::start(dir.path(), Interval::OneMinute);

    // Work period
    session.run_for(60);
    assert_eq!(session.engine.state().phase, ReminderPhase::Standing);
    assert_eq!(session.engine.state().time_remaining, 300);
    assert_eq!(
        session.presenter.last_title().unwrap().status_line,
        "Stand up time: 5m"
    );

    // User stands and confirms
    assert_eq!(session.engine.acknowledge().unwrap(), 1);

    // Standing period
    session.run_for(300);
    assert_eq!(session.engine.state().phase, ReminderPhase::Working);
    assert_eq!(session.engine.state().time_remaining, 60);

    assert_eq!(
        session.transitions(),
        vec![
            ReminderEvent::StandPromptShown,
            ReminderEvent::Acknowledged { streak: 1 },
            ReminderEvent::StandingEnded { acknowledged: true },
        ]
    );
    assert_eq!(
        session.presenter.notification_kinds(),
        vec![NotificationKind::StandUp, NotificationKind::SitDown]
    );

    let record = session.engine.stats().snapshot();
    assert_eq!(record.streak, 1);
    assert_eq!(record.day(today()).prompts, 1);
    assert_eq!(record.day(today()).completed, 1);
}

#[test]
fn test_missed_prompt_resets_streak() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::start(dir.path(), Interval::OneMinute);

    for _ in 0..3 {
        session.run_for(60);
        session.engine.acknowledge().unwrap();
        session.run_for(300);
    }
    assert_eq!(session.engine.stats().snapshot().streak, 3);

    // This one goes unanswered
    session.run_for(60 + 300);

    let record = session.engine.stats().snapshot();
    assert_eq!(record.streak, 0);
    assert_eq!(record.best_streak, 3);
    assert_eq!(record.day(today()).best_streak, 3);
    assert_eq!(record.day(today()).prompts, 4);
    assert!(session.transitions().contains(&ReminderEvent::StreakCleared));
}

// ============================================================================
// Snooze
// ============================================================================

#[test]
fn test_snooze_then_confirm() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::start(dir.path(), Interval::OneMinute);

    session.run_for(60);
    session.engine.snooze().unwrap();
    assert_eq!(session.presenter.last_title().unwrap().glyph, "😴");

    session.run_for(300);
    assert_eq!(session.engine.state().phase, ReminderPhase::Standing);

    session.engine.acknowledge().unwrap();
    session.run_for(300);

    let day = session.engine.stats().snapshot().day(today());
    assert_eq!(day.prompts, 2);
    assert_eq!(day.snoozed, 1);
    assert_eq!(day.completed, 1);
    assert_eq!(session.engine.state().phase, ReminderPhase::Working);
}

#[test]
fn test_confirm_during_snooze_keeps_streak() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::start(dir.path(), Interval::OneMinute);

    session.run_for(60);
    session.engine.snooze().unwrap();
    session.run_for(100);
    assert_eq!(session.engine.acknowledge().unwrap(), 1);

    session.run_for(300);

    let record = session.engine.stats().snapshot();
    assert_eq!(record.streak, 1);
    assert_eq!(record.day(today()).prompts, 1);
    assert_eq!(session.engine.state().phase, ReminderPhase::Working);
    assert!(!session
        .transitions()
        .contains(&ReminderEvent::StreakCleared));
}

// ============================================================================
// Pause / resume
// ============================================================================

#[test]
fn test_pause_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::start(dir.path(), Interval::ThirtyMinutes);

    session.run_for(600);
    session.engine.toggle_pause().unwrap();
    session.run_for(3600);

    assert_eq!(session.engine.state().phase, ReminderPhase::Paused);
    assert_eq!(
        session.presenter.last_title().unwrap().status_line,
        "Reminders paused"
    );

    session.engine.toggle_pause().unwrap();
    assert_eq!(session.engine.state().time_remaining, 1800);
    assert_eq!(session.engine.stats().snapshot().day(today()).prompts, 0);
}

// ============================================================================
// Persistence across restarts
// ============================================================================

#[test]
fn test_stats_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut session = Session::start(dir.path(), Interval::OneMinute);
        session.run_for(60);
        session.engine.acknowledge().unwrap();
    }

    let session = Session::start(dir.path(), Interval::OneMinute);
    let record = session.engine.stats().snapshot();
    assert_eq!(record.streak, 1);
    assert_eq!(record.day(today()).completed, 1);
    // Timer state is not persisted
    assert_eq!(session.engine.state().phase, ReminderPhase::Working);
    assert!(!session.engine.state().pending_acknowledgement);
}

#[test]
fn test_interval_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ConfigStore::open_in(dir.path());
    config.set_interval(Interval::OneHour).unwrap();

    let config = ConfigStore::open_in(dir.path());
    let session = Session::start(dir.path(), config.interval());

    assert_eq!(session.engine.state().work_duration, 3600);
    assert_eq!(
        session.presenter.last_title().unwrap().status_line,
        "Time until standing up: 60m"
    );
}

#[test]
fn test_corrupt_files_start_fresh() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join(STATS_FILE), "[1, 2").unwrap();

    let config = ConfigStore::open_in(dir.path());
    assert_eq!(config.interval(), Interval::ThirtyMinutes);

    let mut session = Session::start(dir.path(), config.interval());
    session.engine.force_prompt().unwrap();
    assert_eq!(session.engine.stats().snapshot().day(today()).prompts, 1);
}
