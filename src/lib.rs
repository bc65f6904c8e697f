//! Stand-Up Reminder Library
//!
//! This library provides the core functionality for the stand-up reminder.
//! It includes:
//! - Reminder engine and run loop (Working, Standing, Snoozed, Paused)
//! - Streak statistics and flat JSON persistence
//! - Self-update from a remote version manifest
//! - Presentation port with desktop and test implementations
//! - Native notifications with action buttons (macOS only)
//! - Menu bar UI with tray icon (macOS only)
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod menubar;
pub mod notification;
pub mod presenter;
pub mod stats;
pub mod store;
pub mod types;
pub mod update;

// Re-export commonly used types for convenience
pub use types::{Interval, ReminderPhase, ReminderState, SNOOZE_SECONDS, STANDING_SECONDS};

pub use daemon::{App, ReminderCommand, ReminderEngine, ReminderEvent, RunSettings};

pub use presenter::{
    DesktopPresenter, MockPresenter, Notification, NotificationKind, Presenter, PresenterError,
    Prompt, PromptAnswer,
};

pub use notification::{run_notifier, Delivery, NotificationActionEvent, NotificationError};

pub use stats::{DayTally, StatsRecord, StatsSummary, StatsTracker};

pub use store::{AppConfig, ConfigStore, StoreError};

pub use update::{
    compare_versions, CheckOutcome, Manifest, UpdateChecker, UpdateError, UpdateService, Version,
};

// Re-export menubar types
pub use menubar::{
    EventHandler, IconManager, MenuAction, MenuBuilder, MenuConfig, MenuItemConfig, MenuItemId,
    StatusView, TrayIconManager, TrayUpdate,
};
