//! Reminder daemon.
//!
//! This module contains the long-running side of the reminder:
//! - `engine`: state machine with phase transitions and countdown logic
//! - `app`: run loop joining the engine, configuration, and updates
//! - `settings`: non-persisted runtime settings
//! - `wake`: sleep/wake detection from wall-clock gaps

pub mod app;
pub mod engine;
pub mod settings;
pub mod wake;

pub use app::{App, ReminderCommand};
pub use engine::{ReminderEngine, ReminderEvent};
pub use settings::RunSettings;
pub use wake::WakeDetector;
