//! Core data types for the stand-up reminder.
//!
//! This module defines the data structures used for:
//! - The fixed table of reminder intervals
//! - The reminder phase and countdown state
//!
//! The countdown state is never persisted; it is rebuilt from the configured
//! interval at every start and every wake.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of the stand-up countdown that follows every work period.
pub const STANDING_SECONDS: i64 = 5 * 60;

/// Length of a snooze.
pub const SNOOZE_SECONDS: i64 = 5 * 60;

// ============================================================================
// Interval
// ============================================================================

/// Work interval presets offered in the "Remind me every..." menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    /// 1 minute, mostly useful for trying the app out
    OneMinute,
    /// 30 minutes
    #[default]
    ThirtyMinutes,
    /// 1 hour
    OneHour,
}

impl Interval {
    /// Every interval, in menu order.
    pub const ALL: [Interval; 3] = [
        Interval::OneMinute,
        Interval::ThirtyMinutes,
        Interval::OneHour,
    ];

    /// Returns the persisted name of the interval (also its menu label).
    pub fn name(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1 minute",
            Interval::ThirtyMinutes => "30 minutes",
            Interval::OneHour => "1 hour",
        }
    }

    /// Returns the work duration in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Interval::OneMinute => 60,
            Interval::ThirtyMinutes => 30 * 60,
            Interval::OneHour => 60 * 60,
        }
    }

    /// Looks an interval up by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.name() == name)
    }

    /// Resolves a possibly missing or unknown name, falling back to the default.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or_default()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(Interval::name).collect();
            format!("unknown interval '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

// ============================================================================
// ReminderPhase
// ============================================================================

/// Represents the current phase of the reminder countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPhase {
    /// Counting down the work interval
    #[default]
    Working,
    /// Counting down the stand-up period
    Standing,
    /// Stand-up prompt postponed
    Snoozed,
    /// Ticking suspended by the user
    Paused,
}

impl ReminderPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderPhase::Working => "working",
            ReminderPhase::Standing => "standing",
            ReminderPhase::Snoozed => "snoozed",
            ReminderPhase::Paused => "paused",
        }
    }

    /// Returns true if the tick advances the countdown in this phase.
    pub fn is_ticking(&self) -> bool {
        !matches!(self, ReminderPhase::Paused)
    }
}

// ============================================================================
// ReminderState
// ============================================================================

/// Countdown state owned by the reminder engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderState {
    /// Current phase
    pub phase: ReminderPhase,
    /// Seconds left in the current phase (may dip below zero before a transition)
    pub time_remaining: i64,
    /// Seconds in one work period
    pub work_duration: i64,
    /// True between a stand prompt and the user's explicit confirmation
    pub pending_acknowledgement: bool,
}

impl ReminderState {
    /// Creates a fresh Working state for the given interval.
    pub fn new(interval: Interval) -> Self {
        Self {
            phase: ReminderPhase::Working,
            time_remaining: interval.seconds(),
            work_duration: interval.seconds(),
            pending_acknowledgement: false,
        }
    }

    /// Switches the work duration and restarts the work countdown.
    pub fn set_interval(&mut self, interval: Interval) {
        self.work_duration = interval.seconds();
        self.start_working();
    }

    /// Restarts the work countdown at full duration.
    pub fn start_working(&mut self) {
        self.phase = ReminderPhase::Working;
        self.time_remaining = self.work_duration;
    }

    /// Starts the stand-up countdown and marks the prompt as unacknowledged.
    pub fn start_standing(&mut self) {
        self.phase = ReminderPhase::Standing;
        self.time_remaining = STANDING_SECONDS;
        self.pending_acknowledgement = true;
    }

    /// Starts a snooze.
    pub fn start_snooze(&mut self) {
        self.phase = ReminderPhase::Snoozed;
        self.time_remaining = SNOOZE_SECONDS;
    }

    /// Marks the prompt as confirmed.
    ///
    /// A confirmation during a snooze ends it and starts a full standing
    /// period.
    pub fn confirm(&mut self) {
        self.pending_acknowledgement = false;
        if self.phase == ReminderPhase::Snoozed {
            self.phase = ReminderPhase::Standing;
            self.time_remaining = STANDING_SECONDS;
        }
    }

    /// Suspends the countdown.
    pub fn pause(&mut self) {
        self.phase = ReminderPhase::Paused;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the current phase has run out. Paused never runs out.
    pub fn tick(&mut self) -> bool {
        if !self.phase.is_ticking() {
            return false;
        }
        self.time_remaining -= 1;
        self.time_remaining <= 0
    }

    /// Remaining whole minutes, rounded up, never negative.
    pub fn minutes_remaining(&self) -> i64 {
        (self.time_remaining.max(0) + 59) / 60
    }

    /// Returns true if the tick is suspended.
    pub fn is_paused(&self) -> bool {
        self.phase == ReminderPhase::Paused
    }
}

// ============================================================================
// Tests
// ============================================================================
