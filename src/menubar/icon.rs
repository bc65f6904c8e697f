//! Glyph and status text for the menu bar.
//!
//! This module handles:
//! - Choosing the menu bar glyph for each phase (🪑 while sitting, 🧍 while standing)
//! - Formatting the countdown line shown at the top of the menu
//!
//! Minutes are always rounded up, so the line never reads "0m" while time is left.

use crate::types::{Interval, ReminderPhase, ReminderState};

// ============================================================================
// Constants
// ============================================================================

/// Glyph while working
const WORKING_GLYPH: &str = "🪑";

/// Glyph while standing
const STANDING_GLYPH: &str = "🧍";

/// Glyph while snoozed
const SNOOZED_GLYPH: &str = "😴";

/// Glyph while paused
const PAUSED_GLYPH: &str = "⏸";

// ============================================================================
// StatusView
// ============================================================================

/// What the menu bar should show for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Phase the view was rendered from
    pub phase: ReminderPhase,
    /// Menu bar title glyph
    pub glyph: &'static str,
    /// Countdown line, e.g. "Time until standing up: 12m"
    pub status_line: String,
    /// Interval currently selected
    pub interval: Interval,
    /// Whether the current stand prompt still awaits "I moved"
    pub pending_acknowledgement: bool,
}

impl StatusView {
    /// Renders the view for `state`.
    pub fn new(state: &ReminderState, interval: Interval) -> Self {
        Self {
            phase: state.phase,
            glyph: IconManager::glyph(state.phase),
            status_line: IconManager::status_line(state),
            interval,
            pending_acknowledgement: state.pending_acknowledgement,
        }
    }
}

// ============================================================================
// IconManager
// ============================================================================

/// Tracks the last rendered phase so the glyph is only swapped on change.
#[derive(Debug, Default)]
pub struct IconManager {
    last_phase: Option<ReminderPhase>,
}

impl IconManager {
    /// Creates a new IconManager.
    pub fn new() -> Self {
        Self { last_phase: None }
    }

    /// Returns the glyph for a phase.
    pub fn glyph(phase: ReminderPhase) -> &'static str {
        match phase {
            ReminderPhase::Working => WORKING_GLYPH,
            ReminderPhase::Standing => STANDING_GLYPH,
            ReminderPhase::Snoozed => SNOOZED_GLYPH,
            ReminderPhase::Paused => PAUSED_GLYPH,
        }
    }

    /// Formats the countdown line.
    pub fn status_line(state: &ReminderState) -> String {
        let minutes = state.minutes_remaining();
        match state.phase {
            ReminderPhase::Working => format!("Time until standing up: {}m", minutes),
            ReminderPhase::Standing => format!("Stand up time: {}m", minutes),
            ReminderPhase::Snoozed => format!("Snoozed: {}m", minutes),
            ReminderPhase::Paused => "Reminders paused".to_string(),
        }
    }

    /// Returns true, and remembers the phase, if it differs from the last call.
    pub fn phase_changed(&mut self, phase: ReminderPhase) -> bool {
        let changed = self.last_phase != Some(phase);
        if changed {
            self.last_phase = Some(phase);
        }
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod glyph_tests {
        use super::*;

        #[test]
        fn test_glyph_per_phase() {
            assert_eq!(IconManager::glyph(ReminderPhase::Working), "🪑");
            assert_eq!(IconManager::glyph(ReminderPhase::Standing), "🧍");
            assert_eq!(IconManager::glyph(ReminderPhase::Snoozed), "😴");
            assert_eq!(IconManager::glyph(ReminderPhase::Paused), "⏸");
        }

        #[test]
        fn test_phase_changed() {
            let mut manager = IconManager::new();

            assert!(manager.phase_changed(ReminderPhase::Working));
            assert!(!manager.phase_changed(ReminderPhase::Working));
            assert!(manager.phase_changed(ReminderPhase::Standing));
        }
    }

    mod status_line_tests {
        use super::*;

        #[test]
        fn test_working_full_interval() {
            let state = ReminderState::new(Interval::ThirtyMinutes);
            assert_eq!(IconManager::status_line(&state), "Time until standing up: 30m");
        }

        #[test]
        fn test_working_rounds_up() {
            let mut state = ReminderState::new(Interval::ThirtyMinutes);
            state.time_remaining = 29 * 60 + 1;
            assert_eq!(IconManager::status_line(&state), "Time until standing up: 30m");
        }

        #[test]
        fn test_standing() {
            let mut state = ReminderState::new(Interval::OneMinute);
            state.start_standing();
            assert_eq!(IconManager::status_line(&state), "Stand up time: 5m");
        }

        #[test]
        fn test_snoozed() {
            let mut state = ReminderState::new(Interval::OneMinute);
            state.start_snooze();
            state.time_remaining = 90;
            assert_eq!(IconManager::status_line(&state), "Snoozed: 2m");
        }

        #[test]
        fn test_paused() {
            let mut state = ReminderState::new(Interval::OneMinute);
            state.pause();
            assert_eq!(IconManager::status_line(&state), "Reminders paused");
        }

        #[test]
        fn test_view() {
            let mut state = ReminderState::new(Interval::OneHour);
            state.start_standing();

            let view = StatusView::new(&state, Interval::OneHour);
            assert_eq!(view.glyph, "🧍");
            assert_eq!(view.phase, ReminderPhase::Standing);
            assert_eq!(view.interval, Interval::OneHour);
            assert!(view.pending_acknowledgement);
        }
    }
}
