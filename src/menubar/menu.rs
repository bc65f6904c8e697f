//! Menu building and item state management for the menu bar.
//!
//! This module handles:
//! - Menu item configuration and state
//! - Determining which menu items are enabled for the current phase
//!
//! The configuration logic is platform-independent and fully testable.
//! Actual menu creation using tray-icon is done in the platform-specific code.

use crate::stats::StatsSummary;
use crate::types::{Interval, ReminderPhase};

use super::event::MenuItemId;
use super::icon::StatusView;

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Identifier of the item
    pub id: MenuItemId,
    /// Display text for the menu item
    pub text: String,
    /// Whether the menu item is enabled (clickable)
    pub enabled: bool,
    /// Check mark state (interval entries only)
    pub checked: bool,
}

impl MenuItemConfig {
    /// Creates a new menu item configuration.
    pub fn new(id: MenuItemId, text: impl Into<String>, enabled: bool) -> Self {
        Self {
            id,
            text: text.into(),
            enabled,
            checked: false,
        }
    }

    fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Countdown line (disabled)
    pub status: MenuItemConfig,
    /// Streak line (disabled)
    pub streak: MenuItemConfig,
    /// Transient notice line (disabled), if any
    pub notice: Option<MenuItemConfig>,
    /// Submenu title
    pub interval_title: String,
    /// Interval entries, one checked
    pub intervals: Vec<MenuItemConfig>,
    /// "I moved" button
    pub acknowledge: MenuItemConfig,
    /// "Skip this one" button
    pub dismiss: MenuItemConfig,
    /// Snooze button
    pub snooze: MenuItemConfig,
    /// Pause / resume button
    pub toggle_pause: MenuItemConfig,
    /// Reset button
    pub reset: MenuItemConfig,
    /// Check for updates button
    pub check_updates: MenuItemConfig,
    /// Quit button (always enabled)
    pub quit: MenuItemConfig,
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds the menu configuration from the reminder view.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    /// Creates a new MenuBuilder.
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete menu configuration.
    pub fn build(
        &self,
        view: &StatusView,
        stats: Option<&StatsSummary>,
        notice: Option<&str>,
    ) -> MenuConfig {
        let paused = view.phase == ReminderPhase::Paused;

        MenuConfig {
            status: MenuItemConfig::new(MenuItemId::Status, view.status_line.clone(), false),
            streak: MenuItemConfig::new(MenuItemId::Streak, Self::streak_text(stats), false),
            notice: notice.map(|text| MenuItemConfig::new(MenuItemId::Unknown, text, false)),
            interval_title: "Remind me every...".to_string(),
            intervals: Interval::ALL
                .iter()
                .map(|interval| {
                    MenuItemConfig::new(MenuItemId::Interval(*interval), interval.name(), true)
                        .checked(*interval == view.interval)
                })
                .collect(),
            acknowledge: MenuItemConfig::new(
                MenuItemId::Acknowledge,
                "I moved ✓",
                view.pending_acknowledgement,
            ),
            dismiss: MenuItemConfig::new(
                MenuItemId::Dismiss,
                "Skip this one",
                view.pending_acknowledgement,
            ),
            snooze: MenuItemConfig::new(
                MenuItemId::Snooze,
                "Snooze 5 minutes",
                view.phase == ReminderPhase::Standing && view.pending_acknowledgement,
            ),
            toggle_pause: MenuItemConfig::new(
                MenuItemId::TogglePause,
                if paused { "Resume Reminders" } else { "Pause Reminders" },
                true,
            ),
            reset: MenuItemConfig::new(MenuItemId::Reset, "Reset Reminder", !paused),
            check_updates: MenuItemConfig::new(
                MenuItemId::CheckForUpdates,
                "Check for Updates...",
                true,
            ),
            quit: MenuItemConfig::new(MenuItemId::Quit, "Quit", true),
        }
    }

    fn streak_text(stats: Option<&StatsSummary>) -> String {
        match stats {
            Some(stats) => format!(
                "Streak: {} (best {}) · today {}/{}",
                stats.streak, stats.best_streak, stats.today.completed, stats.today.prompts
            ),
            None => "Streak: 0".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
