//! Event handling for menu bar interactions.
//!
//! This module handles:
//! - Mapping menu item ids to user actions
//! - The update messages sent from the reminder loop to the tray icon
//!
//! Menu item ids are plain strings so they survive the round trip through
//! tray-icon's `MenuId`.

use std::fmt;

use crate::stats::StatsSummary;
use crate::types::Interval;

use super::icon::StatusView;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Switch to another work interval
    SelectInterval(Interval),
    /// Postpone the stand-up prompt
    Snooze,
    /// Confirm the stand-up ("I moved")
    Acknowledge,
    /// Close the stand-up prompt without moving
    Dismiss,
    /// Pause or resume reminders
    TogglePause,
    /// Restart the work countdown
    Reset,
    /// Look for a newer version
    CheckForUpdates,
    /// Quit the app
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::SelectInterval(interval) => write!(f, "interval:{}", interval),
            MenuAction::Snooze => write!(f, "snooze"),
            MenuAction::Acknowledge => write!(f, "acknowledge"),
            MenuAction::Dismiss => write!(f, "dismiss"),
            MenuAction::TogglePause => write!(f, "toggle_pause"),
            MenuAction::Reset => write!(f, "reset"),
            MenuAction::CheckForUpdates => write!(f, "check_updates"),
            MenuAction::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// Countdown line (informational)
    Status,
    /// Streak line (informational)
    Streak,
    /// One entry of the interval submenu
    Interval(Interval),
    /// Snooze item
    Snooze,
    /// "I moved" item
    Acknowledge,
    /// "Skip this one" item
    Dismiss,
    /// Pause / resume item
    TogglePause,
    /// Reset item
    Reset,
    /// Check for updates item
    CheckForUpdates,
    /// Quit item
    Quit,
    /// Unknown or unhandled menu item
    Unknown,
}

impl MenuItemId {
    /// Returns the string id used for the native menu item.
    pub fn as_id(&self) -> String {
        match self {
            MenuItemId::Status => "status".to_string(),
            MenuItemId::Streak => "streak".to_string(),
            MenuItemId::Interval(interval) => format!("interval:{}", interval.name()),
            MenuItemId::Snooze => "snooze".to_string(),
            MenuItemId::Acknowledge => "acknowledge".to_string(),
            MenuItemId::Dismiss => "dismiss".to_string(),
            MenuItemId::TogglePause => "toggle_pause".to_string(),
            MenuItemId::Reset => "reset".to_string(),
            MenuItemId::CheckForUpdates => "check_updates".to_string(),
            MenuItemId::Quit => "quit".to_string(),
            MenuItemId::Unknown => "unknown".to_string(),
        }
    }

    /// Parses a native menu item id.
    pub fn parse(id: &str) -> Self {
        if let Some(name) = id.strip_prefix("interval:") {
            return Interval::from_name(name)
                .map(MenuItemId::Interval)
                .unwrap_or(MenuItemId::Unknown);
        }
        match id {
            "status" => MenuItemId::Status,
            "streak" => MenuItemId::Streak,
            "snooze" => MenuItemId::Snooze,
            "acknowledge" => MenuItemId::Acknowledge,
            "dismiss" => MenuItemId::Dismiss,
            "toggle_pause" => MenuItemId::TogglePause,
            "reset" => MenuItemId::Reset,
            "check_updates" => MenuItemId::CheckForUpdates,
            "quit" => MenuItemId::Quit,
            _ => MenuItemId::Unknown,
        }
    }

    /// Converts a menu item id to the corresponding action.
    ///
    /// Informational lines have no action.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Interval(interval) => Some(MenuAction::SelectInterval(*interval)),
            MenuItemId::Snooze => Some(MenuAction::Snooze),
            MenuItemId::Acknowledge => Some(MenuAction::Acknowledge),
            MenuItemId::Dismiss => Some(MenuAction::Dismiss),
            MenuItemId::TogglePause => Some(MenuAction::TogglePause),
            MenuItemId::Reset => Some(MenuAction::Reset),
            MenuItemId::CheckForUpdates => Some(MenuAction::CheckForUpdates),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Status | MenuItemId::Streak | MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Turns raw menu clicks into actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Creates a new EventHandler.
    pub fn new() -> Self {
        Self
    }

    /// Processes a menu item click and returns the corresponding action.
    pub fn handle_click(&self, raw_id: &str) -> Option<MenuAction> {
        let action = MenuItemId::parse(raw_id).to_action();
        match action {
            Some(ref action) => tracing::info!(action = %action, "Menu action"),
            None => tracing::debug!(id = raw_id, "Ignoring click on inactive menu item"),
        }
        action
    }
}

// ============================================================================
// TrayUpdate
// ============================================================================

/// Updates sent from the reminder loop to the tray icon.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// New countdown view
    SetView(StatusView),
    /// New streak figures
    SetStats(StatsSummary),
    /// Show a transient notice line in the menu
    ShowNotice(String),
    /// Remove the notice line
    ClearNotice,
    /// Shutdown the tray icon
    Shutdown,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod menu_item_id_tests {
        use super::*;

        #[test]
        fn test_id_round_trip() {
            let ids = [
                MenuItemId::Status,
                MenuItemId::Streak,
                MenuItemId::Interval(Interval::OneHour),
                MenuItemId::Snooze,
                MenuItemId::Acknowledge,
                MenuItemId::Dismiss,
                MenuItemId::TogglePause,
                MenuItemId::Reset,
                MenuItemId::CheckForUpdates,
                MenuItemId::Quit,
            ];
            for id in ids {
                assert_eq!(MenuItemId::parse(&id.as_id()), id);
            }
        }

        #[test]
        fn test_parse_unknown() {
            assert_eq!(MenuItemId::parse("nope"), MenuItemId::Unknown);
            assert_eq!(MenuItemId::parse("interval:2 days"), MenuItemId::Unknown);
        }

        #[test]
        fn test_informational_items_have_no_action() {
            assert_eq!(MenuItemId::Status.to_action(), None);
            assert_eq!(MenuItemId::Streak.to_action(), None);
            assert_eq!(MenuItemId::Unknown.to_action(), None);
        }

        #[test]
        fn test_interval_item_action() {
            assert_eq!(
                MenuItemId::Interval(Interval::OneMinute).to_action(),
                Some(MenuAction::SelectInterval(Interval::OneMinute))
            );
        }
    }

    mod event_handler_tests {
        use super::*;

        #[test]
        fn test_handle_click() {
            let handler = EventHandler::new();

            assert_eq!(handler.handle_click("snooze"), Some(MenuAction::Snooze));
            assert_eq!(
                handler.handle_click("interval:30 minutes"),
                Some(MenuAction::SelectInterval(Interval::ThirtyMinutes))
            );
            assert_eq!(handler.handle_click("dismiss"), Some(MenuAction::Dismiss));
            assert_eq!(handler.handle_click("status"), None);
        }

        #[test]
        fn test_action_display() {
            assert_eq!(MenuAction::TogglePause.to_string(), "toggle_pause");
            assert_eq!(
                MenuAction::SelectInterval(Interval::OneMinute).to_string(),
                "interval:1 minute"
            );
        }
    }
}
