//! Notification action and category definitions.
//!
//! Two categories carry buttons: the stand-up prompt ("I moved" / "Snooze")
//! and the update offer ("Install" / "Later"). Both ask the system to report
//! a dismissal, which is how an ignored stand-up clears the streak.

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_foundation::{NSArray, NSString};
#[cfg(target_os = "macos")]
use objc2_user_notifications::{
    UNNotificationAction, UNNotificationActionOptions, UNNotificationCategory,
    UNNotificationCategoryOptions,
};

use crate::presenter::NotificationKind;

/// Notification action identifiers.
pub mod action_ids {
    /// "I moved" on a stand-up prompt.
    pub const MOVED: &str = "MOVED_ACTION";
    /// "Snooze" on a stand-up prompt.
    pub const SNOOZE: &str = "SNOOZE_ACTION";
    /// "Install" on an update offer.
    pub const INSTALL: &str = "INSTALL_ACTION";
    /// "Later" on an update offer.
    pub const LATER: &str = "LATER_ACTION";
    /// The notification body was clicked.
    pub const DEFAULT: &str = "com.apple.UNNotificationDefaultActionIdentifier";
    /// The notification was closed without choosing an action.
    pub const DISMISS: &str = "com.apple.UNNotificationDismissActionIdentifier";
}

/// Notification category identifiers.
pub mod category_ids {
    /// Stand-up prompts.
    pub const STAND_UP: &str = "STAND_UP";
    /// Update offers.
    pub const UPDATE_OFFER: &str = "UPDATE_OFFER";
}

/// Returns the category whose buttons a notification of `kind` shows.
#[must_use]
pub fn category_for(kind: NotificationKind) -> Option<&'static str> {
    match kind {
        NotificationKind::StandUp => Some(category_ids::STAND_UP),
        NotificationKind::UpdateOffer => Some(category_ids::UPDATE_OFFER),
        _ => None,
    }
}

#[cfg(target_os = "macos")]
fn create_action(
    identifier: &str,
    title: &str,
    options: UNNotificationActionOptions,
) -> Retained<UNNotificationAction> {
    let identifier = NSString::from_str(identifier);
    let title = NSString::from_str(title);

    unsafe { UNNotificationAction::actionWithIdentifier_title_options(&identifier, &title, options) }
}

/// Creates a category that reports dismissals.
#[cfg(target_os = "macos")]
fn create_category(
    identifier: &str,
    actions: &[Retained<UNNotificationAction>],
) -> Retained<UNNotificationCategory> {
    let identifier = NSString::from_str(identifier);

    let actions_array: Retained<NSArray<UNNotificationAction>> = unsafe {
        let refs: Vec<&UNNotificationAction> = actions.iter().map(|a| a.as_ref()).collect();
        NSArray::from_slice(&refs)
    };

    let intent_identifiers: Retained<NSArray<NSString>> =
        unsafe { NSArray::from_slice(&[] as &[&NSString]) };

    unsafe {
        UNNotificationCategory::categoryWithIdentifier_actions_intentIdentifiers_options(
            &identifier,
            &actions_array,
            &intent_identifiers,
            UNNotificationCategoryOptions::CustomDismissAction,
        )
    }
}

/// Creates every notification category.
#[cfg(target_os = "macos")]
#[must_use]
pub fn create_categories() -> Vec<Retained<UNNotificationCategory>> {
    let stand_up = [
        create_action(action_ids::MOVED, "I moved ✓", UNNotificationActionOptions::empty()),
        create_action(action_ids::SNOOZE, "Snooze 5 minutes", UNNotificationActionOptions::empty()),
    ];
    let update_offer = [
        create_action(action_ids::INSTALL, "Install", UNNotificationActionOptions::Foreground),
        create_action(action_ids::LATER, "Later", UNNotificationActionOptions::empty()),
    ];

    vec![
        create_category(category_ids::STAND_UP, &stand_up),
        create_category(category_ids::UPDATE_OFFER, &update_offer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ids() {
        assert_eq!(action_ids::MOVED, "MOVED_ACTION");
        assert_eq!(action_ids::SNOOZE, "SNOOZE_ACTION");
        assert_eq!(action_ids::INSTALL, "INSTALL_ACTION");
        assert_eq!(action_ids::LATER, "LATER_ACTION");
    }

    #[test]
    fn test_only_prompts_carry_buttons() {
        assert_eq!(category_for(NotificationKind::StandUp), Some(category_ids::STAND_UP));
        assert_eq!(
            category_for(NotificationKind::UpdateOffer),
            Some(category_ids::UPDATE_OFFER)
        );
        assert_eq!(category_for(NotificationKind::SitDown), None);
        assert_eq!(category_for(NotificationKind::UpdateAvailable), None);
    }

    // Creating UNNotificationCategory objects needs a signed macOS binary.
}
