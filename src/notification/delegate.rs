//! Notification delegate implementation.
//!
//! Implements `UNUserNotificationCenterDelegate` so that button clicks,
//! body clicks, and dismissals come back to the run loop.

use std::sync::mpsc::Sender;

use block2::Block;
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2::{define_class, msg_send, DefinedClass, MainThreadMarker, MainThreadOnly};
use objc2_foundation::{NSObject, NSObjectProtocol};
use objc2_user_notifications::{
    UNNotification, UNNotificationPresentationOptions, UNNotificationResponse,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};

use super::NotificationActionEvent;

/// Instance variables for the notification delegate.
#[derive(Clone)]
pub struct NotificationDelegateIvars {
    action_sender: Sender<NotificationActionEvent>,
}

define_class!(
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `NotificationDelegate` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[ivars = NotificationDelegateIvars]
    #[name = "StandupNotificationDelegate"]
    #[thread_kind = MainThreadOnly]
    pub struct NotificationDelegate;

    impl NotificationDelegate {}

    unsafe impl NSObjectProtocol for NotificationDelegate {}

    unsafe impl UNUserNotificationCenterDelegate for NotificationDelegate {
        /// Shows banners even while the menu is open.
        #[unsafe(method(userNotificationCenter:willPresentNotification:withCompletionHandler:))]
        fn will_present_notification(
            &self,
            _center: &UNUserNotificationCenter,
            _notification: &UNNotification,
            completion_handler: &Block<dyn Fn(UNNotificationPresentationOptions)>,
        ) {
            let options = UNNotificationPresentationOptions::Banner
                | UNNotificationPresentationOptions::List
                | UNNotificationPresentationOptions::Sound;

            completion_handler.call((options,));
        }

        #[unsafe(method(userNotificationCenter:didReceiveNotificationResponse:withCompletionHandler:))]
        fn did_receive_notification_response(
            &self,
            _center: &UNUserNotificationCenter,
            response: &UNNotificationResponse,
            completion_handler: &Block<dyn Fn()>,
        ) {
            let action = response.actionIdentifier().to_string();
            let category = response
                .notification()
                .request()
                .content()
                .categoryIdentifier()
                .to_string();

            match NotificationActionEvent::from_response(&category, &action) {
                Some(event) => {
                    let _ = self.ivars().action_sender.send(event);
                }
                None => tracing::debug!(category = %category, action = %action, "Ignoring notification response"),
            }

            // Must call completion handler
            completion_handler.call(());
        }
    }
);

impl NotificationDelegate {
    /// Creates a delegate that forwards responses to `action_sender`.
    #[must_use]
    pub fn new(
        mtm: MainThreadMarker,
        action_sender: Sender<NotificationActionEvent>,
    ) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(NotificationDelegateIvars { action_sender });
        unsafe { msg_send![super(this), init] }
    }

    #[must_use]
    pub fn as_protocol(
        delegate: &Retained<Self>,
    ) -> Retained<ProtocolObject<dyn UNUserNotificationCenterDelegate>> {
        ProtocolObject::from_retained(delegate.clone())
    }
}
