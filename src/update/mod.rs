//! Self-update.
//!
//! - `version`: dot-separated numeric version comparison
//! - `manifest`: remote manifest document
//! - `checker`: fetches the manifest over HTTP
//! - `installer`: download, extract, replace-in-place, relaunch
//!
//! [`UpdateService`] ties these to the presenter: it decides what the user
//! sees for every outcome of a check. When the presenter answers a prompt
//! later (a notification with buttons), the service keeps the offered
//! manifest until [`UpdateService::accept_offer`] or
//! [`UpdateService::decline_offer`] settles it.

pub mod checker;
pub mod error;
pub mod installer;
pub mod manifest;
pub mod version;

use std::path::PathBuf;

pub use checker::{UpdateChecker, UpdateStatus};
pub use error::{Result, UpdateError};
pub use installer::{download_client, BundleInstaller, Installer, MockInstaller};
pub use manifest::Manifest;
pub use version::{compare_versions, Version};

use crate::presenter::{Notification, NotificationKind, Presenter, Prompt, PromptAnswer};

/// Minimum time between automatic checks, in seconds.
pub const AUTO_CHECK_INTERVAL_SECONDS: i64 = 24 * 60 * 60;

/// Returns true if an automatic check is due.
pub fn auto_check_due(last_check: i64, now: i64) -> bool {
    now - last_check >= AUTO_CHECK_INTERVAL_SECONDS
}

/// What a call to [`UpdateService::check_for_updates`] ended with.
#[derive(Debug)]
pub enum CheckOutcome {
    /// Running the latest version.
    UpToDate,
    /// A newer version exists; silent checks stop here.
    Available(Version),
    /// The user was asked to install and has not answered yet.
    Offered(Version),
    /// The user chose not to install.
    Declined,
    /// The new version was installed and started. The caller should exit.
    Installed(PathBuf),
    /// The check or the install failed.
    Failed(UpdateError),
}

impl CheckOutcome {
    /// Returns true if the process should exit for the new version.
    pub fn should_quit(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Runs update checks and reports their outcome to the user.
pub struct UpdateService {
    checker: UpdateChecker,
    installer: Box<dyn Installer>,
    offered: Option<Manifest>,
}

impl UpdateService {
    pub fn new(checker: UpdateChecker, installer: Box<dyn Installer>) -> Self {
        Self {
            checker,
            installer,
            offered: None,
        }
    }

    pub fn checker(&self) -> &UpdateChecker {
        &self.checker
    }

    /// Pretends to be another version (dev trigger).
    pub fn override_version(&mut self, version: Version) {
        self.checker.set_current_version(version);
    }

    /// Checks the manifest and, unless `silent`, offers to install.
    ///
    /// A silent check never opens a dialog: a newer version becomes a
    /// notification, and failures are only logged. Install failures are
    /// always reported.
    pub async fn check_for_updates(
        &mut self,
        silent: bool,
        presenter: &dyn Presenter,
    ) -> CheckOutcome {
        let status = match self.checker.check().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(error = %e, "Update check failed");
                if !silent {
                    report(
                        presenter,
                        Notification::new(
                            NotificationKind::UpdateFailed,
                            "Update Check Failed",
                            e.to_string(),
                        ),
                    );
                }
                return CheckOutcome::Failed(e);
            }
        };

        let (current, latest, manifest) = match status {
            UpdateStatus::UpToDate { current } => {
                if !silent {
                    report(
                        presenter,
                        Notification::new(
                            NotificationKind::UpToDate,
                            "You're Up to Date",
                            format!("Version {current} is the latest version."),
                        ),
                    );
                }
                return CheckOutcome::UpToDate;
            }
            UpdateStatus::Available {
                current,
                latest,
                manifest,
            } => (current, latest, manifest),
        };

        if silent {
            report(
                presenter,
                Notification::new(
                    NotificationKind::UpdateAvailable,
                    "Update Available",
                    format!("Version {latest} is available. Choose Check for Updates to install."),
                ),
            );
            return CheckOutcome::Available(latest);
        }

        let mut message = format!("Version {latest} is available (you have {current}).");
        if !manifest.notes.trim().is_empty() {
            message.push_str("\n\n");
            message.push_str(manifest.notes.trim());
        }
        let prompt = Prompt::new("Update Available", message, "Install", "Later");
        match presenter.prompt_user(&prompt) {
            Ok(PromptAnswer::Accepted) => self.install(&manifest, presenter).await,
            Ok(PromptAnswer::Pending) => {
                tracing::info!(latest = %latest, "Update offered");
                self.offered = Some(manifest);
                CheckOutcome::Offered(latest)
            }
            Ok(PromptAnswer::Declined) => {
                tracing::info!(latest = %latest, "Update declined");
                CheckOutcome::Declined
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not ask about the update");
                CheckOutcome::Declined
            }
        }
    }

    /// Returns true if an offer is waiting for an answer.
    pub fn has_offer(&self) -> bool {
        self.offered.is_some()
    }

    /// Installs the offered update ("Install" on the offer).
    ///
    /// Without a waiting offer nothing happens and the outcome is
    /// [`CheckOutcome::Declined`].
    pub async fn accept_offer(&mut self, presenter: &dyn Presenter) -> CheckOutcome {
        let Some(manifest) = self.offered.take() else {
            tracing::debug!("No update offer to accept");
            return CheckOutcome::Declined;
        };
        self.install(&manifest, presenter).await
    }

    /// Drops the offered update ("Later" on the offer). Returns true if an
    /// offer was waiting.
    pub fn decline_offer(&mut self) -> bool {
        match self.offered.take() {
            Some(manifest) => {
                tracing::info!(latest = %manifest.version, "Update declined");
                true
            }
            None => false,
        }
    }

    async fn install(&self, manifest: &Manifest, presenter: &dyn Presenter) -> CheckOutcome {
        let installed = match self.installer.install(manifest).await {
            Ok(path) => path,
            Err(e) => return install_failed(presenter, e),
        };
        if let Err(e) = self.installer.relaunch(&installed) {
            return install_failed(presenter, e);
        }
        CheckOutcome::Installed(installed)
    }
}

impl std::fmt::Debug for UpdateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateService")
            .field("checker", &self.checker)
            .field("offered", &self.offered)
            .finish_non_exhaustive()
    }
}

fn install_failed(presenter: &dyn Presenter, e: UpdateError) -> CheckOutcome {
    tracing::error!(error = %e, "Update install failed");
    report(
        presenter,
        Notification::new(NotificationKind::UpdateFailed, "Update Failed", e.to_string()),
    );
    CheckOutcome::Failed(e)
}

fn report(presenter: &dyn Presenter, notification: Notification) {
    if let Err(e) = presenter.show_notification(&notification) {
        tracing::warn!(error = %e, "Failed to show update notification");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::MockPresenter;
    use std::sync::Arc;
    use std::time::Duration;

    /// Installer wrapper so the test keeps a handle on the mock.
    struct Shared(Arc<MockInstaller>);

    #[async_trait::async_trait]
    impl Installer for Shared {
        async fn install(&self, manifest: &Manifest) -> Result<PathBuf> {
            self.0.install(manifest).await
        }

        fn relaunch(&self, bundle: &std::path::Path) -> Result<()> {
            self.0.relaunch(bundle)
        }
    }

    async fn server_with(version: &str) -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/latest.json")
            .with_body(format!(
                r#"{{"version":"{version}","download_url":"https://example.com/Standup.zip","notes":"Faster reminders"}}"#
            ))
            .create_async()
            .await;
        server
    }

    fn service(url: String, current: &str) -> (UpdateService, Arc<MockInstaller>) {
        let checker =
            UpdateChecker::new(url, current.parse().unwrap(), Duration::from_secs(5)).unwrap();
        let installer = Arc::new(MockInstaller::new());
        (
            UpdateService::new(checker, Box::new(Shared(installer.clone()))),
            installer,
        )
    }

    mod auto_check_tests {
        use super::*;

        #[test]
        fn test_auto_check_due() {
            assert!(auto_check_due(0, 1_700_000_000));
            assert!(auto_check_due(1000, 1000 + AUTO_CHECK_INTERVAL_SECONDS));
            assert!(!auto_check_due(1000, 1000 + AUTO_CHECK_INTERVAL_SECONDS - 1));
        }
    }

    mod check_tests {
        use super::*;

        #[tokio::test]
        async fn test_manual_check_up_to_date() {
            let server = server_with("2.1.0").await;
            let (mut service, _) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();

            let outcome = service.check_for_updates(false, &presenter).await;

            assert!(matches!(outcome, CheckOutcome::UpToDate));
            assert_eq!(presenter.notification_kinds(), vec![NotificationKind::UpToDate]);
        }

        #[tokio::test]
        async fn test_silent_check_up_to_date_is_quiet() {
            let server = server_with("2.1.0").await;
            let (mut service, _) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();

            service.check_for_updates(true, &presenter).await;

            assert!(presenter.notifications().is_empty());
        }

        #[tokio::test]
        async fn test_accepted_update_installs_and_relaunches() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();
            presenter.set_accept_prompts(true);

            let outcome = service.check_for_updates(false, &presenter).await;

            assert!(outcome.should_quit());
            assert_eq!(installer.installed_versions(), vec!["2.2.0"]);
            assert!(installer.was_relaunched());
            let prompt = &presenter.prompts()[0];
            assert!(prompt.message.contains("2.2.0"));
            assert!(prompt.message.contains("Faster reminders"));
        }

        #[tokio::test]
        async fn test_declined_update_does_nothing() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();

            let outcome = service.check_for_updates(false, &presenter).await;

            assert!(matches!(outcome, CheckOutcome::Declined));
            assert!(installer.installed_versions().is_empty());
        }

        #[tokio::test]
        async fn test_pending_offer_installs_on_accept() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();
            presenter.set_defer_prompts(true);

            let outcome = service.check_for_updates(false, &presenter).await;
            assert!(matches!(outcome, CheckOutcome::Offered(ref v) if v.to_string() == "2.2.0"));
            assert!(service.has_offer());
            assert!(installer.installed_versions().is_empty());

            let outcome = service.accept_offer(&presenter).await;

            assert!(outcome.should_quit());
            assert_eq!(installer.installed_versions(), vec!["2.2.0"]);
            assert!(!service.has_offer());
        }

        #[tokio::test]
        async fn test_pending_offer_declined_later() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();
            presenter.set_defer_prompts(true);
            service.check_for_updates(false, &presenter).await;

            assert!(service.decline_offer());
            assert!(!service.decline_offer());

            let outcome = service.accept_offer(&presenter).await;
            assert!(matches!(outcome, CheckOutcome::Declined));
            assert!(installer.installed_versions().is_empty());
        }

        #[tokio::test]
        async fn test_silent_update_only_notifies() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            let presenter = MockPresenter::new();
            presenter.set_accept_prompts(true);

            let outcome = service.check_for_updates(true, &presenter).await;

            assert!(matches!(outcome, CheckOutcome::Available(_)));
            assert!(presenter.prompts().is_empty());
            assert!(installer.installed_versions().is_empty());
            assert_eq!(
                presenter.notification_kinds(),
                vec![NotificationKind::UpdateAvailable]
            );
        }

        #[tokio::test]
        async fn test_install_failure_is_reported() {
            let server = server_with("2.2.0").await;
            let (mut service, installer) = service(format!("{}/latest.json", server.url()), "2.1.0");
            installer.set_should_fail(true);
            let presenter = MockPresenter::new();
            presenter.set_accept_prompts(true);

            let outcome = service.check_for_updates(false, &presenter).await;

            assert!(matches!(outcome, CheckOutcome::Failed(ref e) if e.is_archive()));
            assert!(!installer.was_relaunched());
            assert_eq!(presenter.notification_kinds(), vec![NotificationKind::UpdateFailed]);
        }

        #[tokio::test]
        async fn test_network_failure_reported_only_when_manual() {
            let (mut service, _) = service("http://127.0.0.1:9/latest.json".to_string(), "2.1.0");
            let presenter = MockPresenter::new();

            let outcome = service.check_for_updates(true, &presenter).await;
            assert!(matches!(outcome, CheckOutcome::Failed(ref e) if e.is_network()));
            assert!(presenter.notifications().is_empty());

            service.check_for_updates(false, &presenter).await;
            let notifications = presenter.notifications();
            assert_eq!(notifications.len(), 1);
            assert_eq!(notifications[0].kind, NotificationKind::UpdateFailed);
            assert!(notifications[0].message.starts_with("Network error"));
        }

        #[tokio::test]
        async fn test_version_override_exercises_update_path() {
            let server = server_with("2.1.0").await;
            let (mut service, _) = service(format!("{}/latest.json", server.url()), "2.1.0");
            service.override_version("1.0".parse().unwrap());
            let presenter = MockPresenter::new();

            let outcome = service.check_for_updates(true, &presenter).await;

            assert!(matches!(outcome, CheckOutcome::Available(ref v) if v.to_string() == "2.1.0"));
        }
    }
}
