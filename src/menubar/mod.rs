//! Menu bar UI module for the stand-up reminder.
//!
//! This module provides:
//! - Tray icon management for the macOS menu bar
//! - The countdown line and streak line shown in the menu
//! - Interval submenu, "I moved", skip, snooze, pause/resume, reset, update check, quit
//! - Event handling for menu interactions
//!
//! # Architecture
//!
//! - `icon.rs`: glyph and countdown text (platform-independent, fully testable)
//! - `menu.rs`: menu configuration (platform-independent, fully testable)
//! - `event.rs`: item ids, actions and tray updates (platform-independent)
//! - `mod.rs`: TrayIconManager (platform-specific on macOS)
//!
//! The reminder loop never touches the tray directly. It sends [`TrayUpdate`]s
//! over a crossbeam channel and the manager applies them on the main thread.

pub mod event;
pub mod icon;
pub mod menu;

pub use event::{EventHandler, MenuAction, MenuItemId, TrayUpdate};
pub use icon::{IconManager, StatusView};
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crossbeam_channel::Receiver;

use crate::stats::StatsSummary;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Manages the tray icon and its menu.
///
/// On macOS it owns the actual tray-icon instance. On other platforms it
/// keeps the same bookkeeping without drawing anything.
pub struct TrayIconManager {
    icon_manager: IconManager,
    menu_builder: MenuBuilder,
    event_handler: EventHandler,
    view: StatusView,
    stats: Option<StatsSummary>,
    notice: Option<String>,
    update_rx: Receiver<TrayUpdate>,
    initialized: bool,
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
    #[cfg(target_os = "macos")]
    status_item: Option<tray_icon::menu::MenuItem>,
}

impl TrayIconManager {
    /// Creates a new TrayIconManager.
    ///
    /// On macOS the tray icon is only created by [`initialize`](Self::initialize),
    /// which must run on the main thread.
    pub fn new(initial_view: StatusView, update_rx: Receiver<TrayUpdate>) -> Self {
        Self {
            icon_manager: IconManager::new(),
            menu_builder: MenuBuilder::new(),
            event_handler: EventHandler::new(),
            view: initial_view,
            stats: None,
            notice: None,
            update_rx,
            initialized: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
            #[cfg(target_os = "macos")]
            status_item: None,
        }
    }

    /// Returns whether the manager is initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the view currently displayed.
    pub fn view(&self) -> &StatusView {
        &self.view
    }

    /// Returns the notice line currently displayed, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Generates the current title for the menu bar.
    pub fn generate_title(&self) -> String {
        self.view.glyph.to_string()
    }

    /// Generates the current menu configuration.
    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder
            .build(&self.view, self.stats.as_ref(), self.notice.as_deref())
    }

    /// Applies every pending update from the channel.
    ///
    /// Returns the number of updates applied.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.update_rx.try_recv() {
                Ok(update) => {
                    self.handle_update(update);
                    applied += 1;
                }
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    if self.initialized {
                        tracing::warn!("Menu bar update channel disconnected");
                        self.shutdown();
                    }
                    break;
                }
            }
        }
        applied
    }

    /// Drains clicks on the native menu into actions.
    #[cfg(target_os = "macos")]
    pub fn poll_actions(&self) -> Vec<MenuAction> {
        let receiver = tray_icon::menu::MenuEvent::receiver();
        let mut actions = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            if let Some(action) = self.event_handler.handle_click(event.id.as_ref()) {
                actions.push(action);
            }
        }
        actions
    }

    /// Drains clicks on the native menu into actions (non-macOS, always empty).
    #[cfg(not(target_os = "macos"))]
    pub fn poll_actions(&self) -> Vec<MenuAction> {
        let _ = &self.event_handler;
        Vec::new()
    }

    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::SetView(view) => {
                let rebuild = self.icon_manager.phase_changed(view.phase)
                    || view.interval != self.view.interval
                    || view.pending_acknowledgement != self.view.pending_acknowledgement;
                self.view = view;
                if rebuild {
                    tracing::debug!(phase = self.view.phase.as_str(), "Rebuilding menu");
                    self.refresh(true);
                } else {
                    self.refresh(false);
                }
            }
            TrayUpdate::SetStats(stats) => {
                self.stats = Some(stats);
                self.refresh(true);
            }
            TrayUpdate::ShowNotice(text) => {
                self.notice = Some(text);
                self.refresh(true);
            }
            TrayUpdate::ClearNotice => {
                if self.notice.take().is_some() {
                    self.refresh(true);
                }
            }
            TrayUpdate::Shutdown => {
                tracing::info!("Shutting down menu bar");
                self.shutdown();
            }
        }
    }

    /// Shuts down the tray icon.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.status_item = None;
            self.tray_icon = None;
        }
    }

    /// Initializes the tray icon (macOS only).
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        let (menu, status_item) = self.build_native_menu(&self.generate_menu_config())?;

        let tray_icon = TrayIconBuilder::new()
            .with_title(self.generate_title())
            .with_menu(Box::new(menu))
            .with_tooltip("Sit Down. Stand Up")
            .build()
            .context("Failed to create the menu bar icon")?;

        self.tray_icon = Some(tray_icon);
        self.status_item = Some(status_item);
        self.initialized = true;

        tracing::info!("Menu bar icon initialized");
        Ok(())
    }

    /// Initializes the tray icon (non-macOS, no-op).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::warn!("The menu bar is only supported on macOS");
        self.initialized = true;
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn refresh(&mut self, rebuild: bool) {
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            return;
        };
        tray_icon.set_title(Some(self.generate_title()));

        if !rebuild {
            if let Some(item) = self.status_item.as_ref() {
                item.set_text(&self.view.status_line);
            }
            return;
        }

        match self.build_native_menu(&self.generate_menu_config()) {
            Ok((menu, status_item)) => {
                tray_icon.set_menu(Some(Box::new(menu)));
                self.status_item = Some(status_item);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to rebuild menu"),
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn refresh(&mut self, rebuild: bool) {
        tracing::debug!(
            title = %self.generate_title(),
            status = %self.view.status_line,
            rebuild,
            "Menu bar refresh"
        );
    }

    /// Builds a native menu from the configuration (macOS only).
    ///
    /// Returns the menu and the countdown item so its text can be updated
    /// every second without a rebuild.
    #[cfg(target_os = "macos")]
    fn build_native_menu(
        &self,
        config: &MenuConfig,
    ) -> anyhow::Result<(tray_icon::menu::Menu, tray_icon::menu::MenuItem)> {
        use tray_icon::menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu};

        let item = |config: &MenuItemConfig| {
            MenuItem::with_id(config.id.as_id(), &config.text, config.enabled, None)
        };

        let menu = Menu::new();

        let status_item = item(&config.status);
        menu.append(&status_item)?;
        menu.append(&item(&config.streak))?;
        if let Some(notice) = &config.notice {
            menu.append(&MenuItem::new(&notice.text, false, None))?;
        }

        menu.append(&PredefinedMenuItem::separator())?;

        let intervals = Submenu::new(&config.interval_title, true);
        for entry in &config.intervals {
            intervals.append(&CheckMenuItem::with_id(
                entry.id.as_id(),
                &entry.text,
                entry.enabled,
                entry.checked,
                None,
            ))?;
        }
        menu.append(&intervals)?;

        menu.append(&item(&config.acknowledge))?;
        menu.append(&item(&config.dismiss))?;
        menu.append(&item(&config.snooze))?;
        menu.append(&item(&config.toggle_pause))?;
        menu.append(&item(&config.reset))?;

        menu.append(&PredefinedMenuItem::separator())?;

        menu.append(&item(&config.check_updates))?;
        menu.append(&item(&config.quit))?;

        Ok((menu, status_item))
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("view", &self.view)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
