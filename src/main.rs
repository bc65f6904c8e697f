//! Stand-Up Reminder - a macOS menu bar nudge to get up and move
//!
//! Every work interval the menu bar icon turns into a standing figure and a
//! notification asks you to stand for five minutes. Confirming with
//! "I moved" builds a streak; letting the prompt lapse resets it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use standup::cli::{CheckUpdateArgs, Cli, Commands, ConsolePresenter, DevCommands, Display, RunArgs};
use standup::daemon::{App, ReminderCommand, RunSettings};
use standup::menubar::{MenuAction, StatusView, TrayIconManager, TrayUpdate};
use standup::notification::run_notifier;
use standup::presenter::{DesktopPresenter, Presenter};
use standup::stats::StatsTracker;
use standup::store::ConfigStore;
use standup::update::{
    download_client, BundleInstaller, CheckOutcome, UpdateChecker, UpdateService, Version,
};

/// How often the tray drains its update channel and menu clicks.
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let settings = RunSettings::from_env().context("Failed to prepare data directory")?;

    match cli.command {
        None => run_reminder(settings, RunArgs::default(), false).await,
        Some(Commands::Run(args)) => run_reminder(settings, args, false).await,
        Some(Commands::Status) => {
            let config = ConfigStore::open_in(&settings.data_dir);
            Display::show_status(config.config(), &settings.data_dir);
            Ok(())
        }
        Some(Commands::Stats { json }) => {
            let summary = StatsTracker::open_in(&settings.data_dir).summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                Display::show_stats(&summary);
            }
            Ok(())
        }
        Some(Commands::Interval { interval }) => {
            let mut config = ConfigStore::open_in(&settings.data_dir);
            config
                .set_interval(interval)
                .context("Failed to save interval")?;
            Display::show_interval_set(interval);
            Ok(())
        }
        Some(Commands::CheckUpdate(args)) => check_update(settings, args, None).await,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        Some(Commands::Dev(DevCommands::Prompt(args))) => run_reminder(settings, args, true).await,
        Some(Commands::Dev(DevCommands::Version {
            version,
            manifest_url,
        })) => {
            let version: Version = version.parse()?;
            let args = CheckUpdateArgs {
                silent: false,
                manifest_url,
            };
            check_update(settings, args, Some(version)).await
        }
    }
}

/// Builds the update service for `settings`.
fn update_service(settings: &RunSettings) -> Result<UpdateService> {
    let checker = UpdateChecker::new(
        settings.manifest_url.clone(),
        Version::current(),
        settings.http_timeout,
    )
    .context("Failed to create HTTP client")?;
    let downloads = download_client(settings.http_timeout, settings.download_timeout)
        .context("Failed to create HTTP client")?;
    let installer = BundleInstaller::for_current_exe(downloads, &settings.scratch_dir);
    Ok(UpdateService::new(checker, Box::new(installer)))
}

/// Runs a one-shot update check from the terminal.
async fn check_update(
    settings: RunSettings,
    args: CheckUpdateArgs,
    pretend: Option<Version>,
) -> Result<()> {
    let settings = settings.with_manifest_url(args.manifest_url);
    let mut updates = update_service(&settings)?;
    if let Some(version) = pretend {
        updates.override_version(version);
    }

    let outcome = updates
        .check_for_updates(args.silent, &ConsolePresenter::new())
        .await;
    Display::show_update_outcome(&outcome);

    match outcome {
        CheckOutcome::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}

/// Runs the menu bar reminder until Quit.
async fn run_reminder(settings: RunSettings, args: RunArgs, prompt_now: bool) -> Result<()> {
    let settings = settings.with_manifest_url(args.manifest_url);
    let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
    let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
    let presenter: Arc<dyn Presenter> =
        Arc::new(DesktopPresenter::new(tray_tx.clone(), delivery_tx));
    let updates = update_service(&settings)?;

    let app = App::new(settings, presenter, updates)?;
    let initial_view = StatusView::new(app.engine().state(), app.engine().interval());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    if prompt_now {
        command_tx.send(ReminderCommand::DevPrompt)?;
    }

    // The tray icon and the notification delegate are not Send; keep them
    // on this thread.
    let local = LocalSet::new();
    local
        .run_until(async move {
            let mut tray = TrayIconManager::new(initial_view, tray_rx);
            tray.initialize()?;

            let notify_tx = command_tx.clone();
            let notifier = tokio::task::spawn_local(run_notifier(delivery_rx, move |event| {
                notify_tx.send(ReminderCommand::Notification(event)).is_ok()
            }));

            let menu_tx = command_tx.clone();
            let pump = tokio::task::spawn_local(async move {
                let mut ticker = tokio::time::interval(TRAY_POLL_INTERVAL);
                loop {
                    ticker.tick().await;
                    tray.process_pending_updates();
                    for action in tray.poll_actions() {
                        if menu_tx.send(action.into()).is_err() {
                            return;
                        }
                    }
                }
            });

            let signal = tokio::task::spawn_local(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted");
                    let _ = command_tx.send(MenuAction::Quit.into());
                }
            });

            let result = app.run(command_rx).await;

            let _ = tray_tx.send(TrayUpdate::Shutdown);
            pump.abort();
            signal.abort();
            notifier.abort();
            result
        })
        .await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
