//! Display utilities for the stand-up reminder CLI.
//!
//! This module provides formatted output for:
//! - Saved configuration (`status`)
//! - Statistics (`stats`)
//! - Update check results
//! - Error messages

use std::path::Path;

use chrono::{DateTime, Local};

use crate::stats::StatsSummary;
use crate::store::AppConfig;
use crate::types::Interval;
use crate::update::CheckOutcome;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the saved configuration.
    pub fn show_status(config: &AppConfig, data_dir: &Path) {
        print!("{}", Self::format_status(config, data_dir));
    }

    fn format_status(config: &AppConfig, data_dir: &Path) -> String {
        let interval = config.interval();
        let mut out = String::new();
        out.push_str("Stand-Up Reminder\n");
        out.push_str("─────────────────\n");
        out.push_str(&format!("Version: {}\n", env!("CARGO_PKG_VERSION")));
        out.push_str(&format!(
            "Interval: {} ({})\n",
            interval,
            Self::format_duration(interval.seconds())
        ));
        out.push_str(&format!(
            "Last update check: {}\n",
            Self::format_timestamp(config.last_update_check)
        ));
        if let Some(user_id) = &config.user_id {
            out.push_str(&format!("User id: {}\n", user_id));
        }
        out.push_str(&format!("Data directory: {}\n", data_dir.display()));
        out
    }

    /// Shows statistics.
    pub fn show_stats(summary: &StatsSummary) {
        println!("{}", summary);
    }

    /// Shows a confirmation for an interval change.
    pub fn show_interval_set(interval: Interval) {
        println!("* Reminding every {}", interval);
        println!("  A running reminder picks this up on its next start.");
    }

    /// Shows the result of an update check.
    pub fn show_update_outcome(outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::UpToDate => println!("* Up to date"),
            CheckOutcome::Available(version) => println!("* Version {} is available", version),
            CheckOutcome::Offered(version) => println!("* Version {} is waiting for an answer", version),
            CheckOutcome::Declined => println!("  Update skipped"),
            CheckOutcome::Installed(path) => println!("* Installed {}", path.display()),
            CheckOutcome::Failed(_) => {}
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats seconds as "1 min" / "1 h 30 min".
    fn format_duration(seconds: i64) -> String {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        match (hours, minutes) {
            (0, m) => format!("{} min", m),
            (h, 0) => format!("{} h", h),
            (h, m) => format!("{} h {} min", h, m),
        }
    }

    /// Formats epoch seconds in local time, or "never" for zero.
    fn format_timestamp(epoch: i64) -> String {
        if epoch <= 0 {
            return "never".to_string();
        }
        DateTime::from_timestamp(epoch, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
