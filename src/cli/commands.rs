//! Command definitions for the stand-up reminder CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::Interval;

// ============================================================================
// CLI Structure
// ============================================================================

/// Stand-Up Reminder - a menu bar nudge to get up and move
#[derive(Parser, Debug)]
#[command(
    name = "standup",
    version,
    about = "macOS menu bar stand-up reminder",
    long_about = "Lives in the menu bar and reminds you to stand up at a fixed interval.\n\
                  Confirm each stand-up with \"I moved\" to build a streak.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the menu bar reminder
    Run(RunArgs),

    /// Show the saved configuration
    Status,

    /// Show stand-up statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the reminder interval
    Interval {
        /// One of "1 minute", "30 minutes", "1 hour" (or 1m, 30m, 1h)
        #[arg(value_parser = parse_interval)]
        interval: Interval,
    },

    /// Check for a newer version
    CheckUpdate(CheckUpdateArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Developer triggers
    #[command(hide = true, subcommand)]
    Dev(DevCommands),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Update manifest URL
    #[arg(long, value_name = "URL")]
    pub manifest_url: Option<String>,
}

/// Arguments for the check-update command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckUpdateArgs {
    /// Only report; never offer to install
    #[arg(short, long)]
    pub silent: bool,

    /// Update manifest URL
    #[arg(long, value_name = "URL")]
    pub manifest_url: Option<String>,
}

/// Hidden developer subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DevCommands {
    /// Run the reminder and show the stand prompt immediately
    Prompt(RunArgs),

    /// Run an update check as if this were another version
    Version {
        /// Version to pretend to be, e.g. 0.1.0
        #[arg(id = "pretend_version", value_name = "VERSION")]
        version: String,

        /// Update manifest URL
        #[arg(long, value_name = "URL")]
        manifest_url: Option<String>,
    },
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses an interval name or its short form.
fn parse_interval(s: &str) -> Result<Interval, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1m" | "1min" => Ok(Interval::OneMinute),
        "30m" | "30min" => Ok(Interval::ThirtyMinutes),
        "1h" | "60m" => Ok(Interval::OneHour),
        other => other.parse(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["standup"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["standup", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_after_subcommand() {
            let cli = Cli::parse_from(["standup", "status", "-v"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Status)));
        }

        #[test]
        fn test_parse_run_with_manifest() {
            let cli = Cli::parse_from([
                "standup",
                "run",
                "--manifest-url",
                "http://localhost/latest.json",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(
                        args.manifest_url.as_deref(),
                        Some("http://localhost/latest.json")
                    );
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_stats_json() {
            let cli = Cli::parse_from(["standup", "stats", "--json"]);
            assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
        }

        #[test]
        fn test_parse_check_update_silent() {
            let cli = Cli::parse_from(["standup", "check-update", "--silent"]);
            match cli.command {
                Some(Commands::CheckUpdate(args)) => assert!(args.silent),
                _ => panic!("Expected CheckUpdate command"),
            }
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["standup", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Interval Tests
    // ------------------------------------------------------------------------

    mod interval_tests {
        use super::*;

        #[test]
        fn test_parse_full_name() {
            let cli = Cli::parse_from(["standup", "interval", "30 minutes"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Interval {
                    interval: Interval::ThirtyMinutes
                })
            ));
        }

        #[test]
        fn test_parse_short_forms() {
            assert_eq!(parse_interval("1m"), Ok(Interval::OneMinute));
            assert_eq!(parse_interval("30M"), Ok(Interval::ThirtyMinutes));
            assert_eq!(parse_interval("1h"), Ok(Interval::OneHour));
            assert_eq!(parse_interval("1 hour"), Ok(Interval::OneHour));
        }

        #[test]
        fn test_reject_unknown_interval() {
            let err = parse_interval("45 minutes").unwrap_err();
            assert!(err.contains("expected one of"));

            let result = Cli::try_parse_from(["standup", "interval", "2h"]);
            assert!(result.is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Dev Command Tests
    // ------------------------------------------------------------------------

    mod dev_tests {
        use super::*;

        #[test]
        fn test_parse_dev_prompt() {
            let cli = Cli::parse_from(["standup", "dev", "prompt"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Dev(DevCommands::Prompt(_)))
            ));
        }

        #[test]
        fn test_parse_dev_version() {
            let cli = Cli::parse_from(["standup", "dev", "version", "0.1.0"]);
            match cli.command {
                Some(Commands::Dev(DevCommands::Version { version, .. })) => {
                    assert_eq!(version, "0.1.0");
                }
                _ => panic!("Expected dev version command"),
            }
        }
    }
}
