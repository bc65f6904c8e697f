//! CLI module for the stand-up reminder.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `console`: Terminal presenter for one-shot commands
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod console;
pub mod display;

pub use commands::{CheckUpdateArgs, Cli, Commands, DevCommands, RunArgs};
pub use console::ConsolePresenter;
pub use display::Display;
