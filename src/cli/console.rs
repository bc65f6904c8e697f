//! Presenter for one-shot CLI commands.
//!
//! Notifications go to the terminal and prompts read a y/N answer from
//! standard input.

use std::io::{self, BufRead, Write};

use crate::menubar::StatusView;
use crate::presenter::{Notification, Presenter, PresenterError, Prompt, PromptAnswer};

/// Terminal-backed presenter.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for ConsolePresenter {
    fn set_title(&self, _view: &StatusView) {}

    fn show_notification(&self, notification: &Notification) -> Result<(), PresenterError> {
        println!("{}: {}", notification.title, notification.message);
        Ok(())
    }

    fn prompt_user(&self, prompt: &Prompt) -> Result<PromptAnswer, PresenterError> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "{}\n{}\n{}? [y/N] ",
            prompt.title, prompt.message, prompt.accept_label
        )
        .and_then(|()| stdout.flush())
        .map_err(|e| PresenterError::Unavailable(e.to_string()))?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| PresenterError::Unavailable(e.to_string()))?;
        Ok(if is_yes(&answer) {
            PromptAnswer::Accepted
        } else {
            PromptAnswer::Declined
        })
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
