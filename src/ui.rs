use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

/// Interactive questions a command may ask. Every method returns `None` when
/// the user dismisses the prompt, and callers stop without side effects.
pub trait Prompter {
    /// Pick one of `items`; returns the chosen index.
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<Option<usize>>;

    /// Free text input; empty input counts as dismissed.
    fn input(&self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal prompts backed by dialoguer.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<Option<usize>> {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()?;
        Ok(choice)
    }

    fn input(&self, prompt: &str) -> Result<Option<String>> {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        let value = value.trim().to_string();
        Ok(if value.is_empty() { None } else { Some(value) })
    }
}

pub fn info(message: &str) {
    println!("{}", message.green());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print a block of generated text between rulers.
pub fn preview(title: &str, body: &str) {
    println!();
    println!("----- {title} -----");
    println!("{body}");
    println!("{}", "-".repeat(title.len() + 12));
}

/// Spinner on stderr while a backend call is in flight. Hidden when stderr
/// is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
