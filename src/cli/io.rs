//! Thin printing and prompting helpers shared by every command handler.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;
use crate::cli::output::{self, MessageKind};

pub fn print_info(message: impl fmt::Display) {
    output::print(MessageKind::Info, message);
}

pub fn print_success(message: impl fmt::Display) {
    output::print(MessageKind::Success, message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::print(MessageKind::Warning, message);
}

pub fn print_error(message: impl fmt::Display) {
    output::print(MessageKind::Error, message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::print(MessageKind::Hint, message);
}

pub fn print_section(message: impl fmt::Display) {
    output::print(MessageKind::Section, message);
}

pub fn print_line(message: impl fmt::Display) {
    output::plain(message);
}

pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CommandError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
