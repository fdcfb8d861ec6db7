use std::fmt;

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => format!("INFO: {text}"),
        MessageKind::Success => format!("SUCCESS: {text}").bright_green().to_string(),
        MessageKind::Warning => format!("WARNING: {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("ERROR: {text}").bright_red().to_string(),
        MessageKind::Hint => format!("HINT: {text}").bright_cyan().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

/// Unstyled line, for list and table bodies.
pub fn plain(message: impl fmt::Display) {
    println!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_framed() {
        colored::control::set_override(false);
        let styled = apply_style(MessageKind::Section, " Overview ");
        assert_eq!(styled, "=== Overview ===");
        colored::control::unset_override();
    }

    #[test]
    fn labels_match_the_kind() {
        colored::control::set_override(false);
        assert_eq!(apply_style(MessageKind::Error, "boom"), "ERROR: boom");
        assert_eq!(apply_style(MessageKind::Success, "ok"), "SUCCESS: ok");
        colored::control::unset_override();
    }
}
