//! Prompt presets.
//!
//! Each registered shell carries a preset that renders the prompt shown
//! before every line read. Presets are purely cosmetic; the core only
//! passes the result to the line reader.

use crate::command::ShellType;

/// Renders the prompt string for a shell.
pub trait PromptPreset: Send + Sync {
    /// The preset's registry name.
    fn name(&self) -> &str;

    /// Build the prompt from the current user, host, and shell type.
    fn render(&self, user: &str, hostname: &str, shell_type: &ShellType) -> String;
}

/// `[user@host] marker ` with a per-shell marker character.
pub struct DefaultPreset;

impl PromptPreset for DefaultPreset {
    fn name(&self) -> &str {
        "default"
    }

    fn render(&self, user: &str, hostname: &str, shell_type: &ShellType) -> String {
        let marker = match shell_type {
            ShellType::Shell => "$",
            ShellType::Admin => "#",
            ShellType::Debug => "(dbg)",
            ShellType::Hex => "[hex]",
            ShellType::Text => "[text]",
            ShellType::Custom(_) => ">",
        };
        format!("[{user}@{hostname}] {marker} ")
    }
}

/// A minimal `> ` prompt regardless of shell.
pub struct BarePreset;

impl PromptPreset for BarePreset {
    fn name(&self) -> &str {
        "bare"
    }

    fn render(&self, _user: &str, _hostname: &str, _shell_type: &ShellType) -> String {
        "> ".to_string()
    }
}
