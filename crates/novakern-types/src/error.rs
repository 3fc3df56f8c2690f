//! Error types for NOVAKERN.

use std::io;

/// Errors produced by the NOVAKERN kernel.
///
/// Expected, recoverable command outcomes (authorization denial, missing
/// arguments, unknown commands) are deliberately *not* errors; they are
/// modeled as dispatch outcomes in `novakern-shell`. This enum covers the
/// conditions that callers must handle explicitly.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    #[error("not permitted: {0}")]
    NotPermitted(String),

    #[error("shell already exists: {0}")]
    ShellAlreadyExists(String),

    #[error("cannot unregister built-in shell: {0}")]
    BuiltinShellRemoval(String),

    #[error("no such shell: {0}")]
    NoSuchShell(String),

    #[error("no such event: {0}")]
    NoSuchEvent(String),

    #[error("no such mod: {0}")]
    NoSuchMod(String),

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_command_display() {
        let e = KernelError::DuplicateCommand("ping".into());
        assert_eq!(format!("{e}"), "duplicate command: ping");
    }

    #[test]
    fn builtin_shell_removal_display() {
        let e = KernelError::BuiltinShellRemoval("Shell".into());
        assert_eq!(format!("{e}"), "cannot unregister built-in shell: Shell");
    }

    #[test]
    fn no_such_shell_display() {
        let e = KernelError::NoSuchShell("MailShell".into());
        assert_eq!(format!("{e}"), "no such shell: MailShell");
    }

    #[test]
    fn no_such_event_display() {
        let e = KernelError::NoSuchEvent("Nonexistent".into());
        assert_eq!(format!("{e}"), "no such event: Nonexistent");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: KernelError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn toml_error_from_conversion() {
        let bad_toml = "this is [[[not valid toml";
        let toml_err = toml::from_str::<toml::Value>(bad_toml).unwrap_err();
        let e: KernelError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }

    #[test]
    fn result_alias_round_trip() {
        let ok: Result<i32> = Ok(7);
        assert_eq!(ok.unwrap(), 7);
        let err: Result<i32> = Err(KernelError::Command("oops".into()));
        assert!(err.is_err());
    }
}
