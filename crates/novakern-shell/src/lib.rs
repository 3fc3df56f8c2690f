//! NOVAKERN shell engine: command descriptors, per-shell registries,
//! the line dispatcher, and the nested shell stack.
//!
//! The entry point for embedders is [`KernelContext`] plus
//! [`ShellManager::start_shell_forced`]; `register_builtin_shells`
//! installs the stock shells into a fresh context.

pub mod command;
pub mod context;
pub mod dispatch;
pub mod environment;
pub mod io;
pub mod manager;
pub mod mods;
pub mod parser;
pub mod preset;
pub mod registry;
pub mod shell;
pub mod shells;

pub use command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
pub use context::KernelContext;
pub use dispatch::{execute_line, DispatchOutcome};
pub use environment::{HelpTopic, ShellEnvironment};
pub use io::{BufferSink, LineReader, ReadOutcome, ScriptedReader, TerminalSink};
pub use manager::{ShellManager, ShellStackEntry};
pub use mods::{
    register_addon_commands, register_addon_shell, unregister_addon_commands,
    unregister_addon_shell, ModInfo, ModRegistry,
};
pub use parser::{parse_line, ProvidedArguments, Switch};
pub use preset::{BarePreset, DefaultPreset, PromptPreset};
pub use registry::{CommandTable, ShellInfo, ShellRegistry};
pub use shell::{BaseShell, NullSession, ShellIo, ShellSession, ShellState};
pub use shells::register_builtin_shells;
