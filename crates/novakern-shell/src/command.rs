//! Command descriptors: argument shapes, behavioral flags, and the
//! executable trait every command implements.

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use novakern_types::{KernelError, Result};

use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;

/// A named category of interactive command loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShellType {
    /// The main interactive shell.
    Shell,
    /// Administrative shell restricted to privileged users.
    Admin,
    /// Kernel diagnostics shell.
    Debug,
    /// Hex file editor shell.
    Hex,
    /// Text file editor shell.
    Text,
    /// A shell type contributed by an addon.
    Custom(String),
}

impl ShellType {
    /// The registry key for this shell type.
    pub fn name(&self) -> &str {
        match self {
            ShellType::Shell => "Shell",
            ShellType::Admin => "AdminShell",
            ShellType::Debug => "DebugShell",
            ShellType::Hex => "HexShell",
            ShellType::Text => "TextShell",
            ShellType::Custom(name) => name,
        }
    }

    /// Resolve a registry key to a shell type. Unknown names become
    /// [`ShellType::Custom`].
    pub fn parse(name: &str) -> ShellType {
        match name {
            "Shell" => ShellType::Shell,
            "AdminShell" => ShellType::Admin,
            "DebugShell" => ShellType::Debug,
            "HexShell" => ShellType::Hex,
            "TextShell" => ShellType::Text,
            other => ShellType::Custom(other.to_string()),
        }
    }

    /// Whether this is one of the built-in shell types.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, ShellType::Custom(_))
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behavioral flags of a command, combined with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFlags(u32);

impl CommandFlags {
    pub const NONE: CommandFlags = CommandFlags(0);
    /// Restricted to users holding the Administrator group.
    pub const STRICT: CommandFlags = CommandFlags(1 << 0);
    /// Kept for compatibility; prints a deprecation notice before running.
    pub const OBSOLETE: CommandFlags = CommandFlags(1 << 1);
    /// Unavailable while the kernel runs in maintenance mode.
    pub const NO_MAINTENANCE: CommandFlags = CommandFlags(1 << 2);
    /// Mutates shell variables.
    pub const SETTING_VARIABLE: CommandFlags = CommandFlags(1 << 3);
    /// Output may be redirected by the hosting terminal.
    pub const REDIRECTION_SUPPORTED: CommandFlags = CommandFlags(1 << 4);

    /// Whether every flag in `other` is set in `self`.
    pub fn contains(self, other: CommandFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CommandFlags {
    type Output = CommandFlags;

    fn bitor(self, rhs: CommandFlags) -> CommandFlags {
        CommandFlags(self.0 | rhs.0)
    }
}

/// One accepted shape of arguments for a command.
///
/// A command may declare several shapes (e.g. a switch-only form and a
/// positional form); the minimum-argument check is enforced against the
/// first declared shape, the rest drive help-text generation.
#[derive(Debug, Clone, Default)]
pub struct CommandArgumentInfo {
    help_usages: Vec<String>,
    arguments_required: bool,
    minimum_arguments: usize,
}

impl CommandArgumentInfo {
    /// Describe one argument shape.
    pub fn new(help_usages: &[&str], arguments_required: bool, minimum_arguments: usize) -> Self {
        Self {
            help_usages: help_usages.iter().map(|s| s.to_string()).collect(),
            arguments_required,
            minimum_arguments,
        }
    }

    /// Human-readable usage strings.
    pub fn help_usages(&self) -> &[String] {
        &self.help_usages
    }

    /// Whether the minimum-argument bound is enforced.
    pub fn arguments_required(&self) -> bool {
        self.arguments_required
    }

    /// Lower bound on positional arguments when required.
    pub fn minimum_arguments(&self) -> usize {
        self.minimum_arguments
    }
}

/// The executable body of a command.
pub trait CommandRunner: Send + Sync {
    /// Run the command. Returns the exit code.
    ///
    /// Errors returned here are implementation faults; they propagate to
    /// the owning shell loop, which logs and contains them.
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32>;

    /// Extended help shown by `help <command>`, if any.
    fn help_helper(&self) -> Option<String> {
        None
    }
}

/// Immutable descriptor of one command within one shell type.
#[derive(Clone)]
pub struct CommandInfo {
    command: String,
    shell_type: ShellType,
    help_definition: String,
    arg_info: Vec<CommandArgumentInfo>,
    flags: CommandFlags,
    runner: Arc<dyn CommandRunner>,
}

impl CommandInfo {
    /// Build a descriptor. The command name must be non-empty.
    pub fn new(
        command: &str,
        shell_type: ShellType,
        help_definition: &str,
        arg_info: Vec<CommandArgumentInfo>,
        flags: CommandFlags,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        if command.trim().is_empty() {
            return Err(KernelError::Command(
                "command name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            command: command.to_string(),
            shell_type,
            help_definition: help_definition.to_string(),
            arg_info,
            flags,
            runner,
        })
    }

    /// The unique command name within its shell type.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The shell type this command is valid under.
    pub fn shell_type(&self) -> &ShellType {
        &self.shell_type
    }

    /// Untranslated help string.
    pub fn help_definition(&self) -> &str {
        &self.help_definition
    }

    /// All declared argument shapes.
    pub fn arg_info(&self) -> &[CommandArgumentInfo] {
        &self.arg_info
    }

    /// The first declared shape, used for the minimum-argument check.
    pub fn first_shape(&self) -> Option<&CommandArgumentInfo> {
        self.arg_info.first()
    }

    /// Behavioral flags.
    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    /// The executable body.
    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }
}

impl fmt::Debug for CommandInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandInfo")
            .field("command", &self.command)
            .field("shell_type", &self.shell_type)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
