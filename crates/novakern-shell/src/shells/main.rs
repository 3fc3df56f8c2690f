//! The main interactive shell and its built-in command set.

use std::sync::Arc;

use novakern_types::Result;

use crate::command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;

use super::common::common_commands;

struct EchoCommand;

impl CommandRunner for EchoCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        env.print_raw(&args.args.join(" "));
        Ok(0)
    }
}

struct WhoamiCommand;

impl CommandRunner for WhoamiCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let name = env.users.current().name().to_string();
        env.print_raw(&name);
        Ok(0)
    }
}

struct SetCommand;

impl CommandRunner for SetCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let (Some(name), Some(value)) = (args.args.first(), args.args.get(1)) else {
            env.print("set needs a variable name and a value.");
            return Ok(1);
        };
        env.variables.insert(name.clone(), value.clone());
        Ok(0)
    }
}

struct UnsetCommand;

impl CommandRunner for UnsetCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some(name) = args.args.first() else {
            env.print("unset needs a variable name.");
            return Ok(1);
        };
        if env.variables.remove(name).is_none() {
            env.print("No such variable.");
            return Ok(1);
        }
        Ok(0)
    }
}

struct ListVarsCommand;

impl CommandRunner for ListVarsCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let mut names: Vec<&String> = env.variables.keys().collect();
        names.sort();
        let lines: Vec<String> = names
            .iter()
            .map(|name| format!("{name}={}", env.variables[*name]))
            .collect();
        for line in lines {
            env.print_raw(&line);
        }
        Ok(0)
    }
}

struct UnameCommand;

impl CommandRunner for UnameCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let line = format!(
            "NOVAKERN {} on {}",
            env!("CARGO_PKG_VERSION"),
            env.config.hostname
        );
        env.print_raw(&line);
        Ok(0)
    }
}

struct ShutdownCommand;

impl CommandRunner for ShutdownCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        env.print("Shutting the kernel down...");
        env.request_bail();
        Ok(0)
    }
}

/// Launches a nested shell once the current command returns.
struct LaunchCommand {
    target: &'static str,
    forward_args: bool,
}

impl CommandRunner for LaunchCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let forwarded = if self.forward_args {
            args.args.clone()
        } else {
            Vec::new()
        };
        env.start_shell(self.target, &forwarded);
        Ok(0)
    }
}

/// The command set of the main shell.
pub fn main_commands() -> Result<Vec<CommandInfo>> {
    let mut commands = common_commands(ShellType::Shell)?;
    commands.extend([
        CommandInfo::new(
            "echo",
            ShellType::Shell,
            "Writes its arguments to the console",
            vec![CommandArgumentInfo::new(&["echo [text...]"], false, 0)],
            CommandFlags::REDIRECTION_SUPPORTED,
            Arc::new(EchoCommand),
        )?,
        CommandInfo::new(
            "whoami",
            ShellType::Shell,
            "Shows the current user",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(WhoamiCommand),
        )?,
        CommandInfo::new(
            "set",
            ShellType::Shell,
            "Sets a shell variable",
            vec![CommandArgumentInfo::new(&["set <name> <value>"], true, 2)],
            CommandFlags::SETTING_VARIABLE,
            Arc::new(SetCommand),
        )?,
        CommandInfo::new(
            "unset",
            ShellType::Shell,
            "Removes a shell variable",
            vec![CommandArgumentInfo::new(&["unset <name>"], true, 1)],
            CommandFlags::SETTING_VARIABLE,
            Arc::new(UnsetCommand),
        )?,
        CommandInfo::new(
            "lsvars",
            ShellType::Shell,
            "Lists the shell variables",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(ListVarsCommand),
        )?,
        CommandInfo::new(
            "uname",
            ShellType::Shell,
            "Shows kernel name and version",
            Vec::new(),
            CommandFlags::OBSOLETE,
            Arc::new(UnameCommand),
        )?,
        CommandInfo::new(
            "shutdown",
            ShellType::Shell,
            "Shuts the kernel down",
            Vec::new(),
            CommandFlags::STRICT,
            Arc::new(ShutdownCommand),
        )?,
        CommandInfo::new(
            "admin",
            ShellType::Shell,
            "Enters the administrative shell",
            Vec::new(),
            CommandFlags::STRICT,
            Arc::new(LaunchCommand {
                target: "AdminShell",
                forward_args: false,
            }),
        )?,
        CommandInfo::new(
            "debug",
            ShellType::Shell,
            "Enters the kernel diagnostics shell",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(LaunchCommand {
                target: "DebugShell",
                forward_args: false,
            }),
        )?,
        CommandInfo::new(
            "textedit",
            ShellType::Shell,
            "Opens a file in the text editor shell",
            vec![CommandArgumentInfo::new(&["textedit <file>"], true, 1)],
            CommandFlags::NO_MAINTENANCE,
            Arc::new(LaunchCommand {
                target: "TextShell",
                forward_args: true,
            }),
        )?,
        CommandInfo::new(
            "hexedit",
            ShellType::Shell,
            "Opens a file in the hex editor shell",
            vec![CommandArgumentInfo::new(&["hexedit <file>"], true, 1)],
            CommandFlags::NO_MAINTENANCE,
            Arc::new(LaunchCommand {
                target: "HexShell",
                forward_args: true,
            }),
        )?,
    ]);
    Ok(commands)
}
