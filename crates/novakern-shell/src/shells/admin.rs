//! The administrative shell: user and group management.
//!
//! Entry is gated by the strict `admin` command of the main shell, so the
//! loop itself assumes a privileged caller; its mutating commands are
//! still flagged strict for defense at the command level.

use std::sync::Arc;

use novakern_types::Result;

use crate::command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;

use super::common::common_commands;

struct ListUsersCommand;

impl CommandRunner for ListUsersCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let current = env.users.current().name().to_string();
        let lines: Vec<String> = env
            .users
            .users()
            .map(|user| {
                let marker = if user.name() == current { "*" } else { " " };
                let groups: Vec<&str> = user.groups().collect();
                format!("{marker} {} ({})", user.name(), groups.join(", "))
            })
            .collect();
        for line in lines {
            env.print_raw(&line);
        }
        Ok(0)
    }
}

struct AddUserCommand;

impl CommandRunner for AddUserCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some(name) = args.args.first() else {
            env.print("adduser needs a user name.");
            return Ok(1);
        };
        env.users.add_user(name);
        Ok(0)
    }
}

struct GrantCommand;

impl CommandRunner for GrantCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let (Some(user), Some(group)) = (args.args.first(), args.args.get(1)) else {
            env.print("grant needs a user and a group.");
            return Ok(1);
        };
        // Unknown users are an operator mistake, not a kernel fault.
        if let Err(e) = env.users.add_to_group(user, group) {
            env.print_raw(&format!("{e}"));
            return Ok(1);
        }
        Ok(0)
    }
}

struct RevokeCommand;

impl CommandRunner for RevokeCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let (Some(user), Some(group)) = (args.args.first(), args.args.get(1)) else {
            env.print("revoke needs a user and a group.");
            return Ok(1);
        };
        if let Err(e) = env.users.remove_from_group(user, group) {
            env.print_raw(&format!("{e}"));
            return Ok(1);
        }
        Ok(0)
    }
}

/// The command set of the administrative shell.
pub fn admin_commands() -> Result<Vec<CommandInfo>> {
    let mut commands = common_commands(ShellType::Admin)?;
    commands.extend([
        CommandInfo::new(
            "lsusers",
            ShellType::Admin,
            "Lists known users and their groups",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(ListUsersCommand),
        )?,
        CommandInfo::new(
            "adduser",
            ShellType::Admin,
            "Adds a user to the directory",
            vec![CommandArgumentInfo::new(&["adduser <name>"], true, 1)],
            CommandFlags::STRICT,
            Arc::new(AddUserCommand),
        )?,
        CommandInfo::new(
            "grant",
            ShellType::Admin,
            "Puts a user into a group",
            vec![CommandArgumentInfo::new(&["grant <user> <group>"], true, 2)],
            CommandFlags::STRICT,
            Arc::new(GrantCommand),
        )?,
        CommandInfo::new(
            "revoke",
            ShellType::Admin,
            "Removes a user from a group",
            vec![CommandArgumentInfo::new(&["revoke <user> <group>"], true, 2)],
            CommandFlags::STRICT,
            Arc::new(RevokeCommand),
        )?,
    ]);
    Ok(commands)
}
