//! The kernel diagnostics shell: event ledger introspection.

use std::sync::Arc;

use novakern_types::Result;

use crate::command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;

use super::common::common_commands;

struct EventsCommand;

impl CommandRunner for EventsCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let lines: Vec<String> = env
            .events
            .fired_events()
            .iter()
            .map(|fired| {
                if fired.params.is_empty() {
                    fired.key.clone()
                } else {
                    format!("{}: {}", fired.key, fired.params.join(", "))
                }
            })
            .collect();
        if lines.is_empty() {
            env.print("No events have fired yet.");
            return Ok(0);
        }
        for line in lines {
            env.print_raw(&line);
        }
        Ok(0)
    }
}

struct ClearEventsCommand;

impl CommandRunner for ClearEventsCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        env.events.clear_all_fired_events();
        env.print("The fired event list has been cleared.");
        Ok(0)
    }
}

struct FireEventCommand;

impl CommandRunner for FireEventCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some((name, params)) = args.args.split_first() else {
            env.print("fireevent needs an event name.");
            return Ok(1);
        };
        // An unknown event name is operator input, not a kernel fault.
        if let Err(e) = env.events.fire_event(name, params) {
            env.print_raw(&format!("{e}"));
            return Ok(1);
        }
        Ok(0)
    }
}

/// The command set of the diagnostics shell.
pub fn debug_commands() -> Result<Vec<CommandInfo>> {
    let mut commands = common_commands(ShellType::Debug)?;
    commands.extend([
        CommandInfo::new(
            "events",
            ShellType::Debug,
            "Dumps the fired event ledger",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(EventsCommand),
        )?,
        CommandInfo::new(
            "clearevents",
            ShellType::Debug,
            "Clears the fired event ledger",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(ClearEventsCommand),
        )?,
        CommandInfo::new(
            "fireevent",
            ShellType::Debug,
            "Fires a kernel event by name",
            vec![CommandArgumentInfo::new(
                &["fireevent <name> [params...]"],
                true,
                1,
            )],
            CommandFlags::NONE,
            Arc::new(FireEventCommand),
        )?,
    ]);
    Ok(commands)
}
