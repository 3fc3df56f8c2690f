//! Commands every built-in shell ships: exit, help, history.

use std::sync::Arc;

use novakern_types::Result;

use crate::command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;

struct ExitCommand;

impl CommandRunner for ExitCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        env.request_bail();
        Ok(0)
    }
}

struct HelpCommand;

impl CommandRunner for HelpCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let catalog = env.help_catalog;
        if let Some(wanted) = args.args.first() {
            let Some(topic) = catalog.iter().find(|t| &t.name == wanted) else {
                env.print("No help is available for that command.");
                return Ok(1);
            };
            env.print_raw(&format!(
                "{}: {}",
                topic.name,
                env.translator.translate(&topic.help)
            ));
            for usage in &topic.usages {
                env.print_raw(&format!("  {usage}"));
            }
            if let Some(extended) = &topic.extended {
                env.print_raw(extended);
            }
            if let Some(mod_id) = &topic.from_mod {
                env.print_raw(&format!("  provided by mod: {mod_id}"));
            }
            return Ok(0);
        }

        for topic in catalog {
            let origin = match &topic.from_mod {
                Some(mod_id) => format!(" [{mod_id}]"),
                None => String::new(),
            };
            env.print_raw(&format!(
                "{}{origin} - {}",
                topic.name,
                env.translator.translate(&topic.help)
            ));
        }
        Ok(0)
    }

    fn help_helper(&self) -> Option<String> {
        Some("Without arguments, lists every command of the current shell.".to_string())
    }
}

struct HistoryCommand;

impl CommandRunner for HistoryCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let history = env.history;
        for (index, line) in history.iter().enumerate() {
            env.print_raw(&format!("{:>4}  {line}", index + 1));
        }
        Ok(0)
    }
}

/// The exit/help/history trio for one shell type.
pub fn common_commands(shell_type: ShellType) -> Result<Vec<CommandInfo>> {
    Ok(vec![
        CommandInfo::new(
            "exit",
            shell_type.clone(),
            "Exits the shell",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(ExitCommand),
        )?,
        CommandInfo::new(
            "help",
            shell_type.clone(),
            "Shows command help",
            vec![CommandArgumentInfo::new(&["help [command]"], false, 0)],
            CommandFlags::NONE,
            Arc::new(HelpCommand),
        )?,
        CommandInfo::new(
            "history",
            shell_type,
            "Shows the lines entered in this shell",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(HistoryCommand),
        )?,
    ])
}
