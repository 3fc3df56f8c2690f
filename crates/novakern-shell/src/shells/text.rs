//! The text editor shell: a line-oriented editor over one open file.

use std::path::PathBuf;
use std::sync::Arc;

use novakern_types::Result;

use crate::command::{
    CommandArgumentInfo, CommandFlags, CommandInfo, CommandRunner, ShellType,
};
use crate::environment::ShellEnvironment;
use crate::parser::ProvidedArguments;
use crate::shell::{BaseShell, ShellIo, ShellSession};

use super::common::common_commands;

/// The open file buffer of one text editor instance.
#[derive(Default)]
pub struct TextSession {
    pub path: PathBuf,
    pub lines: Vec<String>,
    pub dirty: bool,
}

impl ShellSession for TextSession {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Shell wrapping a [`TextSession`]. Bails during setup when no file can
/// be opened.
#[derive(Default)]
pub struct TextShell {
    session: TextSession,
    bail: bool,
}

impl BaseShell for TextShell {
    fn shell_type(&self) -> ShellType {
        ShellType::Text
    }

    fn initialize(&mut self, args: &[String], io: &mut ShellIo<'_>) -> Result<()> {
        let Some(path) = args.first() else {
            io.print("The text editor needs a file to open.");
            self.bail = true;
            return Ok(());
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.session = TextSession {
                    path: PathBuf::from(path),
                    lines: text.lines().map(str::to_string).collect(),
                    dirty: false,
                };
                log::debug!("text editor opened {path}");
                Ok(())
            },
            Err(e) => {
                io.print_raw(&format!("{path}: {e}"));
                self.bail = true;
                Ok(())
            },
        }
    }

    fn bail(&self) -> bool {
        self.bail
    }

    fn request_bail(&mut self) {
        self.bail = true;
    }

    fn session(&mut self) -> &mut dyn ShellSession {
        &mut self.session
    }

    fn teardown(&mut self, io: &mut ShellIo<'_>) {
        if self.session.dirty {
            io.print("Unsaved changes were discarded.");
        }
    }
}

struct PrintCommand;

impl CommandRunner for PrintCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some(session) = env.session_as::<TextSession>() else {
            env.print("This command only works inside the text editor.");
            return Ok(1);
        };
        let lines: Vec<String> = session
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| format!("{:>4}  {line}", index + 1))
            .collect();
        for line in lines {
            env.print_raw(&line);
        }
        Ok(0)
    }
}

struct AddLineCommand;

impl CommandRunner for AddLineCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some(session) = env.session_as::<TextSession>() else {
            env.print("This command only works inside the text editor.");
            return Ok(1);
        };
        session.lines.push(args.args.join(" "));
        session.dirty = true;
        Ok(0)
    }
}

struct DelLineCommand;

impl CommandRunner for DelLineCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let number = match args.args.first().map(|a| a.parse::<usize>()) {
            Some(Ok(n)) if n >= 1 => n,
            _ => {
                env.print("delline needs a line number starting at 1.");
                return Ok(1);
            },
        };
        let Some(session) = env.session_as::<TextSession>() else {
            env.print("This command only works inside the text editor.");
            return Ok(1);
        };
        if number > session.lines.len() {
            env.print("No line with that number exists.");
            return Ok(1);
        }
        session.lines.remove(number - 1);
        session.dirty = true;
        Ok(0)
    }
}

struct SaveCommand;

impl CommandRunner for SaveCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let (path, contents) = {
            let Some(session) = env.session_as::<TextSession>() else {
                env.print("This command only works inside the text editor.");
                return Ok(1);
            };
            let mut text = session.lines.join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            (session.path.clone(), text)
        };
        // Write failures are reported to the operator; the buffer stays
        // dirty so a retry is possible.
        if let Err(e) = std::fs::write(&path, contents) {
            env.print_raw(&format!("{}: {e}", path.display()));
            return Ok(1);
        }
        if let Some(session) = env.session_as::<TextSession>() {
            session.dirty = false;
        }
        env.print("The file has been saved.");
        Ok(0)
    }
}

/// The command set of the text editor shell.
pub fn text_commands() -> Result<Vec<CommandInfo>> {
    let mut commands = common_commands(ShellType::Text)?;
    commands.extend([
        CommandInfo::new(
            "print",
            ShellType::Text,
            "Prints the buffer with line numbers",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(PrintCommand),
        )?,
        CommandInfo::new(
            "addline",
            ShellType::Text,
            "Appends a line to the buffer",
            vec![CommandArgumentInfo::new(&["addline <text...>"], true, 1)],
            CommandFlags::NONE,
            Arc::new(AddLineCommand),
        )?,
        CommandInfo::new(
            "delline",
            ShellType::Text,
            "Deletes a line from the buffer",
            vec![CommandArgumentInfo::new(&["delline <number>"], true, 1)],
            CommandFlags::NONE,
            Arc::new(DelLineCommand),
        )?,
        CommandInfo::new(
            "save",
            ShellType::Text,
            "Writes the buffer back to the file",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(SaveCommand),
        )?,
    ]);
    Ok(commands)
}
