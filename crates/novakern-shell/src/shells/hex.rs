//! The hex editor shell: byte-level editing of one open file.

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

/// The open byte buffer of one hex editor instance.
#[derive(Default)]
pub struct HexSession {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub dirty: bool,
}

impl ShellSession for HexSession {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Shell wrapping a [`HexSession`].
#[derive(Default)]
pub struct HexShell {
    session: HexSession,
    bail: bool,
}

impl BaseShell for HexShell {
    fn shell_type(&self) -> ShellType {
        ShellType::Hex
    }

    fn initialize(&mut self, args: &[String], io: &mut ShellIo<'_>) -> Result<()> {
        let Some(path) = args.first() else {
            io.print("The hex editor needs a file to open.");
            self.bail = true;
            return Ok(());
        };
        match std::fs::read(path) {
            Ok(bytes) => {
                self.session = HexSession {
                    path: PathBuf::from(path),
                    bytes,
                    dirty: false,
                };
                log::debug!("hex editor opened {path}");
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

fn hexdump(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| {
                    if b.is_ascii_graphic() || b == b' ' {
                        b as char
                    } else {
                        '.'
                    }
                })
                .collect();
            format!("{:08x}  {:<47}  |{ascii}|", row * 16, hex.join(" "))
        })
        .collect()
}

struct PrintCommand;

impl CommandRunner for PrintCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let Some(session) = env.session_as::<HexSession>() else {
            env.print("This command only works inside the hex editor.");
            return Ok(1);
        };
        let lines = hexdump(&session.bytes);
        for line in lines {
            env.print_raw(&line);
        }
        Ok(0)
    }
}

struct SetByteCommand;

impl CommandRunner for SetByteCommand {
    fn execute(&self, args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let offset = match args.args.first().map(|a| usize::from_str_radix(a.trim_start_matches("0x"), 16)) {
            Some(Ok(n)) => n,
            _ => {
                env.print("setbyte needs a hexadecimal offset.");
                return Ok(1);
            },
        };
        let value = match args.args.get(1).map(|a| u8::from_str_radix(a.trim_start_matches("0x"), 16)) {
            Some(Ok(v)) => v,
            _ => {
                env.print("setbyte needs a hexadecimal byte value.");
                return Ok(1);
            },
        };
        let Some(session) = env.session_as::<HexSession>() else {
            env.print("This command only works inside the hex editor.");
            return Ok(1);
        };
        let Some(slot) = session.bytes.get_mut(offset) else {
            env.print("The offset is beyond the end of the file.");
            return Ok(1);
        };
        *slot = value;
        session.dirty = true;
        Ok(0)
    }
}

struct SaveCommand;

impl CommandRunner for SaveCommand {
    fn execute(&self, _args: &ProvidedArguments, env: &mut ShellEnvironment<'_>) -> Result<i32> {
        let (path, bytes) = {
            let Some(session) = env.session_as::<HexSession>() else {
                env.print("This command only works inside the hex editor.");
                return Ok(1);
            };
            (session.path.clone(), session.bytes.clone())
        };
        if let Err(e) = std::fs::write(&path, bytes) {
            env.print_raw(&format!("{}: {e}", path.display()));
            return Ok(1);
        }
        if let Some(session) = env.session_as::<HexSession>() {
            session.dirty = false;
        }
        env.print("The file has been saved.");
        Ok(0)
    }
}

/// The command set of the hex editor shell.
pub fn hex_commands() -> Result<Vec<CommandInfo>> {
    let mut commands = common_commands(ShellType::Hex)?;
    commands.extend([
        CommandInfo::new(
            "print",
            ShellType::Hex,
            "Dumps the buffer as hex and ASCII",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(PrintCommand),
        )?,
        CommandInfo::new(
            "setbyte",
            ShellType::Hex,
            "Overwrites one byte at an offset",
            vec![CommandArgumentInfo::new(
                &["setbyte <offset-hex> <value-hex>"],
                true,
                2,
            )],
            CommandFlags::NONE,
            Arc::new(SetByteCommand),
        )?,
        CommandInfo::new(
            "save",
            ShellType::Hex,
            "Writes the buffer back to the file",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(SaveCommand),
        )?,
    ]);
    Ok(commands)
}
