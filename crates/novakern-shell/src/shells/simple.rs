//! The plain shell used for loops without shell-specific state.

use novakern_types::Result;

use crate::command::ShellType;
use crate::shell::{BaseShell, NullSession, ShellIo, ShellSession};

/// A shell with no setup, no teardown, and no session state.
pub struct SimpleShell {
    shell_type: ShellType,
    session: NullSession,
    bail: bool,
}

impl SimpleShell {
    pub fn new(shell_type: ShellType) -> Self {
        Self {
            shell_type,
            session: NullSession,
            bail: false,
        }
    }
}

impl BaseShell for SimpleShell {
    fn shell_type(&self) -> ShellType {
        self.shell_type.clone()
    }

    fn initialize(&mut self, _args: &[String], _io: &mut ShellIo<'_>) -> Result<()> {
        Ok(())
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
}
