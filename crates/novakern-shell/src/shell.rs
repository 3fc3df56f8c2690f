//! The per-shell state machine.
//!
//! A shell moves `NotStarted -> Running -> Bailed`. Initialization failure
//! of the expected kind (a missing target file, a denied entry) bails the
//! shell gracefully before the read loop starts; only programming faults
//! return errors, which the manager propagates after restoring the stack.

use std::any::Any;

use novakern_types::translate::Translator;
use novakern_types::Result;

use crate::command::ShellType;
use crate::io::TerminalSink;

/// Lifecycle states of one shell execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    NotStarted,
    Running,
    Bailed,
}

/// Instance-scoped mutable state a shell exposes to its commands.
///
/// File-editing shells keep the open buffer here; plain shells use
/// [`NullSession`]. Sessions are constructed on stack push and dropped on
/// pop, so no state leaks across shell invocations.
pub trait ShellSession: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Session for shells without shell-specific state.
pub struct NullSession;

impl ShellSession for NullSession {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Output facilities available during shell setup and teardown.
pub struct ShellIo<'a> {
    pub sink: &'a mut dyn TerminalSink,
    pub translator: &'a dyn Translator,
}

impl ShellIo<'_> {
    /// Translate a message template and print it.
    pub fn print(&mut self, template: &str) {
        let text = self.translator.translate(template);
        self.sink.print_line(&text);
    }

    /// Print text verbatim.
    pub fn print_raw(&mut self, text: &str) {
        self.sink.print_line(text);
    }
}

/// One shell execution: setup, bail flag, session state, and teardown.
///
/// The read/dispatch loop itself is owned by the shell manager; shells
/// supply the pieces the loop needs.
pub trait BaseShell {
    /// The shell type this instance executes as.
    fn shell_type(&self) -> ShellType;

    /// Consume startup arguments and prepare shell-specific context.
    ///
    /// Expected setup failures print a message and set the bail flag
    /// (graceful degradation); an `Err` is an unrecoverable fault.
    fn initialize(&mut self, args: &[String], io: &mut ShellIo<'_>) -> Result<()>;

    /// Whether the shell has requested to leave its loop.
    fn bail(&self) -> bool;

    /// Request that the loop exits at the next iteration boundary.
    fn request_bail(&mut self);

    /// The instance session commands may downcast.
    fn session(&mut self) -> &mut dyn ShellSession;

    /// Shell-specific teardown once the loop has bailed.
    fn teardown(&mut self, _io: &mut ShellIo<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_session_downcasts_to_itself() {
        let mut session = NullSession;
        assert!(session.as_any().downcast_ref::<NullSession>().is_some());
        assert!(session.as_any_mut().downcast_mut::<NullSession>().is_some());
    }
}
