//! The shell stack and the read/dispatch loop.
//!
//! Shells nest strictly LIFO: starting a shell pushes a stack entry,
//! runs the loop to completion, and pops the entry on every exit path,
//! including initialization faults. A faulting command never unwinds the
//! loop; it is logged and the shell reads the next line.

use std::sync::Arc;

use novakern_events::EventKind;
use novakern_types::Result;

use crate::command::ShellType;
use crate::context::KernelContext;
use crate::dispatch::execute_line;
use crate::io::{LineReader, ReadOutcome, TerminalSink};
use crate::preset::PromptPreset;
use crate::shell::{BaseShell, ShellIo, ShellState};

/// One running shell on the stack.
#[derive(Debug, Clone)]
pub struct ShellStackEntry {
    pub shell_name: String,
    pub shell_type: ShellType,
    pub state: ShellState,
}

/// Owns the stack of nested shells and drives their loops.
#[derive(Default)]
pub struct ShellManager {
    stack: Vec<ShellStackEntry>,
}

impl ShellManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current stack, outermost shell first.
    pub fn stack(&self) -> &[ShellStackEntry] {
        &self.stack
    }

    /// How many shells are currently nested.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Start a shell and run its loop until it bails.
    ///
    /// The stack entry is popped on every exit path, so a shell that
    /// fails to initialize leaves the stack exactly as it found it.
    pub fn start_shell_forced(
        &mut self,
        ctx: &mut KernelContext,
        reader: &mut dyn LineReader,
        sink: &mut dyn TerminalSink,
        shell_name: &str,
        args: &[String],
    ) -> Result<()> {
        let (mut shell, preset) = {
            let info = ctx.shells.shell_info(shell_name)?;
            (info.make_shell(), Arc::clone(info.preset()))
        };

        self.stack.push(ShellStackEntry {
            shell_name: shell_name.to_string(),
            shell_type: shell.shell_type(),
            state: ShellState::NotStarted,
        });
        let slot = self.stack.len() - 1;
        log::debug!("shell {shell_name} pushed, depth {}", self.stack.len());

        let result = self.run_shell(ctx, reader, sink, shell_name, &preset, shell.as_mut(), args, slot);

        self.stack.pop();
        log::debug!("shell {shell_name} popped, depth {}", self.stack.len());
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn run_shell(
        &mut self,
        ctx: &mut KernelContext,
        reader: &mut dyn LineReader,
        sink: &mut dyn TerminalSink,
        shell_name: &str,
        preset: &Arc<dyn PromptPreset>,
        shell: &mut dyn BaseShell,
        args: &[String],
        slot: usize,
    ) -> Result<()> {
        {
            let translator = Arc::clone(&ctx.translator);
            let mut io = ShellIo {
                sink: &mut *sink,
                translator: translator.as_ref(),
            };
            shell.initialize(args, &mut io)?;
        }
        ctx.events
            .fire(EventKind::ShellInitialized, &[shell_name.to_string()]);
        self.stack[slot].state = ShellState::Running;

        // Teardown runs even when the read loop faults, so an editor
        // shell still reports its dirty buffer.
        let loop_result = self.read_loop(ctx, reader, sink, shell_name, preset, shell);

        self.stack[slot].state = ShellState::Bailed;
        {
            let translator = Arc::clone(&ctx.translator);
            let mut io = ShellIo {
                sink: &mut *sink,
                translator: translator.as_ref(),
            };
            shell.teardown(&mut io);
        }
        ctx.events
            .fire(EventKind::ShellBailed, &[shell_name.to_string()]);
        loop_result
    }

    fn read_loop(
        &mut self,
        ctx: &mut KernelContext,
        reader: &mut dyn LineReader,
        sink: &mut dyn TerminalSink,
        shell_name: &str,
        preset: &Arc<dyn PromptPreset>,
        shell: &mut dyn BaseShell,
    ) -> Result<()> {
        let mut history: Vec<String> = Vec::new();
        let mut last_exit_code = 0;

        while !shell.bail() {
            let prompt = preset.render(
                ctx.users.current().name(),
                &ctx.config.hostname,
                &shell.shell_type(),
            );
            match reader.read_line(&prompt)? {
                ReadOutcome::Line(line) => {
                    let mut pending: Option<(String, Vec<String>)> = None;
                    if let Err(e) = execute_line(
                        ctx,
                        shell,
                        shell_name,
                        &line,
                        sink,
                        &mut history,
                        &mut pending,
                        &mut last_exit_code,
                    ) {
                        log::error!("command failed in {shell_name}: {e}");
                        sink.print_line(
                            &ctx.translator.translate("The command has failed. See the kernel log for details."),
                        );
                    }
                    if let Some((nested_name, nested_args)) = pending {
                        if let Err(e) =
                            self.start_shell_forced(ctx, reader, sink, &nested_name, &nested_args)
                        {
                            log::error!("could not start shell {nested_name}: {e}");
                            sink.print_line(
                                &ctx.translator.translate("The requested shell could not be started."),
                            );
                        }
                    }
                },
                ReadOutcome::Cancelled => {
                    log::debug!("cancellation observed in {shell_name}");
                    shell.request_bail();
                },
                ReadOutcome::Eof => shell.request_bail(),
            }
        }
        Ok(())
    }
}
