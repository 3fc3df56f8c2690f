//! The environment handed to every executing command.

use std::collections::HashMap;

use novakern_events::EventHub;
use novakern_types::translate::Translator;
use novakern_types::KernelConfig;
use novakern_users::UserDirectory;

use crate::command::ShellType;
use crate::io::TerminalSink;
use crate::shell::BaseShell;

/// One entry of the help catalog the dispatcher snapshots per invocation.
#[derive(Debug, Clone)]
pub struct HelpTopic {
    pub name: String,
    pub help: String,
    pub usages: Vec<String>,
    /// Id of the owning mod for addon commands.
    pub from_mod: Option<String>,
    /// Extended help supplied by the command's `help_helper`.
    pub extended: Option<String>,
}

/// Shared mutable environment passed to every command body.
///
/// Built fresh by the dispatcher for each invocation from the kernel
/// context and the executing shell, so command state cannot outlive the
/// line that produced it.
pub struct ShellEnvironment<'a> {
    /// The shell type the command executes under.
    pub shell_type: ShellType,
    /// Kernel configuration (read-only to commands).
    pub config: &'a KernelConfig,
    /// Translation facade for user-facing messages.
    pub translator: &'a dyn Translator,
    /// User directory; strict commands consult it, admin commands edit it.
    pub users: &'a mut UserDirectory,
    /// Kernel event hub.
    pub events: &'a mut EventHub,
    /// Output sink.
    pub sink: &'a mut dyn TerminalSink,
    /// Session-wide shell variables.
    pub variables: &'a mut HashMap<String, String>,
    /// Help catalog of the current shell's commands.
    pub help_catalog: &'a [HelpTopic],
    /// Lines entered in this shell so far, oldest first.
    pub history: &'a [String],
    /// Exit code of the previous command.
    pub last_exit_code: i32,
    shell: &'a mut dyn BaseShell,
    pending_shell: &'a mut Option<(String, Vec<String>)>,
}

impl<'a> ShellEnvironment<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: &'a KernelConfig,
        translator: &'a dyn Translator,
        users: &'a mut UserDirectory,
        events: &'a mut EventHub,
        sink: &'a mut dyn TerminalSink,
        variables: &'a mut HashMap<String, String>,
        help_catalog: &'a [HelpTopic],
        history: &'a [String],
        last_exit_code: i32,
        shell: &'a mut dyn BaseShell,
        pending_shell: &'a mut Option<(String, Vec<String>)>,
    ) -> Self {
        Self {
            shell_type: shell.shell_type(),
            config,
            translator,
            users,
            events,
            sink,
            variables,
            help_catalog,
            history,
            last_exit_code,
            shell,
            pending_shell,
        }
    }

    /// Translate a message template and print it.
    pub fn print(&mut self, template: &str) {
        let text = self.translator.translate(template);
        self.sink.print_line(&text);
    }

    /// Print text verbatim (already-translated or data output).
    pub fn print_raw(&mut self, text: &str) {
        self.sink.print_line(text);
    }

    /// Ask the owning shell to leave its loop.
    pub fn request_bail(&mut self) {
        self.shell.request_bail();
    }

    /// Ask the manager to start a nested shell once this command returns.
    pub fn start_shell(&mut self, shell_name: &str, args: &[String]) {
        *self.pending_shell = Some((shell_name.to_string(), args.to_vec()));
    }

    /// Downcast the shell's session to a concrete type.
    pub fn session_as<T: 'static>(&mut self) -> Option<&mut T> {
        self.shell.session().as_any_mut().downcast_mut::<T>()
    }
}
