//! Line dispatch: parse one raw line, resolve the command, enforce
//! flags and permissions, and run the body.
//!
//! Expected outcomes (empty line, unknown command, missing arguments,
//! authorization denial) are tagged variants of [`DispatchOutcome`], not
//! errors. An `Err` from dispatch means a command body or handler hit an
//! unrecoverable fault; the shell loop logs it and keeps running.

use novakern_events::EventKind;
use novakern_types::Result;

use crate::command::{CommandFlags, CommandInfo, ShellType};
use crate::context::KernelContext;
use crate::environment::{HelpTopic, ShellEnvironment};
use crate::io::TerminalSink;
use crate::parser::{check_arguments, parse_line, ArgumentCheck};
use crate::shell::BaseShell;

/// What dispatching one line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The line was empty or whitespace; nothing ran.
    Empty,
    /// The command ran to completion with this exit code.
    Executed(i32),
    /// No command of that name exists in the current shell.
    UnknownCommand(String),
    /// The first declared argument shape was not satisfied.
    InsufficientArguments {
        command: String,
        required: usize,
        supplied: usize,
    },
    /// A strict command was refused for a non-administrator.
    NotAuthorized(String),
    /// The kernel is in maintenance mode and the command opted out.
    MaintenanceRefused(String),
}

fn say(sink: &mut dyn TerminalSink, ctx: &KernelContext, template: &str) {
    sink.print_line(&ctx.translator.translate(template));
}

fn record_history(history: &mut Vec<String>, line: &str, limit: usize) {
    if history.last().map(String::as_str) == Some(line) {
        return;
    }
    history.push(line.to_string());
    while history.len() > limit {
        history.remove(0);
    }
}

fn help_catalog(ctx: &KernelContext, shell_name: &str) -> Result<Vec<HelpTopic>> {
    let shell = ctx.shells.shell_info(shell_name)?;
    Ok(shell
        .commands()
        .commands()
        .iter()
        .map(|resolved| HelpTopic {
            name: resolved.info.command().to_string(),
            help: resolved.info.help_definition().to_string(),
            usages: resolved
                .info
                .arg_info()
                .iter()
                .flat_map(|shape| shape.help_usages().iter().cloned())
                .collect(),
            from_mod: resolved.mod_owner.map(str::to_string),
            extended: resolved.info.runner().help_helper(),
        })
        .collect())
}

// Usage strings are command syntax and are printed untranslated.
fn print_usage(sink: &mut dyn TerminalSink, info: &CommandInfo) {
    for shape in info.arg_info() {
        for usage in shape.help_usages() {
            sink.print_line(&format!("  {usage}"));
        }
    }
}

/// Dispatch one raw line within the given shell.
#[allow(clippy::too_many_arguments)]
pub fn execute_line(
    ctx: &mut KernelContext,
    shell: &mut dyn BaseShell,
    shell_name: &str,
    line: &str,
    sink: &mut dyn TerminalSink,
    history: &mut Vec<String>,
    pending_shell: &mut Option<(String, Vec<String>)>,
    last_exit_code: &mut i32,
) -> Result<DispatchOutcome> {
    let Some(mut provided) = parse_line(line)? else {
        return Ok(DispatchOutcome::Empty);
    };
    record_history(history, line.trim(), ctx.config.history_limit);

    // Resolve command and snapshot everything that needs the registry
    // before the context is split apart for the environment.
    let (info, from_mod) = {
        let shell_info = ctx.shells.shell_info(shell_name)?;
        provided.command = shell_info.resolve_alias(&provided.command).to_string();
        match shell_info.commands().lookup(&provided.command) {
            Some(resolved) => (resolved.info.clone(), resolved.mod_owner.map(str::to_string)),
            None => {
                let msg = ctx
                    .translator
                    .translate("The requested command is not found. Type help for a command list.");
                sink.print_line(&format!("{}: {msg}", provided.command));
                log::debug!("unknown command in {shell_name}: {}", provided.command);
                return Ok(DispatchOutcome::UnknownCommand(provided.command));
            },
        }
    };
    let catalog = help_catalog(ctx, shell_name)?;

    match from_mod {
        None => execute_builtin(
            ctx,
            shell,
            &info,
            &provided,
            sink,
            &catalog,
            history,
            pending_shell,
            last_exit_code,
        ),
        Some(mod_id) => execute_mod(
            ctx,
            shell,
            &mod_id,
            &info,
            &provided,
            sink,
            &catalog,
            history,
            pending_shell,
            last_exit_code,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn execute_builtin(
    ctx: &mut KernelContext,
    shell: &mut dyn BaseShell,
    info: &CommandInfo,
    provided: &crate::parser::ProvidedArguments,
    sink: &mut dyn TerminalSink,
    catalog: &[HelpTopic],
    history: &[String],
    pending_shell: &mut Option<(String, Vec<String>)>,
    last_exit_code: &mut i32,
) -> Result<DispatchOutcome> {
    let flags = info.flags();

    if ctx.config.maintenance && flags.contains(CommandFlags::NO_MAINTENANCE) {
        say(
            sink,
            ctx,
            "This command is unavailable while the kernel runs in maintenance mode.",
        );
        return Ok(DispatchOutcome::MaintenanceRefused(
            info.command().to_string(),
        ));
    }

    if flags.contains(CommandFlags::STRICT) && !ctx.users.current_is_administrator() {
        log::warn!(
            "user {} denied strict command {}",
            ctx.users.current().name(),
            info.command()
        );
        say(
            sink,
            ctx,
            "You don't have permission to use this command.",
        );
        return Ok(DispatchOutcome::NotAuthorized(info.command().to_string()));
    }

    if flags.contains(CommandFlags::OBSOLETE) {
        say(
            sink,
            ctx,
            "This command is obsolete and will be removed in a future release.",
        );
    }

    if let Some(shape) = info.first_shape() {
        if let ArgumentCheck::Insufficient { required, supplied } =
            check_arguments(shape, provided)
        {
            say(sink, ctx, "There was not enough arguments. See below for usage:");
            print_usage(sink, info);
            return Ok(DispatchOutcome::InsufficientArguments {
                command: info.command().to_string(),
                required,
                supplied,
            });
        }
    }

    let code = run_body(
        ctx,
        shell,
        info,
        provided,
        sink,
        catalog,
        history,
        pending_shell,
        *last_exit_code,
    )?;
    *last_exit_code = code;
    Ok(DispatchOutcome::Executed(code))
}

#[allow(clippy::too_many_arguments)]
fn execute_mod(
    ctx: &mut KernelContext,
    shell: &mut dyn BaseShell,
    mod_id: &str,
    info: &CommandInfo,
    provided: &crate::parser::ProvidedArguments,
    sink: &mut dyn TerminalSink,
    catalog: &[HelpTopic],
    history: &[String],
    pending_shell: &mut Option<(String, Vec<String>)>,
    last_exit_code: &mut i32,
) -> Result<DispatchOutcome> {
    ctx.events
        .fire(EventKind::PreExecuteModCommand, &[provided.raw.clone()]);

    // Strict gating of mod commands applies on the main shell only; a
    // mod command targeting another shell type trusts that shell's own
    // entry gate.
    if info.flags().contains(CommandFlags::STRICT)
        && *info.shell_type() == ShellType::Shell
        && !ctx.users.current_is_administrator()
    {
        log::warn!(
            "user {} denied strict mod command {} of {mod_id}",
            ctx.users.current().name(),
            info.command()
        );
        say(
            sink,
            ctx,
            "You don't have permission to use this command.",
        );
        return Ok(DispatchOutcome::NotAuthorized(info.command().to_string()));
    }

    if let Some(shape) = info.first_shape() {
        if let ArgumentCheck::Insufficient { required, supplied } =
            check_arguments(shape, provided)
        {
            say(sink, ctx, "There was not enough arguments. See below for usage:");
            print_usage(sink, info);
            return Ok(DispatchOutcome::InsufficientArguments {
                command: info.command().to_string(),
                required,
                supplied,
            });
        }
    }

    let code = run_body(
        ctx,
        shell,
        info,
        provided,
        sink,
        catalog,
        history,
        pending_shell,
        *last_exit_code,
    )?;
    *last_exit_code = code;

    ctx.events
        .fire(EventKind::PostExecuteModCommand, &[provided.raw.clone()]);
    Ok(DispatchOutcome::Executed(code))
}

#[allow(clippy::too_many_arguments)]
fn run_body(
    ctx: &mut KernelContext,
    shell: &mut dyn BaseShell,
    info: &CommandInfo,
    provided: &crate::parser::ProvidedArguments,
    sink: &mut dyn TerminalSink,
    catalog: &[HelpTopic],
    history: &[String],
    pending_shell: &mut Option<(String, Vec<String>)>,
    last_exit_code: i32,
) -> Result<i32> {
    let mut env = ShellEnvironment::new(
        &ctx.config,
        ctx.translator.as_ref(),
        &mut ctx.users,
        &mut ctx.events,
        sink,
        &mut ctx.variables,
        catalog,
        history,
        last_exit_code,
        shell,
        pending_shell,
    );
    info.runner().execute(provided, &mut env)
}
