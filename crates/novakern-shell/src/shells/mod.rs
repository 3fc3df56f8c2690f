//! The built-in shells and their command sets.

mod admin;
mod common;
mod debug;
mod hex;
mod main;
mod simple;
mod text;

use std::sync::Arc;

use novakern_types::Result;

use crate::command::ShellType;
use crate::context::KernelContext;
use crate::preset::{BarePreset, DefaultPreset, PromptPreset};
use crate::registry::ShellInfo;

pub use hex::{HexSession, HexShell};
pub use simple::SimpleShell;
pub use text::{TextSession, TextShell};

fn preset_by_name(name: &str) -> Arc<dyn PromptPreset> {
    match name {
        "bare" => Arc::new(BarePreset),
        _ => Arc::new(DefaultPreset),
    }
}

/// Install the five built-in shells into a fresh context.
pub fn register_builtin_shells(ctx: &mut KernelContext) -> Result<()> {
    let preset = preset_by_name(&ctx.config.prompt_preset);

    ctx.shells.install_builtin_shell(
        ShellInfo::new(
            ShellType::Shell.name(),
            Box::new(|| Box::new(SimpleShell::new(ShellType::Shell))),
        )
        .with_commands(main::main_commands()?)?
        .with_alias("quit", "exit")
        .with_preset(Arc::clone(&preset)),
    )?;

    ctx.shells.install_builtin_shell(
        ShellInfo::new(
            ShellType::Admin.name(),
            Box::new(|| Box::new(SimpleShell::new(ShellType::Admin))),
        )
        .with_commands(admin::admin_commands()?)?
        .with_preset(Arc::clone(&preset)),
    )?;

    ctx.shells.install_builtin_shell(
        ShellInfo::new(
            ShellType::Debug.name(),
            Box::new(|| Box::new(SimpleShell::new(ShellType::Debug))),
        )
        .with_commands(debug::debug_commands()?)?
        .with_preset(Arc::clone(&preset)),
    )?;

    ctx.shells.install_builtin_shell(
        ShellInfo::new(ShellType::Text.name(), Box::new(|| Box::<TextShell>::default()))
            .with_commands(text::text_commands()?)?
            .with_preset(Arc::clone(&preset)),
    )?;

    ctx.shells.install_builtin_shell(
        ShellInfo::new(ShellType::Hex.name(), Box::new(|| Box::<HexShell>::default()))
            .with_commands(hex::hex_commands()?)?
            .with_preset(preset),
    )?;

    log::info!("built-in shells registered");
    Ok(())
}
