//! NOVAKERN interactive shell binary.
//!
//! Loads the kernel configuration, installs the built-in shells, and
//! runs the main shell on the console until it bails.

mod io;

use std::path::PathBuf;

use anyhow::Context;
use novakern_shell::{register_builtin_shells, KernelContext, ShellManager};
use novakern_types::KernelConfig;

use crate::io::{StdinReader, StdoutSink};

fn config_path() -> PathBuf {
    std::env::var_os("NOVAKERN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("novakern.toml"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config_path();
    let config = KernelConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    log::info!(
        "NOVAKERN {} starting as {} on {}",
        env!("CARGO_PKG_VERSION"),
        config.current_user,
        config.hostname
    );

    let mut ctx = KernelContext::new(config);
    register_builtin_shells(&mut ctx).context("failed to register built-in shells")?;

    let mut reader = StdinReader::new(ctx.cancel.clone());
    let mut sink = StdoutSink;
    let mut manager = ShellManager::new();
    manager
        .start_shell_forced(&mut ctx, &mut reader, &mut sink, "Shell", &[])
        .context("main shell terminated with a fault")?;

    log::info!("NOVAKERN shut down cleanly");
    Ok(())
}
