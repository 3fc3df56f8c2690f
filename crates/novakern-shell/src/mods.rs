//! Loaded mods and the addon lifecycle.
//!
//! A mod contributes commands to existing shells and may register entire
//! shells of its own. Command names are claimed at registration time: a
//! collision with either namespace is rejected up front, all-or-nothing,
//! so later lookup never has to arbitrate between two owners.

use std::collections::BTreeMap;

use novakern_events::EventKind;
use novakern_types::{KernelError, Result};

use crate::command::CommandInfo;
use crate::context::KernelContext;
use crate::registry::ShellInfo;

/// Identity of a loaded mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

struct LoadedMod {
    info: ModInfo,
    /// (shell name, command name) pairs this mod registered.
    commands: Vec<(String, String)>,
    /// Shell names this mod registered.
    shells: Vec<String>,
}

/// Directory of loaded mods, keyed by id.
#[derive(Default)]
pub struct ModRegistry {
    mods: BTreeMap<String, LoadedMod>,
}

impl ModRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a mod. The id must be unused.
    pub fn install(&mut self, info: ModInfo) -> Result<()> {
        if self.mods.contains_key(&info.id) {
            return Err(KernelError::Command(format!(
                "mod {} is already installed",
                info.id
            )));
        }
        log::info!("mod installed: {} v{}", info.id, info.version);
        self.mods.insert(
            info.id.clone(),
            LoadedMod {
                info,
                commands: Vec::new(),
                shells: Vec::new(),
            },
        );
        Ok(())
    }

    /// Remove a mod's record. The caller tears down its contributions.
    pub fn uninstall(&mut self, id: &str) -> Result<()> {
        self.mods
            .remove(id)
            .map(|_| log::info!("mod uninstalled: {id}"))
            .ok_or_else(|| KernelError::NoSuchMod(id.to_string()))
    }

    /// Metadata of every loaded mod, ordered by id.
    pub fn mods(&self) -> impl Iterator<Item = &ModInfo> {
        self.mods.values().map(|m| &m.info)
    }

    /// Whether a mod with this id is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.mods.contains_key(id)
    }

    fn loaded_mut(&mut self, id: &str) -> Result<&mut LoadedMod> {
        self.mods
            .get_mut(id)
            .ok_or_else(|| KernelError::NoSuchMod(id.to_string()))
    }

    /// Commands a mod has registered, as (shell, command) pairs.
    pub fn commands_of(&self, id: &str) -> Result<&[(String, String)]> {
        self.mods
            .get(id)
            .map(|m| m.commands.as_slice())
            .ok_or_else(|| KernelError::NoSuchMod(id.to_string()))
    }
}

/// Register addon commands on a shell on behalf of a mod.
///
/// Validation is all-or-nothing: if any name collides with an existing
/// command of the target shell, nothing is registered. Each successful
/// registration fires `ModCommandAdded`.
pub fn register_addon_commands(
    ctx: &mut KernelContext,
    mod_id: &str,
    shell_name: &str,
    commands: Vec<CommandInfo>,
) -> Result<()> {
    if !ctx.mods.contains(mod_id) {
        return Err(KernelError::NoSuchMod(mod_id.to_string()));
    }

    {
        let shell = ctx.shells.shell_info(shell_name)?;
        let mut batch = std::collections::BTreeSet::new();
        for info in &commands {
            if shell.commands().contains(info.command()) || !batch.insert(info.command()) {
                return Err(KernelError::DuplicateCommand(info.command().to_string()));
            }
        }
    }

    let shell = ctx.shells.shell_info_mut(shell_name)?;
    let mut added = Vec::with_capacity(commands.len());
    for info in commands {
        let name = info.command().to_string();
        shell.commands_mut().register_mod_command(mod_id, info)?;
        added.push(name);
    }

    let loaded = ctx.mods.loaded_mut(mod_id)?;
    for name in &added {
        loaded
            .commands
            .push((shell_name.to_string(), name.clone()));
    }
    for name in &added {
        ctx.events.fire(
            EventKind::ModCommandAdded,
            &[mod_id.to_string(), shell_name.to_string(), name.clone()],
        );
    }
    Ok(())
}

/// Remove every command a mod registered on one shell.
///
/// Fires `ModCommandRemoved` per removed command.
pub fn unregister_addon_commands(
    ctx: &mut KernelContext,
    mod_id: &str,
    shell_name: &str,
) -> Result<()> {
    let owned: Vec<String> = ctx
        .mods
        .commands_of(mod_id)?
        .iter()
        .filter(|(shell, _)| shell == shell_name)
        .map(|(_, name)| name.clone())
        .collect();

    let shell = ctx.shells.shell_info_mut(shell_name)?;
    for name in &owned {
        shell.commands_mut().unregister_mod_command(name)?;
    }

    let loaded = ctx.mods.loaded_mut(mod_id)?;
    loaded
        .commands
        .retain(|(shell, _)| shell != shell_name);

    for name in &owned {
        ctx.events.fire(
            EventKind::ModCommandRemoved,
            &[mod_id.to_string(), shell_name.to_string(), name.clone()],
        );
    }
    Ok(())
}

/// Register an entire shell contributed by a mod.
pub fn register_addon_shell(
    ctx: &mut KernelContext,
    mod_id: &str,
    shell: ShellInfo,
) -> Result<()> {
    if !ctx.mods.contains(mod_id) {
        return Err(KernelError::NoSuchMod(mod_id.to_string()));
    }
    let name = shell.name().to_string();
    ctx.shells.register_shell(shell)?;
    ctx.mods.loaded_mut(mod_id)?.shells.push(name);
    Ok(())
}

/// Unregister a shell a mod contributed. Built-in shells are refused by
/// the registry.
pub fn unregister_addon_shell(
    ctx: &mut KernelContext,
    mod_id: &str,
    shell_name: &str,
) -> Result<()> {
    ctx.shells.unregister_shell(shell_name)?;
    ctx.mods
        .loaded_mut(mod_id)?
        .shells
        .retain(|s| s != shell_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandFlags, CommandRunner, ShellType};
    use crate::environment::ShellEnvironment;
    use crate::parser::ProvidedArguments;
    use crate::registry::ShellFactory;
    use crate::shell::{BaseShell, NullSession, ShellIo, ShellSession};
    use novakern_types::KernelConfig;
    use std::sync::Arc;

    struct Noop;
    impl CommandRunner for Noop {
        fn execute(
            &self,
            _args: &ProvidedArguments,
            _env: &mut ShellEnvironment<'_>,
        ) -> Result<i32> {
            Ok(0)
        }
    }

    struct StubShell(NullSession);
    impl BaseShell for StubShell {
        fn shell_type(&self) -> ShellType {
            ShellType::Shell
        }
        fn initialize(&mut self, _args: &[String], _io: &mut ShellIo<'_>) -> Result<()> {
            Ok(())
        }
        fn bail(&self) -> bool {
            true
        }
        fn request_bail(&mut self) {}
        fn session(&mut self) -> &mut dyn ShellSession {
            &mut self.0
        }
    }

    fn factory() -> ShellFactory {
        Box::new(|| Box::new(StubShell(NullSession)))
    }

    fn cmd(name: &str) -> CommandInfo {
        CommandInfo::new(
            name,
            ShellType::Shell,
            "test",
            Vec::new(),
            CommandFlags::NONE,
            Arc::new(Noop),
        )
        .unwrap()
    }

    fn demo_mod() -> ModInfo {
        ModInfo {
            id: "demo".to_string(),
            name: "Demo".to_string(),
            version: "1.0.0".to_string(),
        }
    }

    fn ctx_with_shell() -> KernelContext {
        let mut ctx = KernelContext::new(KernelConfig::default());
        ctx.shells
            .install_builtin_shell(
                ShellInfo::new("Shell", factory())
                    .with_commands(vec![cmd("exit")])
                    .unwrap(),
            )
            .unwrap();
        ctx.mods.install(demo_mod()).unwrap();
        ctx
    }

    #[test]
    fn double_install_is_rejected() {
        let mut reg = ModRegistry::new();
        reg.install(demo_mod()).unwrap();
        assert!(reg.install(demo_mod()).is_err());
    }

    #[test]
    fn uninstall_unknown_mod_fails() {
        let mut reg = ModRegistry::new();
        assert!(matches!(
            reg.uninstall("ghost").unwrap_err(),
            KernelError::NoSuchMod(_)
        ));
    }

    #[test]
    fn register_commands_records_ownership_and_fires_events() {
        let mut ctx = ctx_with_shell();
        register_addon_commands(&mut ctx, "demo", "Shell", vec![cmd("greet"), cmd("wave")])
            .unwrap();

        let shell = ctx.shells.shell_info("Shell").unwrap();
        assert_eq!(
            shell.commands().lookup("greet").unwrap().mod_owner,
            Some("demo")
        );
        assert_eq!(
            ctx.mods.commands_of("demo").unwrap(),
            [
                ("Shell".to_string(), "greet".to_string()),
                ("Shell".to_string(), "wave".to_string())
            ]
        );
        let keys: Vec<&str> = ctx
            .events
            .fired_events()
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(keys, ["[0] ModCommandAdded", "[1] ModCommandAdded"]);
    }

    #[test]
    fn collision_registers_nothing() {
        let mut ctx = ctx_with_shell();
        let err =
            register_addon_commands(&mut ctx, "demo", "Shell", vec![cmd("fresh"), cmd("exit")])
                .unwrap_err();
        assert!(matches!(err, KernelError::DuplicateCommand(_)));

        // All-or-nothing: the non-colliding command was not registered.
        let shell = ctx.shells.shell_info("Shell").unwrap();
        assert!(shell.commands().lookup("fresh").is_none());
        assert!(ctx.events.fired_events().is_empty());
    }

    #[test]
    fn register_for_unknown_mod_or_shell_fails() {
        let mut ctx = ctx_with_shell();
        assert!(matches!(
            register_addon_commands(&mut ctx, "ghost", "Shell", vec![cmd("x")]).unwrap_err(),
            KernelError::NoSuchMod(_)
        ));
        assert!(matches!(
            register_addon_commands(&mut ctx, "demo", "NopeShell", vec![cmd("x")]).unwrap_err(),
            KernelError::NoSuchShell(_)
        ));
    }

    #[test]
    fn unregister_removes_only_this_mods_commands() {
        let mut ctx = ctx_with_shell();
        ctx.mods
            .install(ModInfo {
                id: "other".to_string(),
                name: "Other".to_string(),
                version: "0.1.0".to_string(),
            })
            .unwrap();
        register_addon_commands(&mut ctx, "demo", "Shell", vec![cmd("greet")]).unwrap();
        register_addon_commands(&mut ctx, "other", "Shell", vec![cmd("salute")]).unwrap();

        unregister_addon_commands(&mut ctx, "demo", "Shell").unwrap();

        let shell = ctx.shells.shell_info("Shell").unwrap();
        assert!(shell.commands().lookup("greet").is_none());
        assert!(shell.commands().lookup("salute").is_some());
        assert!(ctx.mods.commands_of("demo").unwrap().is_empty());

        let last = ctx.events.fired_events().last().unwrap();
        assert!(last.key.ends_with("ModCommandRemoved"));
        assert_eq!(last.params[2], "greet");
    }

    #[test]
    fn register_then_unregister_restores_command_set() {
        let mut ctx = ctx_with_shell();
        let before = ctx.shells.shell_info("Shell").unwrap().commands().names();

        register_addon_commands(&mut ctx, "demo", "Shell", vec![cmd("a"), cmd("b")]).unwrap();
        unregister_addon_commands(&mut ctx, "demo", "Shell").unwrap();

        let after = ctx.shells.shell_info("Shell").unwrap().commands().names();
        assert_eq!(before, after);
    }

    #[test]
    fn addon_shell_lifecycle() {
        let mut ctx = ctx_with_shell();
        register_addon_shell(&mut ctx, "demo", ShellInfo::new("MailShell", factory())).unwrap();
        assert!(ctx.shells.contains("MailShell"));

        unregister_addon_shell(&mut ctx, "demo", "MailShell").unwrap();
        assert!(!ctx.shells.contains("MailShell"));
    }

    #[test]
    fn addon_shell_cannot_remove_builtin() {
        let mut ctx = ctx_with_shell();
        assert!(matches!(
            unregister_addon_shell(&mut ctx, "demo", "Shell").unwrap_err(),
            KernelError::BuiltinShellRemoval(_)
        ));
        assert!(ctx.shells.contains("Shell"));
    }
}
