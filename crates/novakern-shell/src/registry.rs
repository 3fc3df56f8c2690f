//! Shell and command registries.
//!
//! Every registered shell carries a command table with two namespaces:
//! built-in commands installed when the shell is registered, and mod
//! commands contributed by addons afterwards. Built-ins are never
//! shadowed: duplicate registration is rejected, and only mod commands
//! can be unregistered.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use novakern_types::{KernelError, Result};

use crate::command::CommandInfo;
use crate::preset::{DefaultPreset, PromptPreset};
use crate::shell::BaseShell;

/// A mod-contributed command and its owning mod.
#[derive(Debug, Clone)]
pub struct ModCommandEntry {
    pub owner: String,
    pub info: CommandInfo,
}

/// A command resolved from a table, with its origin.
pub struct ResolvedCommand<'a> {
    pub info: &'a CommandInfo,
    /// `Some(mod_id)` when the command came from the mod namespace.
    pub mod_owner: Option<&'a str>,
}

/// Per-shell-type command table: built-in and mod namespaces.
#[derive(Default)]
pub struct CommandTable {
    builtin: HashMap<String, CommandInfo>,
    mods: HashMap<String, ModCommandEntry>,
}

impl CommandTable {
    /// Install a built-in command at shell-registration time.
    pub(crate) fn install_builtin(&mut self, info: CommandInfo) -> Result<()> {
        let name = info.command().to_string();
        if self.builtin.contains_key(&name) {
            return Err(KernelError::DuplicateCommand(name));
        }
        self.builtin.insert(name, info);
        Ok(())
    }

    /// Register a mod command. Rejects names already taken by either
    /// namespace so an addon can never shadow a built-in.
    pub fn register_mod_command(&mut self, owner: &str, info: CommandInfo) -> Result<()> {
        let name = info.command().to_string();
        if self.builtin.contains_key(&name) || self.mods.contains_key(&name) {
            return Err(KernelError::DuplicateCommand(name));
        }
        self.mods.insert(
            name,
            ModCommandEntry {
                owner: owner.to_string(),
                info,
            },
        );
        Ok(())
    }

    /// Remove a mod command. Built-in names are refused.
    pub fn unregister_mod_command(&mut self, name: &str) -> Result<ModCommandEntry> {
        if self.builtin.contains_key(name) {
            return Err(KernelError::NotPermitted(format!(
                "{name} is a built-in command"
            )));
        }
        self.mods
            .remove(name)
            .ok_or_else(|| KernelError::Command(format!("no mod command named {name}")))
    }

    /// Resolve a command name, built-ins first.
    pub fn lookup(&self, name: &str) -> Option<ResolvedCommand<'_>> {
        if let Some(info) = self.builtin.get(name) {
            return Some(ResolvedCommand {
                info,
                mod_owner: None,
            });
        }
        self.mods.get(name).map(|entry| ResolvedCommand {
            info: &entry.info,
            mod_owner: Some(entry.owner.as_str()),
        })
    }

    /// Whether either namespace holds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.builtin.contains_key(name) || self.mods.contains_key(name)
    }

    /// The ordered union of both namespaces: built-ins sorted by name,
    /// then mod commands sorted by name.
    pub fn commands(&self) -> Vec<ResolvedCommand<'_>> {
        let mut builtin_names: Vec<&String> = self.builtin.keys().collect();
        builtin_names.sort();
        let mut mod_names: Vec<&String> = self.mods.keys().collect();
        mod_names.sort();

        let mut out = Vec::with_capacity(builtin_names.len() + mod_names.len());
        for name in builtin_names {
            out.push(ResolvedCommand {
                info: &self.builtin[name],
                mod_owner: None,
            });
        }
        for name in mod_names {
            let entry = &self.mods[name];
            out.push(ResolvedCommand {
                info: &entry.info,
                mod_owner: Some(entry.owner.as_str()),
            });
        }
        out
    }

    /// All command names in the table's union order.
    pub fn names(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c.info.command().to_string())
            .collect()
    }
}

/// Factory producing a fresh shell instance for each stack push.
pub type ShellFactory = Box<dyn Fn() -> Box<dyn BaseShell> + Send + Sync>;

/// Everything the kernel knows about one registered shell type.
pub struct ShellInfo {
    name: String,
    commands: CommandTable,
    aliases: HashMap<String, String>,
    preset: Arc<dyn PromptPreset>,
    factory: ShellFactory,
}

impl std::fmt::Debug for ShellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellInfo")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ShellInfo {
    /// Describe a shell with a factory for its instances.
    pub fn new(name: &str, factory: ShellFactory) -> Self {
        Self {
            name: name.to_string(),
            commands: CommandTable::default(),
            aliases: HashMap::new(),
            preset: Arc::new(DefaultPreset),
            factory,
        }
    }

    /// Install the shell's built-in command set.
    pub fn with_commands(mut self, commands: Vec<CommandInfo>) -> Result<Self> {
        for info in commands {
            self.commands.install_builtin(info)?;
        }
        Ok(self)
    }

    /// Add a command alias. Aliases resolve before registry lookup and
    /// never shadow a real command name.
    pub fn with_alias(mut self, alias: &str, target: &str) -> Self {
        self.aliases.insert(alias.to_string(), target.to_string());
        self
    }

    /// Replace the default prompt preset.
    pub fn with_preset(mut self, preset: Arc<dyn PromptPreset>) -> Self {
        self.preset = preset;
        self
    }

    /// The registry key of this shell.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shell's command table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Mutable access for addon command registration.
    pub fn commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    /// The prompt preset.
    pub fn preset(&self) -> &Arc<dyn PromptPreset> {
        &self.preset
    }

    /// Resolve an alias; non-aliases and real command names pass through.
    pub fn resolve_alias<'a>(&'a self, token: &'a str) -> &'a str {
        if self.commands.contains(token) {
            return token;
        }
        self.aliases.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Build a fresh shell instance.
    pub fn make_shell(&self) -> Box<dyn BaseShell> {
        (self.factory)()
    }
}

/// The set of available shells (`AvailableShells`).
///
/// Built-in shell types are installed once at kernel construction and can
/// never be unregistered; addon shells come and go at runtime.
#[derive(Default)]
pub struct ShellRegistry {
    shells: HashMap<String, ShellInfo>,
    builtins: BTreeSet<String>,
}

impl ShellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a built-in shell. Only the kernel composition root calls
    /// this; the name joins the immutable built-in set.
    pub fn install_builtin_shell(&mut self, info: ShellInfo) -> Result<()> {
        let name = info.name().to_string();
        if self.shells.contains_key(&name) {
            return Err(KernelError::ShellAlreadyExists(name));
        }
        self.builtins.insert(name.clone());
        self.shells.insert(name, info);
        Ok(())
    }

    /// Register an addon shell. Collisions with any existing shell,
    /// built-in or not, are rejected.
    pub fn register_shell(&mut self, info: ShellInfo) -> Result<()> {
        let name = info.name().to_string();
        if self.shells.contains_key(&name) {
            return Err(KernelError::ShellAlreadyExists(name));
        }
        log::debug!("addon shell registered: {name}");
        self.shells.insert(name, info);
        Ok(())
    }

    /// Unregister an addon shell. Built-ins are refused, unknown names
    /// surface `NoSuchShell`.
    pub fn unregister_shell(&mut self, name: &str) -> Result<ShellInfo> {
        if self.builtins.contains(name) {
            return Err(KernelError::BuiltinShellRemoval(name.to_string()));
        }
        self.shells
            .remove(name)
            .ok_or_else(|| KernelError::NoSuchShell(name.to_string()))
    }

    /// Look up a shell by name.
    pub fn shell_info(&self, name: &str) -> Result<&ShellInfo> {
        self.shells
            .get(name)
            .ok_or_else(|| KernelError::NoSuchShell(name.to_string()))
    }

    /// Mutable lookup for addon command registration.
    pub fn shell_info_mut(&mut self, name: &str) -> Result<&mut ShellInfo> {
        self.shells
            .get_mut(name)
            .ok_or_else(|| KernelError::NoSuchShell(name.to_string()))
    }

    /// Whether `name` is one of the immutable built-in shells.
    pub fn is_builtin_shell(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    /// Whether any shell is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.shells.contains_key(name)
    }

    /// All registered shell names, sorted.
    pub fn shell_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shells.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandFlags, CommandRunner, ShellType};
    use crate::environment::ShellEnvironment;
    use crate::parser::ProvidedArguments;
    use crate::shell::{NullSession, ShellIo, ShellSession};

    struct Noop;
    impl CommandRunner for Noop {
        fn execute(
            &self,
            _args: &ProvidedArguments,
            _env: &mut ShellEnvironment<'_>,
        ) -> novakern_types::Result<i32> {
            Ok(0)
        }
    }

    struct StubShell(NullSession);
    impl BaseShell for StubShell {
        fn shell_type(&self) -> ShellType {
            ShellType::Shell
        }
        fn initialize(&mut self, _args: &[String], _io: &mut ShellIo<'_>) -> novakern_types::Result<()> {
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

    fn cmd(name: &str) -> CommandInfo {
        CommandInfo::new(
            name,
            ShellType::Shell,
            "a test command",
            Vec::new(),
            CommandFlags::NONE,
            std::sync::Arc::new(Noop),
        )
        .unwrap()
    }

    fn stub_factory() -> ShellFactory {
        Box::new(|| Box::new(StubShell(NullSession)))
    }

    #[test]
    fn duplicate_builtin_is_rejected() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("one")).unwrap();
        let err = table.install_builtin(cmd("one")).unwrap_err();
        assert!(matches!(err, KernelError::DuplicateCommand(_)));
    }

    #[test]
    fn mod_command_cannot_shadow_builtin() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("exit")).unwrap();
        let err = table.register_mod_command("mymod", cmd("exit")).unwrap_err();
        assert!(matches!(err, KernelError::DuplicateCommand(_)));
    }

    #[test]
    fn mod_command_duplicate_across_mods_is_rejected() {
        let mut table = CommandTable::default();
        table.register_mod_command("first", cmd("greet")).unwrap();
        let err = table.register_mod_command("second", cmd("greet")).unwrap_err();
        assert!(matches!(err, KernelError::DuplicateCommand(_)));
    }

    #[test]
    fn unregister_builtin_is_refused() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("exit")).unwrap();
        let err = table.unregister_mod_command("exit").unwrap_err();
        assert!(matches!(err, KernelError::NotPermitted(_)));
    }

    #[test]
    fn lookup_prefers_builtins_and_reports_origin() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("exit")).unwrap();
        table.register_mod_command("mymod", cmd("greet")).unwrap();

        assert!(table.lookup("exit").unwrap().mod_owner.is_none());
        assert_eq!(table.lookup("greet").unwrap().mod_owner, Some("mymod"));
        assert!(table.lookup("missing").is_none());
    }

    #[test]
    fn union_lists_builtins_before_mods_sorted() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("zeta")).unwrap();
        table.install_builtin(cmd("alpha")).unwrap();
        table.register_mod_command("m", cmd("beta")).unwrap();
        assert_eq!(table.names(), ["alpha", "zeta", "beta"]);
    }

    #[test]
    fn register_then_unregister_restores_table() {
        let mut table = CommandTable::default();
        table.install_builtin(cmd("exit")).unwrap();
        let before = table.names();

        table.register_mod_command("m", cmd("greet")).unwrap();
        table.register_mod_command("m", cmd("wave")).unwrap();
        table.unregister_mod_command("greet").unwrap();
        table.unregister_mod_command("wave").unwrap();

        assert_eq!(table.names(), before);
    }

    #[test]
    fn alias_resolves_but_never_shadows() {
        let info = ShellInfo::new("Shell", stub_factory())
            .with_commands(vec![cmd("exit"), cmd("list")])
            .unwrap()
            .with_alias("quit", "exit")
            // Pointless alias: "list" is a real command and wins.
            .with_alias("list", "exit");

        assert_eq!(info.resolve_alias("quit"), "exit");
        assert_eq!(info.resolve_alias("list"), "list");
        assert_eq!(info.resolve_alias("unknown"), "unknown");
    }

    #[test]
    fn builtin_shells_cannot_be_unregistered() {
        let mut reg = ShellRegistry::new();
        reg.install_builtin_shell(ShellInfo::new("Shell", stub_factory()))
            .unwrap();
        assert!(reg.is_builtin_shell("Shell"));
        let err = reg.unregister_shell("Shell").unwrap_err();
        assert!(matches!(err, KernelError::BuiltinShellRemoval(_)));
        assert!(reg.contains("Shell"));
    }

    #[test]
    fn addon_shell_lifecycle() {
        let mut reg = ShellRegistry::new();
        reg.install_builtin_shell(ShellInfo::new("Shell", stub_factory()))
            .unwrap();
        reg.register_shell(ShellInfo::new("MailShell", stub_factory()))
            .unwrap();
        assert!(!reg.is_builtin_shell("MailShell"));

        // A second registration under the same name collides.
        let err = reg
            .register_shell(ShellInfo::new("MailShell", stub_factory()))
            .unwrap_err();
        assert!(matches!(err, KernelError::ShellAlreadyExists(_)));

        reg.unregister_shell("MailShell").unwrap();
        assert!(matches!(
            reg.shell_info("MailShell").unwrap_err(),
            KernelError::NoSuchShell(_)
        ));
    }

    #[test]
    fn addon_shell_cannot_collide_with_builtin_name() {
        let mut reg = ShellRegistry::new();
        reg.install_builtin_shell(ShellInfo::new("Shell", stub_factory()))
            .unwrap();
        let err = reg
            .register_shell(ShellInfo::new("Shell", stub_factory()))
            .unwrap_err();
        assert!(matches!(err, KernelError::ShellAlreadyExists(_)));
    }

    #[test]
    fn shell_names_are_sorted() {
        let mut reg = ShellRegistry::new();
        reg.install_builtin_shell(ShellInfo::new("Shell", stub_factory()))
            .unwrap();
        reg.register_shell(ShellInfo::new("AaaShell", stub_factory()))
            .unwrap();
        assert_eq!(reg.shell_names(), ["AaaShell", "Shell"]);
    }
}
