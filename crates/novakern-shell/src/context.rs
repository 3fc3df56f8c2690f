//! The kernel context: every piece of mutable kernel state in one owned
//! object, threaded explicitly through the shell machinery instead of
//! living in globals.

use std::collections::HashMap;
use std::sync::Arc;

use novakern_events::EventHub;
use novakern_types::translate::{EnglishTranslator, SharedTranslator};
use novakern_types::{CancellationToken, KernelConfig};
use novakern_users::UserDirectory;

use crate::mods::ModRegistry;
use crate::registry::ShellRegistry;

/// Owned kernel state shared by every shell on the stack.
pub struct KernelContext {
    pub config: KernelConfig,
    pub translator: SharedTranslator,
    pub users: UserDirectory,
    pub events: EventHub,
    pub shells: ShellRegistry,
    pub mods: ModRegistry,
    /// Session-wide shell variables, shared across nested shells.
    pub variables: HashMap<String, String>,
    /// Cooperative interrupt for the innermost blocking read.
    pub cancel: CancellationToken,
}

impl KernelContext {
    /// Build a context from configuration with the English translator.
    pub fn new(config: KernelConfig) -> Self {
        let users = UserDirectory::new(&config.current_user);
        Self {
            config,
            translator: Arc::new(EnglishTranslator),
            users,
            events: EventHub::new(),
            shells: ShellRegistry::new(),
            mods: ModRegistry::new(),
            variables: HashMap::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Swap in a different translation facade.
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = translator;
        self
    }
}
