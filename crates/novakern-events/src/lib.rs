//! Kernel event hub.
//!
//! Events are a fixed, enumerated set. Firing an unknown name fails with
//! `NoSuchEvent` and records nothing. Delivery is synchronous to every
//! registered handler across all loaded mods; a failing handler is logged
//! and never blocks the remaining handlers. Every successful fire appends
//! one entry to the insertion-ordered ledger under a `"[index] EventName"`
//! key with a strictly increasing index.

use novakern_types::{KernelError, Result};

/// The fixed set of kernel events mods may observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PreExecuteModCommand,
    PostExecuteModCommand,
    ShellInitialized,
    ShellBailed,
    ModCommandAdded,
    ModCommandRemoved,
}

impl EventKind {
    /// Every known event, in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::PreExecuteModCommand,
        EventKind::PostExecuteModCommand,
        EventKind::ShellInitialized,
        EventKind::ShellBailed,
        EventKind::ModCommandAdded,
        EventKind::ModCommandRemoved,
    ];

    /// The wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::PreExecuteModCommand => "PreExecuteModCommand",
            EventKind::PostExecuteModCommand => "PostExecuteModCommand",
            EventKind::ShellInitialized => "ShellInitialized",
            EventKind::ShellBailed => "ShellBailed",
            EventKind::ModCommandAdded => "ModCommandAdded",
            EventKind::ModCommandRemoved => "ModCommandRemoved",
        }
    }

    /// Resolve a name to an event, if it is one of the known set.
    pub fn parse(name: &str) -> Option<EventKind> {
        EventKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Handler installed by a mod for one event kind.
pub type EventHandler = Box<dyn Fn(&[String]) -> Result<()> + Send + Sync>;

struct Registration {
    mod_id: String,
    kind: EventKind,
    handler: EventHandler,
}

/// One fired-event record: the generated ledger key and the parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEvent {
    pub key: String,
    pub params: Vec<String>,
}

/// Synchronous event dispatcher with an introspection ledger.
#[derive(Default)]
pub struct EventHub {
    handlers: Vec<Registration>,
    ledger: Vec<FiredEvent>,
    next_index: u64,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler on behalf of a mod.
    pub fn register_handler(&mut self, mod_id: &str, kind: EventKind, handler: EventHandler) {
        self.handlers.push(Registration {
            mod_id: mod_id.to_string(),
            kind,
            handler,
        });
    }

    /// Remove every handler a mod installed. Used when the mod unloads.
    pub fn unregister_mod_handlers(&mut self, mod_id: &str) {
        self.handlers.retain(|r| r.mod_id != mod_id);
    }

    /// Fire an event by name.
    ///
    /// Unknown names fail with `NoSuchEvent` and add no ledger entry.
    pub fn fire_event(&mut self, name: &str, params: &[String]) -> Result<()> {
        let kind = EventKind::parse(name)
            .ok_or_else(|| KernelError::NoSuchEvent(name.to_string()))?;
        self.fire(kind, params);
        Ok(())
    }

    /// Fire a known event.
    pub fn fire(&mut self, kind: EventKind, params: &[String]) {
        let key = format!("[{}] {}", self.next_index, kind.name());
        self.next_index += 1;
        self.ledger.push(FiredEvent {
            key,
            params: params.to_vec(),
        });
        log::debug!("event {} fired with {} param(s)", kind.name(), params.len());

        for reg in self.handlers.iter().filter(|r| r.kind == kind) {
            if let Err(e) = (reg.handler)(params) {
                // One broken mod must not block the others.
                log::error!(
                    "handler of mod {} failed on {}: {e}",
                    reg.mod_id,
                    kind.name()
                );
            }
        }
    }

    /// The ledger of fired events, oldest first.
    pub fn fired_events(&self) -> &[FiredEvent] {
        &self.ledger
    }

    /// Clear the ledger and restart the key index.
    pub fn clear_all_fired_events(&mut self) {
        self.ledger.clear();
        self.next_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::parse("NotAnEvent"), None);
    }

    #[test]
    fn ledger_keys_are_strictly_increasing() {
        let mut hub = EventHub::new();
        for _ in 0..3 {
            hub.fire(EventKind::ShellInitialized, &[]);
        }
        let keys: Vec<&str> = hub.fired_events().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "[0] ShellInitialized",
                "[1] ShellInitialized",
                "[2] ShellInitialized"
            ]
        );
    }

    #[test]
    fn ledger_records_params() {
        let mut hub = EventHub::new();
        hub.fire(EventKind::PreExecuteModCommand, &["mycmd arg".to_string()]);
        let fired = hub.fired_events();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].params, vec!["mycmd arg".to_string()]);
    }

    #[test]
    fn unknown_event_fails_and_records_nothing() {
        let mut hub = EventHub::new();
        let err = hub.fire_event("Bogus", &[]).unwrap_err();
        assert!(matches!(err, KernelError::NoSuchEvent(_)));
        assert!(hub.fired_events().is_empty());
    }

    #[test]
    fn clear_empties_ledger_and_restarts_index() {
        let mut hub = EventHub::new();
        hub.fire(EventKind::ShellBailed, &[]);
        hub.clear_all_fired_events();
        assert!(hub.fired_events().is_empty());
        hub.fire(EventKind::ShellBailed, &[]);
        assert_eq!(hub.fired_events()[0].key, "[0] ShellBailed");
    }

    #[test]
    fn handlers_receive_events() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let mut hub = EventHub::new();
        hub.register_handler(
            "demo",
            EventKind::ModCommandAdded,
            Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        hub.fire(EventKind::ModCommandAdded, &[]);
        hub.fire(EventKind::ModCommandRemoved, &[]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_handler_does_not_block_others() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let mut hub = EventHub::new();
        hub.register_handler(
            "broken",
            EventKind::ShellBailed,
            Box::new(|_| Err(KernelError::Command("handler exploded".into()))),
        );
        hub.register_handler(
            "healthy",
            EventKind::ShellBailed,
            Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        hub.fire(EventKind::ShellBailed, &[]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_mod_handlers_removes_only_that_mod() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let mut hub = EventHub::new();
        hub.register_handler("gone", EventKind::ShellBailed, Box::new(|_| Ok(())));
        hub.register_handler(
            "kept",
            EventKind::ShellBailed,
            Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        hub.unregister_mod_handlers("gone");
        hub.fire(EventKind::ShellBailed, &[]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
