//! Cooperative cancellation.
//!
//! A blocked line read observes the token, unblocks, and bails its shell.
//! Observation consumes the request: the flag clears itself after being
//! seen once, so a later shell is not cancelled by a stale request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable handle over a shared cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The next observer consumes the request.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Observe and consume a pending request.
    ///
    /// Returns `true` exactly once per request.
    pub fn observe(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }

    /// Peek at the flag without consuming it.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
