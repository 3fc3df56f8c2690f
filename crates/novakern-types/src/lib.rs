//! Foundation types for NOVAKERN.
//!
//! This crate contains the platform-agnostic core types shared by all
//! NOVAKERN crates: the error taxonomy, kernel configuration, the
//! translation facade, and the cooperative cancellation token.

pub mod cancel;
pub mod config;
pub mod error;
pub mod translate;

pub use cancel::CancellationToken;
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use translate::{EnglishTranslator, Translator};
