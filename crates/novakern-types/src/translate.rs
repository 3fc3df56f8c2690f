//! Translation facade.
//!
//! The kernel passes every user-facing message template through a
//! [`Translator`] before display. The core never assumes a locale; the
//! default implementation returns templates unchanged.

use std::sync::Arc;

/// Translates untranslated message templates for display.
pub trait Translator: Send + Sync {
    /// Translate one message template.
    fn translate(&self, template: &str) -> String;
}

/// Identity translator used when no language pack is installed.
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, template: &str) -> String {
        template.to_string()
    }
}

/// Shared translator handle.
pub type SharedTranslator = Arc<dyn Translator>;
