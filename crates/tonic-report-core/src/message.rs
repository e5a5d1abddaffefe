//! Dual-rendering log message capability.

use serde_json::{Map, Value};

/// Default width, in columns, of tables rendered for a terminal.
pub const TERM_WIDTH: usize = 80;

/// A log record that can render itself for humans and for machines.
///
/// Implementations must be pure: rendering twice yields identical output.
pub trait Message {
    /// Multi-line, optionally colorized text for an interactive terminal.
    fn render_terminal(&self) -> String;

    /// Structured field map for JSON log ingestion.
    fn render_structured(&self) -> Map<String, Value>;
}

impl<M: Message + ?Sized> Message for &M {
    fn render_terminal(&self) -> String {
        (**self).render_terminal()
    }

    fn render_structured(&self) -> Map<String, Value> {
        (**self).render_structured()
    }
}
