//! Diagnostic module - Error reporting infrastructure.
//!
//! Diagnostics are collected by a [`Handler`] during a phase and rendered
//! at the driver boundary, one per line, as `path:start..end: message`.
//! The handler uses interior mutability so phases can record diagnostics
//! through a shared reference.

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use lolc_util::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// assert_eq!(format!("{}", Level::Warning), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents compilation.
    Error,
    /// A warning that doesn't prevent compilation.
    Warning,
    /// Additional information about a diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with severity and source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Diagnostic severity level.
    pub level: Level,
    /// Main diagnostic message.
    pub message: String,
    /// Source location.
    pub span: Span,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Render as `path:start..end: message`.
    pub fn render(&self, path: &str) -> String {
        format!("{}:{}: {}", path, self.span, self.message)
    }
}

/// Collecting diagnostic handler.
///
/// # Examples
///
/// ```
/// use lolc_util::{Handler, Span};
///
/// let handler = Handler::new();
/// handler.error("unexpected token", Span::new(4, 7));
///
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Record an error.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::error(message, span));
    }

    /// Record a warning.
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.report(Diagnostic::warning(message, span));
    }

    /// True if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics recorded.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Drain all recorded diagnostics, in recording order.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Render every diagnostic against `path`, one line each.
    pub fn render_all(&self, path: &str) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .map(|d| d.render(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_collects_in_order() {
        let handler = Handler::new();
        handler.error("first", Span::new(0, 1));
        handler.warning("second", Span::new(2, 3));
        handler.error("third", Span::new(4, 5));

        let all = handler.take();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].message, "first");
        assert_eq!(all[2].message, "third");
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let handler = Handler::new();
        handler.warning("just a warning", Span::DUMMY);
        assert!(!handler.has_errors());
        assert_eq!(handler.error_count(), 0);
    }

    #[test]
    fn test_render_format() {
        let d = Diagnostic::error("Expected valid statement", Span::new(9, 22));
        assert_eq!(
            d.render("prog.lol"),
            "prog.lol:9..22: Expected valid statement"
        );
    }
}
