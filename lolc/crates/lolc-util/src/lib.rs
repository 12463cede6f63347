//! lolc-util - Shared infrastructure for the lolc compiler.
//!
//! This crate carries the pieces every phase needs: source spans,
//! diagnostics, and string interning. It deliberately knows nothing about
//! tokens, syntax, or the IR; those live in the phase crates that depend
//! on this one.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::SymbolError;
pub use span::Span;
pub use symbol::Symbol;

// Fast hash maps, used for keyword tables and variable slots.
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
