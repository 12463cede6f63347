//! Core error types for lolc-util.

use thiserror::Error;

/// Error type for symbol interning operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    /// Symbol index not present in the interner.
    #[error("Symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Result type alias for symbol operations.
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;
