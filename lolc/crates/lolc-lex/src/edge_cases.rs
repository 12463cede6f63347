//! Edge case tests for lolc-lex.
