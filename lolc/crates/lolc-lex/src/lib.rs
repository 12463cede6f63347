//! lolc-lex - Lexical analysis for LOLCODE source.
//!
//! The lexer consumes a source byte buffer and yields a finite ordered
//! sequence of [`LexedToken`]s ending with a single [`Token::Eof`]. It
//! never aborts: malformed input becomes [`Token::Illegal`] tokens with a
//! cause, in sequence, with positions preserved, so the parser can keep
//! going and report everything at once.
//!
//! Comment tokens (`BTW`, `OBTW`…`TLDR`) are scanned but dropped from the
//! emitted sequence; `Newline` tokens are preserved because they terminate
//! statements.
//!
//! # Example
//!
//! ```
//! use lolc_lex::{lex, Token};
//!
//! let tokens = lex(b"HAI 1.2\nKTHXBYE");
//! assert_eq!(tokens.last().unwrap().token, Token::Eof);
//! assert!(!lolc_lex::has_errors(&tokens));
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use lexer::Lexer;
pub use token::{keyword_from_word, IllegalReason, LexedToken, Token};

/// Lex a whole buffer: drive the lexer to `Eof`, drop comment tokens, and
/// index the survivors. The returned sequence always ends with exactly one
/// `Eof` token.
pub fn lex(source: &[u8]) -> Vec<LexedToken> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let (token, span) = lexer.next_token();
        let done = token == Token::Eof;
        if !token.is_comment() {
            tokens.push(LexedToken {
                token,
                start: span.start,
                end: span.end,
                index: tokens.len(),
            });
        }
        if done {
            break;
        }
    }

    tokens
}

/// True if the sequence contains any `Illegal` token.
pub fn has_errors(tokens: &[LexedToken]) -> bool {
    first_error(tokens).is_some()
}

/// The cause of the first `Illegal` token, if any.
pub fn first_error(tokens: &[LexedToken]) -> Option<IllegalReason> {
    tokens.iter().find_map(|t| match t.token {
        Token::Illegal(reason) => Some(reason),
        _ => None,
    })
}
