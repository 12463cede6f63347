//! Main lexer implementation for LOLCODE source.
//!
//! The lexer transforms a source byte buffer into tokens. It never aborts:
//! malformed input is classified as [`Token::Illegal`] with a cause, and
//! scanning continues at the next byte, so the whole buffer is always
//! covered.

use lolc_util::{Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{keyword_from_word, IllegalReason, Token};

/// The LOLCODE lexer.
///
/// Tokens are produced one at a time by [`Lexer::next_token`]; the
/// convenience entry point [`crate::lex`] drives the lexer over a whole
/// buffer and applies the comment-dropping post-pass.
///
/// # Example
///
/// ```
/// use lolc_lex::{Lexer, Token};
///
/// let mut lexer = Lexer::new(b"HAI 1.2");
/// assert_eq!(lexer.next_token().0, Token::Hai);
/// assert_eq!(lexer.next_token().0, Token::NumbarLiteral("1.2".into()));
/// assert_eq!(lexer.next_token().0, Token::Eof);
/// ```
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source bytes.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token and the span it covers.
    ///
    /// Space and tab runs between tokens are skipped; line terminators are
    /// tokens in their own right because the parser consumes them as
    /// statement separators.
    pub fn next_token(&mut self) -> (Token, Span) {
        self.skip_blanks();

        let start = self.cursor.pos();

        if self.cursor.is_at_end() {
            return (Token::Eof, Span::new(start, start));
        }

        match self.cursor.ch() {
            b'\n' | b'\r' => {
                self.cursor.read_ch();
                (Token::Newline, Span::new(start, self.cursor.pos()))
            }
            b',' => {
                self.cursor.read_ch();
                (Token::Comma, Span::new(start, self.cursor.pos()))
            }
            b'!' => {
                self.cursor.read_ch();
                (Token::Exclamation, Span::new(start, self.cursor.pos()))
            }
            b'?' => {
                self.cursor.read_ch();
                (Token::Question, Span::new(start, self.cursor.pos()))
            }
            b'"' => self.read_string(start),
            b'0'..=b'9' => self.read_number(start),
            b'-' if self.cursor.peek_ch().is_ascii_digit() => self.read_number(start),
            ch if is_word_start(ch) => self.read_word(start),
            _ => {
                self.cursor.read_ch();
                (
                    Token::Illegal(IllegalReason::UnexpectedToken),
                    Span::new(start, self.cursor.pos()),
                )
            }
        }
    }

    /// Skip spaces and tabs. Line terminators are left in place.
    fn skip_blanks(&mut self) {
        while matches!(self.cursor.ch(), b' ' | b'\t') {
            self.cursor.read_ch();
        }
    }

    /// Scan a numeric literal: optional leading `-`, digits, and at most
    /// one `.`. A second `.` ends the literal before it is consumed.
    fn read_number(&mut self, start: usize) -> (Token, Span) {
        let mut lexeme = String::new();
        let mut seen_dot = false;

        if self.cursor.ch() == b'-' {
            lexeme.push('-');
            self.cursor.read_ch();
        }

        loop {
            match self.cursor.ch() {
                ch @ b'0'..=b'9' => {
                    lexeme.push(ch as char);
                    self.cursor.read_ch();
                }
                b'.' if !seen_dot => {
                    seen_dot = true;
                    lexeme.push('.');
                    self.cursor.read_ch();
                }
                _ => break,
            }
        }

        let span = Span::new(start, self.cursor.pos());
        if seen_dot {
            (Token::NumbarLiteral(lexeme), span)
        } else {
            (Token::NumberLiteral(lexeme), span)
        }
    }

    /// Scan a word and classify it: comment marker, keyword, or
    /// identifier.
    fn read_word(&mut self, start: usize) -> (Token, Span) {
        let mut word = String::new();
        while is_word_continue(self.cursor.ch()) {
            word.push(self.cursor.ch() as char);
            self.cursor.read_ch();
        }

        match word.as_str() {
            "BTW" => self.read_single_line_comment(start),
            "OBTW" => self.read_multi_line_comment(start),
            _ => {
                let token = keyword_from_word(&word)
                    .unwrap_or_else(|| Token::Ident(Symbol::intern(&word)));
                (token, Span::new(start, self.cursor.pos()))
            }
        }
    }

    /// `BTW`: discard the rest of the line. The terminator itself is left
    /// for the next token, so a trailing comment does not swallow the
    /// statement separator.
    fn read_single_line_comment(&mut self, start: usize) -> (Token, Span) {
        while !self.cursor.is_at_end() && !matches!(self.cursor.ch(), b'\n' | b'\r') {
            self.cursor.read_ch();
        }
        (Token::SingleLineComment, Span::new(start, self.cursor.pos()))
    }

    /// `OBTW`: consume through the closing `TLDR`, or classify the rest of
    /// the input as an unterminated comment.
    fn read_multi_line_comment(&mut self, start: usize) -> (Token, Span) {
        const CLOSER: &[u8] = b"TLDR";
        let mut payload = Vec::new();
        let mut matched = 0usize;

        while !self.cursor.is_at_end() {
            let ch = self.cursor.ch();
            self.cursor.read_ch();

            if ch == CLOSER[matched] {
                matched += 1;
                if matched == CLOSER.len() {
                    // Trim the partially-matched closer from the payload.
                    let body = String::from_utf8_lossy(&payload).into_owned();
                    return (
                        Token::MultiLineComment(body),
                        Span::new(start, self.cursor.pos()),
                    );
                }
            } else {
                payload.extend_from_slice(&CLOSER[..matched]);
                matched = if ch == CLOSER[0] { 1 } else { 0 };
                if matched == 0 {
                    payload.push(ch);
                }
            }
        }

        (
            Token::Illegal(IllegalReason::UnterminatedMultilineComment),
            Span::new(start, self.cursor.pos()),
        )
    }

    /// Scan a string literal. A `:` is the escape sentinel: the byte after
    /// it never terminates the string, and the known escapes resolve into
    /// the payload (`:)` newline, `:>` tab, `:"` quote, `::` colon, `:o`
    /// bell); any other escaped byte is taken literally. The literal ends
    /// at an unescaped `"`; a line terminator or end of input first makes
    /// it unterminated.
    fn read_string(&mut self, start: usize) -> (Token, Span) {
        debug_assert_eq!(self.cursor.ch(), b'"');
        self.cursor.read_ch();

        let mut bytes = Vec::new();
        loop {
            match self.cursor.ch() {
                0 | b'\n' | b'\r' => {
                    // Leave the terminator for the next token.
                    return (
                        Token::Illegal(IllegalReason::UnterminatedString),
                        Span::new(start, self.cursor.pos()),
                    );
                }
                b'"' => {
                    self.cursor.read_ch();
                    return (
                        Token::StringLiteral(bytes),
                        Span::new(start, self.cursor.pos()),
                    );
                }
                b':' => {
                    self.cursor.read_ch();
                    let escaped = self.cursor.ch();
                    if escaped == 0 {
                        return (
                            Token::Illegal(IllegalReason::UnterminatedString),
                            Span::new(start, self.cursor.pos()),
                        );
                    }
                    bytes.push(resolve_escape(escaped));
                    self.cursor.read_ch();
                }
                ch => {
                    bytes.push(ch);
                    self.cursor.read_ch();
                }
            }
        }
    }
}

/// Resolve the byte following the `:` escape sentinel.
fn resolve_escape(byte: u8) -> u8 {
    match byte {
        b')' => b'\n',
        b'>' => b'\t',
        b'"' => b'"',
        b':' => b':',
        b'o' => 0x07,
        other => other,
    }
}

fn is_word_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_word_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
