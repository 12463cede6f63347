//! Token definitions for the LOLCODE lexer.
//!
//! The vocabulary is keyword-heavy: nearly every construct in the language
//! is introduced by one or more reserved words, and multi-word operators
//! (`SUM OF`, `BOTH SAEM`, `I HAS A`) are assembled by the parser from the
//! individual keyword tokens produced here.

use lolc_util::{Span, Symbol};

/// Why a token was classified as [`Token::Illegal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalReason {
    /// A word or sequence the lexer has no rule for.
    UnrecognizedToken,
    /// A byte that cannot start any token.
    UnexpectedToken,
    /// Internal lexer invariant violated.
    CompilerError,
    /// `OBTW` with no closing `TLDR` before end of input.
    UnterminatedMultilineComment,
    /// A string literal with no closing quote on its line.
    UnterminatedString,
    /// Catch-all cause.
    Unknown,
}

impl IllegalReason {
    /// Human-readable cause, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            IllegalReason::UnrecognizedToken => "unrecognized token",
            IllegalReason::UnexpectedToken => "unexpected token",
            IllegalReason::CompilerError => "internal lexer error",
            IllegalReason::UnterminatedMultilineComment => "unterminated multi-line comment",
            IllegalReason::UnterminatedString => "unterminated string literal",
            IllegalReason::Unknown => "unknown lexical error",
        }
    }
}

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // Structural
    Eof,
    Comma,
    Exclamation,
    Question,
    Newline,
    Illegal(IllegalReason),

    // Comment markers. These never survive into the parsed token stream;
    // `lex` drops them after scanning.
    SingleLineComment,
    MultiLineComment(String),

    // Literal values. Numeric literals keep their lexeme; the string
    // payload carries escape-resolved bytes.
    NumberLiteral(String),
    NumbarLiteral(String),
    StringLiteral(Vec<u8>),
    Win,
    Fail,

    // Type keywords
    Number,
    Numbar,
    Troof,
    Yarn,
    Noob,

    // Reserved words
    Hai,
    Kthxbye,
    I,
    Has,
    A,
    R,
    Itz,
    An,
    Sum,
    Of,
    Diff,
    Produkt,
    Quoshunt,
    Mod,
    Biggr,
    Smallr,
    Both,
    Either,
    Won,
    Not,
    All,
    Any,
    Mkay,
    Saem,
    Diffrint,
    Smoosh,
    Maek,
    Is,
    Now,
    Visible,
    Gimmeh,
    It,
    O,
    Rly,
    Ya,
    No,
    Wai,
    Oic,
    Mebbe,
    Wtf,
    Omg,
    Gtfo,
    Omgwtf,
    Im,
    Yr,
    In,
    Til,
    Wile,
    Outta,
    How,
    Iz,
    If,
    U,
    Say,
    So,

    /// Any alphanumeric/underscore word that is not a reserved word.
    Ident(Symbol),
}

/// Classify a scanned word as a keyword, or `None` for an identifier.
pub fn keyword_from_word(word: &str) -> Option<Token> {
    let token = match word {
        "WIN" => Token::Win,
        "FAIL" => Token::Fail,
        "NUMBER" => Token::Number,
        "NUMBAR" => Token::Numbar,
        "TROOF" => Token::Troof,
        "YARN" => Token::Yarn,
        "NOOB" => Token::Noob,
        "HAI" => Token::Hai,
        "KTHXBYE" => Token::Kthxbye,
        "I" => Token::I,
        "HAS" => Token::Has,
        "A" => Token::A,
        "R" => Token::R,
        "ITZ" => Token::Itz,
        "AN" => Token::An,
        "SUM" => Token::Sum,
        "OF" => Token::Of,
        "DIFF" => Token::Diff,
        "PRODUKT" => Token::Produkt,
        "QUOSHUNT" => Token::Quoshunt,
        "MOD" => Token::Mod,
        "BIGGR" => Token::Biggr,
        "SMALLR" => Token::Smallr,
        "BOTH" => Token::Both,
        "EITHER" => Token::Either,
        "WON" => Token::Won,
        "NOT" => Token::Not,
        "ALL" => Token::All,
        "ANY" => Token::Any,
        "MKAY" => Token::Mkay,
        "SAEM" => Token::Saem,
        "DIFFRINT" => Token::Diffrint,
        "SMOOSH" => Token::Smoosh,
        "MAEK" => Token::Maek,
        "IS" => Token::Is,
        "NOW" => Token::Now,
        "VISIBLE" => Token::Visible,
        "GIMMEH" => Token::Gimmeh,
        "IT" => Token::It,
        "O" => Token::O,
        "RLY" => Token::Rly,
        "YA" => Token::Ya,
        "NO" => Token::No,
        "WAI" => Token::Wai,
        "OIC" => Token::Oic,
        "MEBBE" => Token::Mebbe,
        "WTF" => Token::Wtf,
        "OMG" => Token::Omg,
        "GTFO" => Token::Gtfo,
        "OMGWTF" => Token::Omgwtf,
        "IM" => Token::Im,
        "YR" => Token::Yr,
        "IN" => Token::In,
        "TIL" => Token::Til,
        "WILE" => Token::Wile,
        "OUTTA" => Token::Outta,
        "HOW" => Token::How,
        "IZ" => Token::Iz,
        "IF" => Token::If,
        "U" => Token::U,
        "SAY" => Token::Say,
        "SO" => Token::So,
        _ => return None,
    };
    Some(token)
}

impl Token {
    /// True if the two tokens are the same variant, payload ignored.
    pub fn same_kind(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// True for the comment-marker tokens dropped from the lexed stream.
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Token::SingleLineComment | Token::MultiLineComment(_)
        )
    }

    /// True for the `NUMBER`/`NUMBAR`/`TROOF`/`YARN`/`NOOB` keywords.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Token::Number | Token::Numbar | Token::Troof | Token::Yarn | Token::Noob
        )
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Eof => "end of input".to_string(),
            Token::Comma => "','".to_string(),
            Token::Exclamation => "'!'".to_string(),
            Token::Question => "'?'".to_string(),
            Token::Newline => "newline".to_string(),
            Token::Illegal(reason) => reason.describe().to_string(),
            Token::SingleLineComment => "comment".to_string(),
            Token::MultiLineComment(_) => "comment".to_string(),
            Token::NumberLiteral(lexeme) => format!("number literal '{}'", lexeme),
            Token::NumbarLiteral(lexeme) => format!("numbar literal '{}'", lexeme),
            Token::StringLiteral(_) => "string literal".to_string(),
            Token::Ident(name) => format!("identifier '{}'", name),
            keyword => format!("'{}'", keyword.keyword_text()),
        }
    }

    /// The source text of a keyword token; empty for non-keywords.
    pub fn keyword_text(&self) -> &'static str {
        match self {
            Token::Win => "WIN",
            Token::Fail => "FAIL",
            Token::Number => "NUMBER",
            Token::Numbar => "NUMBAR",
            Token::Troof => "TROOF",
            Token::Yarn => "YARN",
            Token::Noob => "NOOB",
            Token::Hai => "HAI",
            Token::Kthxbye => "KTHXBYE",
            Token::I => "I",
            Token::Has => "HAS",
            Token::A => "A",
            Token::R => "R",
            Token::Itz => "ITZ",
            Token::An => "AN",
            Token::Sum => "SUM",
            Token::Of => "OF",
            Token::Diff => "DIFF",
            Token::Produkt => "PRODUKT",
            Token::Quoshunt => "QUOSHUNT",
            Token::Mod => "MOD",
            Token::Biggr => "BIGGR",
            Token::Smallr => "SMALLR",
            Token::Both => "BOTH",
            Token::Either => "EITHER",
            Token::Won => "WON",
            Token::Not => "NOT",
            Token::All => "ALL",
            Token::Any => "ANY",
            Token::Mkay => "MKAY",
            Token::Saem => "SAEM",
            Token::Diffrint => "DIFFRINT",
            Token::Smoosh => "SMOOSH",
            Token::Maek => "MAEK",
            Token::Is => "IS",
            Token::Now => "NOW",
            Token::Visible => "VISIBLE",
            Token::Gimmeh => "GIMMEH",
            Token::It => "IT",
            Token::O => "O",
            Token::Rly => "RLY",
            Token::Ya => "YA",
            Token::No => "NO",
            Token::Wai => "WAI",
            Token::Oic => "OIC",
            Token::Mebbe => "MEBBE",
            Token::Wtf => "WTF",
            Token::Omg => "OMG",
            Token::Gtfo => "GTFO",
            Token::Omgwtf => "OMGWTF",
            Token::Im => "IM",
            Token::Yr => "YR",
            Token::In => "IN",
            Token::Til => "TIL",
            Token::Wile => "WILE",
            Token::Outta => "OUTTA",
            Token::How => "HOW",
            Token::Iz => "IZ",
            Token::If => "IF",
            Token::U => "U",
            Token::Say => "SAY",
            Token::So => "SO",
            _ => "",
        }
    }
}

/// A token together with its position in the source and the stream.
#[derive(Clone, Debug, PartialEq)]
pub struct LexedToken {
    /// The token itself.
    pub token: Token,
    /// Start byte offset in the source buffer.
    pub start: usize,
    /// End byte offset in the source buffer (exclusive).
    pub end: usize,
    /// Position in the emitted token sequence.
    pub index: usize,
}

impl LexedToken {
    /// The source span this token covers.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
