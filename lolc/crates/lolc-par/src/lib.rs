//! lolc-par - Parser (Syntactic Analyzer)
//!
//! ============================================================================
//! PARSING STRATEGY
//! ============================================================================
//!
//! The parser is a backtracking recursive-descent parser over the lexed
//! token sequence. Each production captures the cursor on entry and, on
//! failure, resets it - restoring both the position and the per-token
//! consumption marks - so alternatives can be tried transactionally
//! without an undo log.
//!
//! ERROR DISCIPLINE:
//! -----------------
//! The parser always completes and returns a `Program` plus an error
//! list; no failure is fatal to the pass. Because many alternatives are
//! attempted per statement, raw failures would flood the user with
//! speculative diagnostics. Every error is therefore tagged with the
//! recursion depth (`level`) at which it was recorded, and a two-pass
//! filter runs after parsing:
//!
//! 1. Drop errors attached to a token that some production matched at
//!    any point - a successful match elsewhere means the alternative
//!    that complained was speculative.
//! 2. Drop errors that share their level with another error at the same
//!    level, except at the outermost (statement) level - sibling
//!    alternatives failing at equal depth cancel out, leaving the
//!    innermost committed failure to speak for the construct.
//!
//! The survivors are emitted in recording order.
//!
//! TERMINATORS:
//! ------------
//! Every statement ends with a newline or a comma. A missing terminator
//! is reported but the statement is still produced. Blank lines between
//! statements are skipped, and newline tokens in operand position inside
//! expressions are skipped as whitespace.

pub mod ast;

mod expr;
mod stmt;

mod edge_cases;

pub use ast::{
    ArithOp, AssignTarget, CmpOp, Expression, LogicOp, Program, Statement, TypeKeyword,
    VariadicOp,
};

use lolc_lex::{LexedToken, Token};

/// Levels at or below this are statement/program context; duplicate-level
/// filtering does not apply to them.
const OUTERMOST_LEVEL: u32 = 1;

/// A single parse diagnostic.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable message naming the construct and the next token.
    pub message: String,
    /// The token the failure was observed at.
    pub token: LexedToken,
    /// Recursion depth at which the error was recorded.
    pub level: u32,
}

/// The parser's complete output: an AST and every surviving diagnostic.
#[derive(Debug)]
pub struct ParseOutcome {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a lexed token sequence.
///
/// # Example
///
/// ```
/// use lolc_lex::lex;
/// use lolc_par::parse;
///
/// let outcome = parse(lex(b"HAI 1.2\nKTHXBYE\n"));
/// assert!(outcome.is_clean());
/// assert_eq!(outcome.program.statements.len(), 1);
/// ```
pub fn parse(tokens: Vec<LexedToken>) -> ParseOutcome {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    let errors = parser.finish();
    ParseOutcome { program, errors }
}

/// The backtracking parser state.
pub struct Parser {
    tokens: Vec<LexedToken>,
    /// Current token index.
    current: usize,
    /// Transactional consumption marks; `reset` rolls these back.
    consumed: Vec<bool>,
    /// Monotone consumption marks; survive backtracking so the error
    /// filter can tell which tokens some alternative matched.
    ever_consumed: Vec<bool>,
    /// Current production depth.
    level: u32,
    /// Flat error log, filtered by `finish`.
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a parser over a token sequence. The sequence is expected to
    /// end with `Eof` (as `lolc_lex::lex` guarantees); a missing sentinel
    /// is restored here so the cursor always has a token to rest on.
    pub fn new(mut tokens: Vec<LexedToken>) -> Self {
        if !matches!(tokens.last().map(|t| &t.token), Some(Token::Eof)) {
            let end = tokens.last().map(|t| t.end).unwrap_or(0);
            let index = tokens.len();
            tokens.push(LexedToken {
                token: Token::Eof,
                start: end,
                end,
                index,
            });
        }
        let len = tokens.len();
        Self {
            tokens,
            current: 0,
            consumed: vec![false; len],
            ever_consumed: vec![false; len],
            level: 0,
            errors: Vec::new(),
        }
    }

    // ========================================================================
    // CURSOR PRIMITIVES
    // ========================================================================

    /// The token under the cursor. The trailing `Eof` is never advanced
    /// past, so this is always valid.
    pub(crate) fn peek(&self) -> &LexedToken {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// True if the cursor is on a token of the same kind (payload
    /// ignored).
    pub(crate) fn at(&self, kind: &Token) -> bool {
        self.peek().token.same_kind(kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(&Token::Eof)
    }

    /// Match a token kind: on success, mark it consumed, advance, and
    /// return it.
    pub(crate) fn consume(&mut self, kind: &Token) -> Option<LexedToken> {
        if !self.at(kind) || self.at_eof() {
            return None;
        }
        let token = self.tokens[self.current].clone();
        self.consumed[self.current] = true;
        self.ever_consumed[self.current] = true;
        self.current += 1;
        Some(token)
    }

    /// Restore the cursor to `start`, rolling back consumption marks.
    /// This is the backtracking primitive.
    pub(crate) fn reset(&mut self, start: usize) {
        for flag in &mut self.consumed[start..self.current.min(self.tokens.len())] {
            *flag = false;
        }
        self.current = start;
    }

    /// Run a production transactionally: the level is incremented for its
    /// duration and the cursor is reset if it fails.
    pub(crate) fn attempt<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        let start = self.current;
        self.level += 1;
        let result = production(self);
        self.level -= 1;
        if result.is_none() {
            self.reset(start);
        }
        result
    }

    /// Record an error at the current token.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let token = self.peek().clone();
        self.errors.push(ParseError {
            message: message.into(),
            token,
            level: self.level,
        });
    }

    /// Skip a run of newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.consume(&Token::Newline).is_some() {}
    }

    /// Consume the statement terminator (newline or comma), recording an
    /// error naming `context` when it is missing. At end of input the
    /// terminator is accepted as implicit.
    pub(crate) fn expect_terminator(&mut self, context: &str) -> bool {
        if self.consume(&Token::Newline).is_some() || self.consume(&Token::Comma).is_some() {
            return true;
        }
        if self.at_eof() {
            return true;
        }
        self.error(format!(
            "Expected newline or comma after {}, found {}",
            context,
            self.peek().token.describe()
        ));
        false
    }

    /// Advance without marking, for error recovery only.
    fn advance_raw(&mut self) {
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
    }

    /// Skip to just past the next statement boundary without marking
    /// tokens as consumed.
    fn recover_statement(&mut self) {
        while !self.at_eof() && !self.at(&Token::Newline) && !self.at(&Token::Comma) {
            self.advance_raw();
        }
        if !self.at_eof() {
            self.advance_raw();
        }
    }

    // ========================================================================
    // PROGRAM STRUCTURE
    // ========================================================================

    /// Parse `HAI 1.2 TERM statement* KTHXBYE TERM?`.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        self.skip_newlines();
        if self.consume(&Token::Hai).is_none() {
            self.error("Expected HAI to start program");
        } else {
            let version = self.peek().token.clone();
            match version {
                Token::NumbarLiteral(lexeme) if lexeme == "1.2" => {
                    self.consume(&Token::NumbarLiteral(String::new()));
                    self.expect_terminator("HAI");
                }
                Token::NumbarLiteral(_) | Token::NumberLiteral(_) => {
                    self.error("Expected language version 1.2 after HAI");
                    // Step over the wrong version literal without marking
                    // it, so the error survives filtering and the
                    // statement loop resynchronizes at the terminator.
                    self.advance_raw();
                    self.expect_terminator("HAI");
                }
                _ => {
                    self.error("Expected language version 1.2 after HAI");
                }
            }
        }

        loop {
            self.skip_newlines();
            if self.at_eof() {
                break;
            }
            if !self.parse_statement_into(&mut program) {
                self.recover_statement();
            }
        }

        // The cursor rests on Eof here, so these program-level errors
        // attach to the end-of-input token.
        if !program.has_end_marker() {
            self.error("Expected KTHXBYE to end program");
        } else {
            let end_position = program
                .statements
                .iter()
                .position(|s| matches!(s, Statement::ProgramEnd(_)));
            if let Some(position) = end_position {
                if position + 1 < program.statements.len() {
                    self.error("Unexpected statements after KTHXBYE");
                }
            }
        }

        program
    }

    /// Parse one statement into the program, handling the assignment
    /// whose missing LHS attaches to an immediately preceding
    /// declaration.
    fn parse_statement_into(&mut self, program: &mut Program) -> bool {
        if self.at(&Token::R) {
            if let Some(Statement::VarDecl(_)) = program.statements.last() {
                return self.parse_assign_continuation(program);
            }
        }

        match self.parse_statement() {
            Some(statement) => {
                program.statements.push(statement);
                true
            }
            None => false,
        }
    }

    /// `R expr` with no LHS: rewrite the preceding declaration as the
    /// assignment target (declaration-with-initializer).
    fn parse_assign_continuation(&mut self, program: &mut Program) -> bool {
        let parsed = self.attempt(|p| {
            let r_token = p.consume(&Token::R)?;
            let expr = p.parse_expression()?;
            p.expect_terminator("assignment");
            Some((r_token, expr))
        });

        let Some((r_token, expr)) = parsed else {
            return false;
        };

        match program.statements.pop() {
            Some(Statement::VarDecl(decl)) => {
                program.statements.push(Statement::VarAssign(ast::VarAssignStatement {
                    target: AssignTarget::Declaration(decl),
                    r_token,
                    expr,
                }));
                true
            }
            Some(other) => {
                // Guarded by the caller; restore and treat as a miss.
                program.statements.push(other);
                false
            }
            None => false,
        }
    }

    // ========================================================================
    // ERROR FILTERING
    // ========================================================================

    /// Apply the two-pass error filter and return the survivors in
    /// recording order.
    pub fn finish(self) -> Vec<ParseError> {
        let Parser {
            ever_consumed,
            errors,
            ..
        } = self;

        // Pass 1: drop errors whose token some production matched.
        // Program-level errors (level 0) are never speculative - there are
        // no alternatives at that depth - so they are kept even when their
        // anchor token was consumed in passing.
        let survivors: Vec<ParseError> = errors
            .into_iter()
            .filter(|e| {
                e.level == 0 || !ever_consumed.get(e.token.index).copied().unwrap_or(false)
            })
            .collect();

        // Pass 2: drop duplicate-level errors outside the outermost
        // levels.
        let mut level_counts = lolc_util::FxHashMap::<u32, usize>::default();
        for error in &survivors {
            *level_counts.entry(error.level).or_insert(0) += 1;
        }
        survivors
            .into_iter()
            .filter(|e| {
                e.level <= OUTERMOST_LEVEL
                    || level_counts.get(&e.level).copied().unwrap_or(0) == 1
            })
            .collect()
    }
}
