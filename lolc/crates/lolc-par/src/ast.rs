//! AST node definitions for LOLCODE programs.
//!
//! Every node keeps the token(s) it was built from, so later phases can
//! point diagnostics at the exact source range. Sub-expressions are owned
//! `Box` children; nodes are built once by the parser and read-only
//! afterwards.

use lolc_lex::{LexedToken, Token};
use lolc_util::{Span, Symbol};

/// A parsed program: an ordered list of statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the program contains its `KTHXBYE` end marker.
    pub fn has_end_marker(&self) -> bool {
        self.statements
            .iter()
            .any(|s| matches!(s, Statement::ProgramEnd(_)))
    }
}

/// The type keywords a declaration or cast can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Number,
    Numbar,
    Troof,
    Yarn,
    Noob,
}

impl TypeKeyword {
    /// Map a type-keyword token to its AST form.
    pub fn from_token(token: &Token) -> Option<TypeKeyword> {
        match token {
            Token::Number => Some(TypeKeyword::Number),
            Token::Numbar => Some(TypeKeyword::Numbar),
            Token::Troof => Some(TypeKeyword::Troof),
            Token::Yarn => Some(TypeKeyword::Yarn),
            Token::Noob => Some(TypeKeyword::Noob),
            _ => None,
        }
    }

    pub fn keyword_text(&self) -> &'static str {
        match self {
            TypeKeyword::Number => "NUMBER",
            TypeKeyword::Numbar => "NUMBAR",
            TypeKeyword::Troof => "TROOF",
            TypeKeyword::Yarn => "YARN",
            TypeKeyword::Noob => "NOOB",
        }
    }
}

/// A top-level statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// A bare expression; its value lands in the implicit `IT` variable.
    Expression(ExpressionStatement),
    /// `I HAS A name (ITZ type)?`
    VarDecl(VarDeclStatement),
    /// `name R expr`, or the declaration-with-initializer rewrite.
    VarAssign(VarAssignStatement),
    /// `name IS NOW A type`
    VarCast(VarCastStatement),
    /// `VISIBLE expr+ ('!')?`
    Visible(VisibleStatement),
    /// `GIMMEH name`
    Gimmeh(GimmehStatement),
    /// `KTHXBYE`
    ProgramEnd(ProgramEndStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Expression(s) => s.expr.span(),
            Statement::VarDecl(s) => s.span(),
            Statement::VarAssign(s) => s.span(),
            Statement::VarCast(s) => s.name_token.span().merge(s.target_token.span()),
            Statement::Visible(s) => {
                let mut span = s.keyword.span();
                for expr in &s.exprs {
                    span = span.merge(expr.span());
                }
                span
            }
            Statement::Gimmeh(s) => s.keyword.span().merge(s.name_token.span()),
            Statement::ProgramEnd(s) => s.token.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Expression,
}

#[derive(Debug, Clone)]
pub struct VarDeclStatement {
    /// The leading `I` keyword token.
    pub keyword: LexedToken,
    pub name_token: LexedToken,
    pub name: Symbol,
    /// Declared type from the optional `ITZ` clause.
    pub declared: Option<(TypeKeyword, LexedToken)>,
}

impl VarDeclStatement {
    pub fn span(&self) -> Span {
        let end = self
            .declared
            .as_ref()
            .map(|(_, token)| token.span())
            .unwrap_or_else(|| self.name_token.span());
        self.keyword.span().merge(end)
    }
}

/// The left-hand side of an assignment.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    /// A plain variable name.
    Variable { token: LexedToken, name: Symbol },
    /// The preceding declaration, folded in when an assignment appears
    /// with no LHS of its own (declaration-with-initializer).
    Declaration(VarDeclStatement),
}

impl AssignTarget {
    pub fn name(&self) -> Symbol {
        match self {
            AssignTarget::Variable { name, .. } => *name,
            AssignTarget::Declaration(decl) => decl.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            AssignTarget::Variable { token, .. } => token.span(),
            AssignTarget::Declaration(decl) => decl.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VarAssignStatement {
    pub target: AssignTarget,
    pub r_token: LexedToken,
    pub expr: Expression,
}

impl VarAssignStatement {
    pub fn span(&self) -> Span {
        self.target.span().merge(self.expr.span())
    }
}

#[derive(Debug, Clone)]
pub struct VarCastStatement {
    pub name_token: LexedToken,
    pub name: Symbol,
    pub target: TypeKeyword,
    pub target_token: LexedToken,
}

#[derive(Debug, Clone)]
pub struct VisibleStatement {
    pub keyword: LexedToken,
    pub exprs: Vec<Expression>,
    /// True when the statement ends with `!`.
    pub suppress_newline: bool,
}

#[derive(Debug, Clone)]
pub struct GimmehStatement {
    pub keyword: LexedToken,
    pub name_token: LexedToken,
    pub name: Symbol,
}

#[derive(Debug, Clone)]
pub struct ProgramEndStatement {
    pub token: LexedToken,
}

/// Prefix-form binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Sum,
    Diff,
    Produkt,
    Quoshunt,
    Mod,
    Biggr,
    Smallr,
}

impl ArithOp {
    pub fn keyword_text(&self) -> &'static str {
        match self {
            ArithOp::Sum => "SUM",
            ArithOp::Diff => "DIFF",
            ArithOp::Produkt => "PRODUKT",
            ArithOp::Quoshunt => "QUOSHUNT",
            ArithOp::Mod => "MOD",
            ArithOp::Biggr => "BIGGR",
            ArithOp::Smallr => "SMALLR",
        }
    }
}

/// Short-circuiting binary boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// `BOTH OF` - logical and.
    Both,
    /// `EITHER OF` - logical or.
    Either,
    /// `WON OF` - logical xor.
    Won,
}

impl LogicOp {
    pub fn keyword_text(&self) -> &'static str {
        match self {
            LogicOp::Both => "BOTH",
            LogicOp::Either => "EITHER",
            LogicOp::Won => "WON",
        }
    }
}

/// Variadic boolean operators, `MKAY`-terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariadicOp {
    All,
    Any,
}

impl VariadicOp {
    pub fn keyword_text(&self) -> &'static str {
        match self {
            VariadicOp::All => "ALL",
            VariadicOp::Any => "ANY",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `BOTH SAEM` - equality.
    Saem,
    /// `DIFFRINT OF` - inequality.
    Diffrint,
}

/// An expression.
#[derive(Debug, Clone)]
pub enum Expression {
    Number {
        token: LexedToken,
        value: i64,
    },
    Numbar {
        token: LexedToken,
        value: f32,
    },
    Yarn {
        token: LexedToken,
        bytes: Vec<u8>,
    },
    Troof {
        token: LexedToken,
        value: bool,
    },
    Variable {
        token: LexedToken,
        name: Symbol,
    },
    Arith {
        op: ArithOp,
        token: LexedToken,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logic {
        op: LogicOp,
        token: LexedToken,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        token: LexedToken,
        operand: Box<Expression>,
    },
    Variadic {
        op: VariadicOp,
        token: LexedToken,
        operands: Vec<Expression>,
        mkay: LexedToken,
    },
    Compare {
        op: CmpOp,
        token: LexedToken,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Smoosh {
        token: LexedToken,
        operands: Vec<Expression>,
        mkay: LexedToken,
    },
    Cast {
        token: LexedToken,
        operand: Box<Expression>,
        target: TypeKeyword,
        target_token: LexedToken,
    },
}

impl Expression {
    /// The source range covered by this expression and its children.
    pub fn span(&self) -> Span {
        match self {
            Expression::Number { token, .. }
            | Expression::Numbar { token, .. }
            | Expression::Yarn { token, .. }
            | Expression::Troof { token, .. }
            | Expression::Variable { token, .. } => token.span(),
            Expression::Arith { token, right, .. }
            | Expression::Logic { token, right, .. }
            | Expression::Compare { token, right, .. } => token.span().merge(right.span()),
            Expression::Not { token, operand } => token.span().merge(operand.span()),
            Expression::Variadic { token, mkay, .. } => token.span().merge(mkay.span()),
            Expression::Smoosh { token, mkay, .. } => token.span().merge(mkay.span()),
            Expression::Cast {
                token,
                target_token,
                ..
            } => token.span().merge(target_token.span()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(token: Token, start: usize, end: usize) -> LexedToken {
        LexedToken {
            token,
            start,
            end,
            index: 0,
        }
    }

    #[test]
    fn test_expression_span_covers_children() {
        let left = Expression::Number {
            token: tok(Token::NumberLiteral("1".into()), 7, 8),
            value: 1,
        };
        let right = Expression::Number {
            token: tok(Token::NumberLiteral("2".into()), 12, 13),
            value: 2,
        };
        let sum = Expression::Arith {
            op: ArithOp::Sum,
            token: tok(Token::Sum, 0, 3),
            left: Box::new(left),
            right: Box::new(right),
        };
        assert_eq!(sum.span(), Span::new(0, 13));
    }

    #[test]
    fn test_type_keyword_from_token() {
        assert_eq!(TypeKeyword::from_token(&Token::Yarn), Some(TypeKeyword::Yarn));
        assert_eq!(TypeKeyword::from_token(&Token::Visible), None);
    }

    #[test]
    fn test_assign_target_name() {
        let target = AssignTarget::Variable {
            token: tok(Token::Ident(Symbol::intern("x")), 0, 1),
            name: Symbol::intern("x"),
        };
        assert_eq!(target.name(), Symbol::intern("x"));
    }
}
