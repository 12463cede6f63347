//! Expression parsing.
//!
//! LOLCODE operators are prefix keywords (`SUM OF x AN y`), so there is no
//! precedence climbing: each operator form is one production, and nesting
//! falls out of the recursion. `BOTH` is the one ambiguous head - a
//! one-token lookahead after it distinguishes `BOTH OF` (logical and) from
//! `BOTH SAEM` (equality).

use crate::ast::{ArithOp, CmpOp, Expression, LogicOp, VariadicOp};
use crate::Parser;
use lolc_lex::Token;
use lolc_util::Symbol;

impl Parser {
    /// Parse an expression. Callers run inside an enclosing `attempt`, so
    /// any tokens matched here (including skipped newlines) roll back when
    /// the calling production fails.
    ///
    /// Newline tokens in operand position are whitespace; they are skipped
    /// before the first alternative is tried.
    pub(crate) fn parse_expression(&mut self) -> Option<Expression> {
        self.skip_newlines();

        if let Some(e) = self.parse_literal() {
            return Some(e);
        }
        if let Some(e) = self.parse_variable() {
            return Some(e);
        }
        if let Some(e) = self.parse_arith() {
            return Some(e);
        }
        if let Some(e) = self.parse_both() {
            return Some(e);
        }
        if let Some(e) = self.parse_logic() {
            return Some(e);
        }
        if let Some(e) = self.parse_not() {
            return Some(e);
        }
        if let Some(e) = self.parse_variadic() {
            return Some(e);
        }
        if let Some(e) = self.parse_diffrint() {
            return Some(e);
        }
        if let Some(e) = self.parse_smoosh() {
            return Some(e);
        }
        if let Some(e) = self.parse_maek() {
            return Some(e);
        }

        self.error("Expected valid expression");
        None
    }

    /// Numeric, string, and TROOF literals.
    fn parse_literal(&mut self) -> Option<Expression> {
        self.attempt(|p| match p.peek().token.clone() {
            Token::NumberLiteral(lexeme) => {
                let token = p.consume(&Token::NumberLiteral(String::new()))?;
                let value = match lexeme.parse::<i64>() {
                    Ok(value) => value,
                    Err(_) => {
                        p.error("Number literal out of range");
                        0
                    }
                };
                Some(Expression::Number { token, value })
            }
            Token::NumbarLiteral(lexeme) => {
                let token = p.consume(&Token::NumbarLiteral(String::new()))?;
                let value = match lexeme.parse::<f32>() {
                    Ok(value) => value,
                    Err(_) => {
                        p.error("Numbar literal out of range");
                        0.0
                    }
                };
                Some(Expression::Numbar { token, value })
            }
            Token::StringLiteral(bytes) => {
                let token = p.consume(&Token::StringLiteral(Vec::new()))?;
                Some(Expression::Yarn { token, bytes })
            }
            Token::Win => {
                let token = p.consume(&Token::Win)?;
                Some(Expression::Troof { token, value: true })
            }
            Token::Fail => {
                let token = p.consume(&Token::Fail)?;
                Some(Expression::Troof {
                    token,
                    value: false,
                })
            }
            _ => {
                p.error("Expected literal");
                None
            }
        })
    }

    /// A variable reference: an identifier, or the implicit `IT`.
    fn parse_variable(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            if let Some((token, name)) = p.parse_variable_name() {
                return Some(Expression::Variable { token, name });
            }
            if let Some(token) = p.consume(&Token::It) {
                return Some(Expression::Variable {
                    token,
                    name: Symbol::intern("IT"),
                });
            }
            p.error("Expected variable");
            None
        })
    }

    /// `<OP> OF e AN e` for the seven arithmetic operators.
    fn parse_arith(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let kind = p.peek().token.clone();
            let op = match kind {
                Token::Sum => ArithOp::Sum,
                Token::Diff => ArithOp::Diff,
                Token::Produkt => ArithOp::Produkt,
                Token::Quoshunt => ArithOp::Quoshunt,
                Token::Mod => ArithOp::Mod,
                Token::Biggr => ArithOp::Biggr,
                Token::Smallr => ArithOp::Smallr,
                _ => {
                    p.error("Expected arithmetic operator");
                    return None;
                }
            };
            let token = p.consume(&kind)?;
            if p.consume(&Token::Of).is_none() {
                p.error(format!("Expected OF keyword for {}", op.keyword_text()));
                return None;
            }
            let left = p.parse_expression()?;
            if p.consume(&Token::An).is_none() {
                p.error(format!("Expected AN keyword for {}", op.keyword_text()));
                return None;
            }
            let right = p.parse_expression()?;
            Some(Expression::Arith {
                op,
                token,
                left: Box::new(left),
                right: Box::new(right),
            })
        })
    }

    /// `BOTH OF e AN e` or `BOTH SAEM e AN e`, split by one-token
    /// lookahead on the word after `BOTH`.
    fn parse_both(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Both) else {
                p.error("Expected BOTH keyword");
                return None;
            };

            if p.consume(&Token::Saem).is_some() {
                let left = p.parse_expression()?;
                if p.consume(&Token::An).is_none() {
                    p.error("Expected AN keyword for BOTH SAEM");
                    return None;
                }
                let right = p.parse_expression()?;
                return Some(Expression::Compare {
                    op: CmpOp::Saem,
                    token,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }

            if p.consume(&Token::Of).is_none() {
                p.error("Expected OF or SAEM after BOTH");
                return None;
            }
            let left = p.parse_expression()?;
            if p.consume(&Token::An).is_none() {
                p.error("Expected AN keyword for BOTH OF");
                return None;
            }
            let right = p.parse_expression()?;
            Some(Expression::Logic {
                op: LogicOp::Both,
                token,
                left: Box::new(left),
                right: Box::new(right),
            })
        })
    }

    /// `EITHER OF e AN e` and `WON OF e AN e`.
    fn parse_logic(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let kind = p.peek().token.clone();
            let op = match kind {
                Token::Either => LogicOp::Either,
                Token::Won => LogicOp::Won,
                _ => {
                    p.error("Expected logical operator");
                    return None;
                }
            };
            let token = p.consume(&kind)?;
            if p.consume(&Token::Of).is_none() {
                p.error(format!("Expected OF keyword for {}", op.keyword_text()));
                return None;
            }
            let left = p.parse_expression()?;
            if p.consume(&Token::An).is_none() {
                p.error(format!("Expected AN keyword for {}", op.keyword_text()));
                return None;
            }
            let right = p.parse_expression()?;
            Some(Expression::Logic {
                op,
                token,
                left: Box::new(left),
                right: Box::new(right),
            })
        })
    }

    /// `NOT e`.
    fn parse_not(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Not) else {
                p.error("Expected NOT keyword");
                return None;
            };
            let operand = p.parse_expression()?;
            Some(Expression::Not {
                token,
                operand: Box::new(operand),
            })
        })
    }

    /// `ALL OF e (AN e)* MKAY` and `ANY OF e (AN e)* MKAY`.
    fn parse_variadic(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let kind = p.peek().token.clone();
            let op = match kind {
                Token::All => VariadicOp::All,
                Token::Any => VariadicOp::Any,
                _ => {
                    p.error("Expected ALL or ANY");
                    return None;
                }
            };
            let token = p.consume(&kind)?;
            if p.consume(&Token::Of).is_none() {
                p.error(format!("Expected OF keyword for {}", op.keyword_text()));
                return None;
            }
            let mut operands = vec![p.parse_expression()?];
            while p.consume(&Token::An).is_some() {
                operands.push(p.parse_expression()?);
            }
            let Some(mkay) = p.consume(&Token::Mkay) else {
                p.error(format!("Expected MKAY to end {} OF", op.keyword_text()));
                return None;
            };
            Some(Expression::Variadic {
                op,
                token,
                operands,
                mkay,
            })
        })
    }

    /// `DIFFRINT OF e AN e`.
    fn parse_diffrint(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Diffrint) else {
                p.error("Expected DIFFRINT keyword");
                return None;
            };
            if p.consume(&Token::Of).is_none() {
                p.error("Expected OF keyword for DIFFRINT");
                return None;
            }
            let left = p.parse_expression()?;
            if p.consume(&Token::An).is_none() {
                p.error("Expected AN keyword for DIFFRINT");
                return None;
            }
            let right = p.parse_expression()?;
            Some(Expression::Compare {
                op: CmpOp::Diffrint,
                token,
                left: Box::new(left),
                right: Box::new(right),
            })
        })
    }

    /// `SMOOSH e (AN e)* MKAY` - string concatenation.
    fn parse_smoosh(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Smoosh) else {
                p.error("Expected SMOOSH keyword");
                return None;
            };
            let mut operands = vec![p.parse_expression()?];
            while p.consume(&Token::An).is_some() {
                operands.push(p.parse_expression()?);
            }
            let Some(mkay) = p.consume(&Token::Mkay) else {
                p.error("Expected MKAY to end SMOOSH");
                return None;
            };
            Some(Expression::Smoosh {
                token,
                operands,
                mkay,
            })
        })
    }

    /// `MAEK e A type` - cast expression.
    fn parse_maek(&mut self) -> Option<Expression> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Maek) else {
                p.error("Expected MAEK keyword");
                return None;
            };
            let operand = p.parse_expression()?;
            if p.consume(&Token::A).is_none() {
                p.error("Expected A keyword for MAEK");
                return None;
            }
            let Some((target, target_token)) = p.parse_type_keyword() else {
                p.error("Expected type for MAEK");
                return None;
            };
            Some(Expression::Cast {
                token,
                operand: Box::new(operand),
                target,
                target_token,
            })
        })
    }
}
