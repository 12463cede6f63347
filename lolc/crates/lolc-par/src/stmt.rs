//! Statement parsing - declarations, assignments, casts, VISIBLE, GIMMEH.
//!
//! Each production is tried transactionally; a failed alternative records
//! an error naming the construct and resets the cursor, and the filter in
//! `finish` keeps only the committed failure for the statement.

use crate::ast::{
    AssignTarget, ExpressionStatement, GimmehStatement, ProgramEndStatement, Statement,
    TypeKeyword, VarAssignStatement, VarCastStatement, VarDeclStatement, VisibleStatement,
};
use crate::Parser;
use lolc_lex::{LexedToken, Token};
use lolc_util::Symbol;

impl Parser {
    /// Parse a single statement, trying every alternative.
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            if let Some(s) = p.parse_program_end() {
                return Some(s);
            }
            if let Some(s) = p.parse_var_decl_stmt() {
                return Some(s);
            }
            if let Some(s) = p.parse_var_cast() {
                return Some(s);
            }
            if let Some(s) = p.parse_var_assign() {
                return Some(s);
            }
            if let Some(s) = p.parse_visible() {
                return Some(s);
            }
            if let Some(s) = p.parse_gimmeh() {
                return Some(s);
            }
            if let Some(s) = p.parse_expression_stmt() {
                return Some(s);
            }
            p.error("Expected valid statement");
            None
        })
    }

    /// `KTHXBYE` - the program end marker. Its terminator is optional so a
    /// program may end at the last byte of the file.
    fn parse_program_end(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some(token) = p.consume(&Token::Kthxbye) else {
                p.error("Expected KTHXBYE");
                return None;
            };
            let _ = p.consume(&Token::Newline).is_some() || p.consume(&Token::Comma).is_some();
            Some(Statement::ProgramEnd(ProgramEndStatement { token }))
        })
    }

    /// `I HAS A name (ITZ type)?`
    fn parse_var_decl_stmt(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some(keyword) = p.consume(&Token::I) else {
                p.error("Expected I HAS A for declaration");
                return None;
            };
            if p.consume(&Token::Has).is_none() {
                p.error("Expected HAS keyword for declaration");
                return None;
            }
            if p.consume(&Token::A).is_none() {
                p.error("Expected A keyword for declaration");
                return None;
            }
            let Some((name_token, name)) = p.parse_variable_name() else {
                p.error("Expected variable name for declaration");
                return None;
            };
            let declared = if p.consume(&Token::Itz).is_some() {
                let Some(declared) = p.parse_type_keyword() else {
                    p.error("Expected type after ITZ");
                    return None;
                };
                Some((declared.0, declared.1))
            } else {
                None
            };
            p.expect_terminator("declaration");
            Some(Statement::VarDecl(VarDeclStatement {
                keyword,
                name_token,
                name,
                declared,
            }))
        })
    }

    /// `name IS NOW A type` - in-place cast.
    fn parse_var_cast(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some((name_token, name)) = p.parse_variable_name() else {
                p.error("Expected variable for cast");
                return None;
            };
            if p.consume(&Token::Is).is_none() {
                p.error("Expected IS NOW A for cast");
                return None;
            }
            if p.consume(&Token::Now).is_none() {
                p.error("Expected NOW keyword for cast");
                return None;
            }
            if p.consume(&Token::A).is_none() {
                p.error("Expected A keyword for cast");
                return None;
            }
            let Some((target, target_token)) = p.parse_type_keyword() else {
                p.error("Expected type for cast");
                return None;
            };
            p.expect_terminator("cast");
            Some(Statement::VarCast(VarCastStatement {
                name_token,
                name,
                target,
                target_token,
            }))
        })
    }

    /// `name R expr`
    fn parse_var_assign(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some((token, name)) = p.parse_variable_name() else {
                p.error("Expected variable for assignment");
                return None;
            };
            let Some(r_token) = p.consume(&Token::R) else {
                p.error("Expected R keyword for assignment");
                return None;
            };
            let expr = p.parse_expression()?;
            p.expect_terminator("assignment");
            Some(Statement::VarAssign(VarAssignStatement {
                target: AssignTarget::Variable { token, name },
                r_token,
                expr,
            }))
        })
    }

    /// `VISIBLE expr+ ('!')?`
    fn parse_visible(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some(keyword) = p.consume(&Token::Visible) else {
                p.error("Expected VISIBLE");
                return None;
            };
            let first = p.parse_expression()?;
            let mut exprs = vec![first];
            loop {
                // Stop cleanly at the end of the statement instead of
                // speculating into the terminator.
                if p.at(&Token::Newline)
                    || p.at(&Token::Comma)
                    || p.at(&Token::Exclamation)
                    || p.at_eof()
                {
                    break;
                }
                match p.attempt(|p| p.parse_expression()) {
                    Some(expr) => exprs.push(expr),
                    None => break,
                }
            }
            let suppress_newline = p.consume(&Token::Exclamation).is_some();
            p.expect_terminator("VISIBLE");
            Some(Statement::Visible(VisibleStatement {
                keyword,
                exprs,
                suppress_newline,
            }))
        })
    }

    /// `GIMMEH name`
    fn parse_gimmeh(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let Some(keyword) = p.consume(&Token::Gimmeh) else {
                p.error("Expected GIMMEH");
                return None;
            };
            let Some((name_token, name)) = p.parse_variable_name() else {
                p.error("Expected variable name after GIMMEH");
                return None;
            };
            p.expect_terminator("GIMMEH");
            Some(Statement::Gimmeh(GimmehStatement {
                keyword,
                name_token,
                name,
            }))
        })
    }

    /// A bare expression; its value lands in `IT`.
    fn parse_expression_stmt(&mut self) -> Option<Statement> {
        self.attempt(|p| {
            let expr = p.parse_expression()?;
            p.expect_terminator("expression");
            Some(Statement::Expression(ExpressionStatement { expr }))
        })
    }

    // ========================================================================
    // SHARED PIECES
    // ========================================================================

    /// An identifier in name position.
    pub(crate) fn parse_variable_name(&mut self) -> Option<(LexedToken, Symbol)> {
        let name = match &self.peek().token {
            Token::Ident(name) => *name,
            _ => return None,
        };
        let token = self.consume(&Token::Ident(Symbol::intern("")))?;
        Some((token, name))
    }

    /// One of the `NUMBER`/`NUMBAR`/`TROOF`/`YARN`/`NOOB` keywords.
    pub(crate) fn parse_type_keyword(&mut self) -> Option<(TypeKeyword, LexedToken)> {
        let kind = self.peek().token.clone();
        let keyword = TypeKeyword::from_token(&kind)?;
        let token = self.consume(&kind)?;
        Some((keyword, token))
    }
}
