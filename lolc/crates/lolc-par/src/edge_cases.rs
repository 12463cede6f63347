//! Edge case tests for lolc-par.

#[cfg(test)]
mod tests {
    use crate::ast::TypeKeyword;
    use crate::{parse, AssignTarget, ParseOutcome, Statement};
    use lolc_lex::lex;

    fn parse_source(source: &str) -> ParseOutcome {
        parse(lex(source.as_bytes()))
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        let outcome = parse_source("");
        assert!(outcome
            .errors
            .iter()
            .any(|e| e.message.contains("Expected HAI")));
        assert!(outcome
            .errors
            .iter()
            .any(|e| e.message.contains("Expected KTHXBYE")));
        assert!(outcome.program.statements.is_empty());
    }

    #[test]
    fn test_edge_blank_lines_everywhere() {
        let outcome = parse_source("\n\nHAI 1.2\n\n\nVISIBLE 1\n\nKTHXBYE\n\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        assert_eq!(outcome.program.statements.len(), 2);
    }

    #[test]
    fn test_edge_comments_between_statements() {
        let outcome = parse_source(
            "HAI 1.2\nBTW setup\nI HAS A x ITZ YARN\nOBTW\nlong note\nTLDR\nGIMMEH x\nKTHXBYE\n",
        );
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        assert_eq!(outcome.program.statements.len(), 3);
    }

    #[test]
    fn test_edge_declared_types() {
        for (source_type, expected) in [
            ("NUMBER", TypeKeyword::Number),
            ("NUMBAR", TypeKeyword::Numbar),
            ("TROOF", TypeKeyword::Troof),
            ("YARN", TypeKeyword::Yarn),
            ("NOOB", TypeKeyword::Noob),
        ] {
            let outcome =
                parse_source(&format!("HAI 1.2\nI HAS A x ITZ {}\nKTHXBYE\n", source_type));
            assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
            match &outcome.program.statements[0] {
                Statement::VarDecl(decl) => {
                    assert_eq!(decl.declared.as_ref().map(|(t, _)| *t), Some(expected));
                }
                other => panic!("expected declaration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_edge_declaration_without_type() {
        let outcome = parse_source("HAI 1.2\nI HAS A x\nKTHXBYE\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        match &outcome.program.statements[0] {
            Statement::VarDecl(decl) => assert!(decl.declared.is_none()),
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_cast_statement() {
        let outcome = parse_source("HAI 1.2\nI HAS A x ITZ NUMBER\nx IS NOW A YARN\nKTHXBYE\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        match &outcome.program.statements[1] {
            Statement::VarCast(cast) => {
                assert_eq!(cast.name.as_str(), "x");
                assert_eq!(cast.target, TypeKeyword::Yarn);
            }
            other => panic!("expected cast, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_visible_multiple_args_and_bang() {
        let outcome = parse_source("HAI 1.2\nVISIBLE 1 \"and\" 2!\nKTHXBYE\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        match &outcome.program.statements[0] {
            Statement::Visible(visible) => {
                assert_eq!(visible.exprs.len(), 3);
                assert!(visible.suppress_newline);
            }
            other => panic!("expected VISIBLE, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_one_line_decl_and_assign() {
        // The declaration statement ends at `R`, which then attaches as
        // the declaration-with-initializer rewrite.
        let outcome = parse_source("HAI 1.2\nI HAS A x R 5\nKTHXBYE\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        assert_eq!(outcome.program.statements.len(), 2);
        assert!(matches!(
            &outcome.program.statements[0],
            Statement::VarAssign(a) if matches!(a.target, AssignTarget::Declaration(_))
        ));
    }

    #[test]
    fn test_edge_missing_declaration_name() {
        let outcome = parse_source("HAI 1.2\nI HAS A\nKTHXBYE\n");
        assert_eq!(outcome.errors.len(), 1, "errors: {:?}", outcome.errors);
        assert_eq!(
            outcome.errors[0].message,
            "Expected variable name for declaration"
        );
    }

    #[test]
    fn test_edge_cast_missing_now() {
        let outcome = parse_source("HAI 1.2\nI HAS A x\nx IS A NUMBER\nKTHXBYE\n");
        assert_eq!(outcome.errors.len(), 1, "errors: {:?}", outcome.errors);
        assert_eq!(outcome.errors[0].message, "Expected NOW keyword for cast");
    }

    #[test]
    fn test_edge_missing_mkay() {
        let outcome = parse_source("HAI 1.2\nALL OF WIN AN FAIL\nKTHXBYE\n");
        assert_eq!(outcome.errors.len(), 1, "errors: {:?}", outcome.errors);
        assert_eq!(outcome.errors[0].message, "Expected MKAY to end ALL OF");
    }

    #[test]
    fn test_edge_kthxbye_mid_line_content() {
        // KTHXBYE mid-program terminates; trailing statements are parsed
        // and reported.
        let outcome = parse_source("HAI 1.2\nKTHXBYE\nVISIBLE 1\nVISIBLE 2\n");
        assert_eq!(outcome.program.statements.len(), 3);
        assert!(outcome
            .errors
            .iter()
            .any(|e| e.message.contains("after KTHXBYE")));
    }

    #[test]
    fn test_edge_errors_do_not_stop_later_statements() {
        let outcome = parse_source("HAI 1.2\nGTFO\nVISIBLE 1\nKTHXBYE\n");
        // The bad line is reported and the good one still parses.
        assert!(!outcome.errors.is_empty());
        assert!(outcome
            .program
            .statements
            .iter()
            .any(|s| matches!(s, Statement::Visible(_))));
    }

    #[test]
    fn test_edge_error_tokens_not_consumed() {
        // Every surviving error points at a token no production matched.
        let outcome = parse_source("HAI 1.2\nSUM OF 1\nGTFO\nKTHXBYE\n");
        for error in &outcome.errors {
            assert!(
                !matches!(error.token.token, lolc_lex::Token::Kthxbye),
                "error attached to a consumed token: {:?}",
                error
            );
        }
    }

    #[test]
    fn test_edge_assignment_to_it_value() {
        let outcome = parse_source("HAI 1.2\nSUM OF 1 AN 2\nVISIBLE IT\nKTHXBYE\n");
        assert!(outcome.is_clean(), "errors: {:?}", outcome.errors);
        assert!(matches!(
            &outcome.program.statements[0],
            Statement::Expression(_)
        ));
    }
}
