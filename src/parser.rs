use tracing::debug;

use crate::{
    ast::{self, BinaryOp},
    common::ParseError,
    lexer::Lexer,
    token::{Token, TokenKind},
};

// `current` is always the last token a production consumed; callers step past it.
#[derive(Debug, Clone)]
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        };
        parser.check_illegal(true);
        parser.check_illegal(false);
        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn check_illegal(&mut self, current: bool) {
        let token = if current { &self.current } else { &self.peek };
        if token.kind == TokenKind::Illegal {
            let error = ParseError::IllegalCharacter {
                lexeme: token.lexeme.clone(),
                line: token.line,
                column: token.column,
            };
            self.report(error);
        }
    }

    fn report(&mut self, error: ParseError) {
        debug!(line = error.line(), "{}", error);
        self.errors.push(error);
    }

    fn next_token(&mut self) {
        let incoming = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, incoming);
        self.check_illegal(false);
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek.kind == kind {
            self.next_token();
            Ok(())
        } else {
            Err(self.peek.unexpected(kind))
        }
    }

    pub fn parse_program(&mut self) -> ast::Program {
        let mut program = ast::Program::default();

        while self.current.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_stmt() {
                program.stmts.push(stmt);
            }
            self.next_token();
        }

        debug!(
            statements = program.stmts.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        program
    }

    fn parse_stmt(&mut self) -> Option<ast::Stmt> {
        let start = self.current.span.start;

        let result = match self.current.kind {
            TokenKind::Int => self.parse_var_decl().map(ast::StmtKind::from),
            TokenKind::Print => self.parse_print().map(ast::StmtKind::from),
            TokenKind::If => self.parse_if().map(ast::StmtKind::from),
            TokenKind::Ident if self.peek.kind == TokenKind::Assign => {
                self.parse_assign().map(ast::StmtKind::from)
            }
            _ => return None,
        };

        match result {
            Ok(kind) => Some(ast::Stmt {
                kind,
                span: start..self.current.span.end,
            }),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    fn parse_var_decl(&mut self) -> Result<ast::VarDecl, ParseError> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.current.lexeme.clone();
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(ast::VarDecl { name })
    }

    fn parse_assign(&mut self) -> Result<ast::Assign, ParseError> {
        let name = self.current.lexeme.clone();

        self.next_token(); // '='
        self.next_token();

        let expr = self.parse_expr()?;
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(ast::Assign { name, expr })
    }

    fn parse_print(&mut self) -> Result<ast::Print, ParseError> {
        self.expect_peek(TokenKind::LeftParen)?;
        self.expect_peek(TokenKind::Ident)?;

        let expr = ast::Expr {
            kind: ast::VarExpr {
                name: self.current.lexeme.clone(),
            }
            .into(),
            span: self.current.span.clone(),
        };

        self.expect_peek(TokenKind::RightParen)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(ast::Print { expr })
    }

    fn parse_if(&mut self) -> Result<ast::IfStmt, ParseError> {
        self.expect_peek(TokenKind::LeftParen)?;
        self.next_token();

        let condition = self.parse_expr()?;

        self.expect_peek(TokenKind::RightParen)?;
        self.next_token();

        let body = self.parse_stmt().map(Box::new);

        Ok(ast::IfStmt { condition, body })
    }

    fn parse_expr(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.parse_term()?;

        while let Some(op) =
            BinaryOp::from_token_kind(self.peek.kind).filter(|_| self.peek.kind.is_additive_op())
        {
            self.next_token();
            self.next_token();

            let right = self.parse_term()?;
            left = ast::Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<ast::Expr, ParseError> {
        let mut left = self.parse_factor()?;

        while let Some(op) =
            BinaryOp::from_token_kind(self.peek.kind).filter(|_| self.peek.kind.is_multiplicative_op())
        {
            self.next_token();
            self.next_token();

            let right = self.parse_factor()?;
            left = ast::Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<ast::Expr, ParseError> {
        let token = self.current.clone();

        match token.kind {
            TokenKind::IntLit => {
                let value = token
                    .lexeme
                    .parse::<i32>()
                    .map_err(|_| ParseError::IntegerOutOfRange {
                        lexeme: token.lexeme.clone(),
                        line: token.line,
                        column: token.column,
                    })?;

                Ok(ast::Expr {
                    kind: ast::Lit { value }.into(),
                    span: token.span,
                })
            }
            TokenKind::Ident => Ok(ast::Expr {
                kind: ast::VarExpr { name: token.lexeme }.into(),
                span: token.span,
            }),
            TokenKind::LeftParen => {
                self.next_token();
                let mut expr = self.parse_expr()?;
                self.expect_peek(TokenKind::RightParen)?;

                expr.span = token.span.start..self.current.span.end;
                Ok(expr)
            }
            _ => Err(ParseError::ExpectedExpression {
                found: token.kind,
                line: token.line,
                column: token.column,
            }),
        }
    }
}

/// Lexes and parses `source`, returning the recovered program and every
/// diagnostic reported along the way.
pub fn parse(source: &str) -> (ast::Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr_str(source: &str) -> String {
        let (program, errors) = parse(&format!("t = {};", source));
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(program.stmts.len(), 1);

        let assign: ast::Assign = program.stmts[0].kind.clone().try_into().unwrap();
        assign.expr.to_string()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(parse_expr_str("2 + 3 * 4"), "(+ 2 (* 3 4))");
        assert_eq!(parse_expr_str("(2 + 3) * 4"), "(* (+ 2 3) 4)");
        assert_eq!(parse_expr_str("8 / 4 / 2"), "(/ (/ 8 4) 2)");
        assert_eq!(parse_expr_str("1 - 2 - 3"), "(- (- 1 2) 3)");
    }

    #[test]
    fn comparisons_share_the_additive_tier() {
        assert_eq!(parse_expr_str("1 + 2 == 3"), "(== (+ 1 2) 3)");
        assert_eq!(parse_expr_str("3 == 1 + 2"), "(+ (== 3 1) 2)");
        assert_eq!(parse_expr_str("a < b > c"), "(> (< a b) c)");
        assert_eq!(parse_expr_str("x * 2 < 10"), "(< (* x 2) 10)");
    }

    #[test]
    fn non_operator_after_an_operand_ends_the_expression() {
        let (program, errors) = parse("t = 1 = 2; t = 3 4;");

        assert!(program.stmts.is_empty());
        assert_eq!(
            errors,
            vec![
                ParseError::UnexpectedToken {
                    expected: TokenKind::Semicolon,
                    found: TokenKind::Assign,
                    line: 1,
                    column: 7,
                },
                ParseError::UnexpectedToken {
                    expected: TokenKind::Semicolon,
                    found: TokenKind::IntLit,
                    line: 1,
                    column: 18,
                },
            ]
        );
    }

    #[test]
    fn parses_every_statement_form() {
        let (program, errors) = parse("int x; x = (10 + 2) * 5; if (x == 60) print(x);");

        assert!(errors.is_empty());
        assert_eq!(
            program.to_string(),
            "(int x)\n(assign x (* (+ 10 2) 5))\n(if (== x 60) (print x))\n"
        );
    }

    #[test]
    fn statement_spans_cover_their_tokens() {
        let source = "int x;  x = 1 + 2;";
        let (program, _) = parse(source);
        let chars = source.chars().collect::<Vec<_>>();

        let texts = program
            .stmts
            .iter()
            .map(|stmt| chars[stmt.span.clone()].iter().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["int x;", "x = 1 + 2;"]);
    }

    #[test]
    fn missing_semicolon_drops_the_statement_and_continues() {
        let (program, errors) = parse("int x\nint y;");

        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::Semicolon,
                found: TokenKind::Int,
                line: 2,
                column: 1,
            }]
        );
        // the failed declaration leaves `x` as current, so `int y;` is still found
        assert_eq!(program.to_string(), "(int y)\n");
    }

    #[test]
    fn print_only_accepts_a_bare_identifier() {
        let (program, errors) = parse("int x; print(x + 1);");

        assert_eq!(program.to_string(), "(int x)\n");
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::RightParen,
                found: TokenKind::Plus,
                line: 1,
                column: 16,
            }]
        );

        let (_, errors) = parse("print(5);");
        assert_eq!(
            errors[0].to_string(),
            "Parser Error (Line 1, Column 7): Expected token IDENTIFIER, got INTEGER_LITERAL"
        );
    }

    #[test]
    fn unrecognized_statement_starts_are_skipped_silently() {
        let (program, errors) = parse("x + 1; 42; int y; y;");

        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "(int y)\n");
    }

    #[test]
    fn bad_factor_reports_expected_expression() {
        let (program, errors) = parse("int x; x = * 2;");

        assert_eq!(program.stmts.len(), 1);
        assert_eq!(
            errors,
            vec![ParseError::ExpectedExpression {
                found: TokenKind::Star,
                line: 1,
                column: 12,
            }]
        );
    }

    #[test]
    fn oversized_literals_are_rejected() {
        let (program, errors) = parse("x = 99999999999;");

        assert!(program.stmts.is_empty());
        assert!(matches!(
            &errors[..],
            [ParseError::IntegerOutOfRange { lexeme, .. }] if lexeme == "99999999999"
        ));
    }

    #[test]
    fn illegal_characters_are_reported_once() {
        let (program, errors) = parse("int a;\n@ a = 1;");

        assert_eq!(program.to_string(), "(int a)\n(assign a 1)\n");
        assert_eq!(
            errors,
            vec![ParseError::IllegalCharacter {
                lexeme: "@".into(),
                line: 2,
                column: 1,
            }]
        );
    }

    #[test]
    fn if_with_unparseable_body_keeps_an_empty_body() {
        let (program, errors) = parse("if (1) 5; int z;");

        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "(if 1 ())\n(int z)\n");
    }

    #[test]
    fn nested_if_and_declaration_bodies_parse() {
        let (program, errors) = parse("if (1) if (2) int inner;");

        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "(if 1 (if 2 (int inner)))\n");
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let (program, errors) = parse("   \n ");

        assert!(program.stmts.is_empty());
        assert!(errors.is_empty());
    }
}
