use std::io::{self, Write};

use crate::{
    common::Span,
    token::{Token, TokenKind},
};

#[derive(Debug, Clone)]
pub struct Lexer {
    pub source: Vec<char>,

    start: usize,
    current: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::from_chars(source.chars().collect())
    }

    pub fn from_chars(chars: Vec<char>) -> Self {
        Lexer {
            source: chars,
            start: 0,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.current += 1;
        }
    }

    fn get_span(&self) -> Span {
        self.start..self.current
    }

    fn create_token(&self, kind: TokenKind, column: usize) -> Token {
        Token {
            kind,
            lexeme: self.source[self.get_span()].iter().collect(),
            line: self.line,
            column,
            span: self.get_span(),
        }
    }

    // Matches C `isspace`, vertical tab and form feed included.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') = self.peek() {
            self.advance();
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        TokenKind::IntLit
    }

    fn lex_ident(&mut self) -> TokenKind {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let keyword_str = self.source[self.get_span()].iter().collect::<String>();
        TokenKind::from_keyword_str(&keyword_str).unwrap_or(TokenKind::Ident)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        let column = self.column;

        let c = match self.peek() {
            Some(c) => c,
            None => return self.create_token(TokenKind::Eof, column),
        };
        self.advance();

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ';' => TokenKind::Semicolon,
            '<' => TokenKind::Lesser,
            '>' => TokenKind::Greater,
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Assign
                }
            }

            _ if c.is_ascii_digit() => self.lex_number(),
            _ if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(),

            _ => TokenKind::Illegal,
        };

        self.create_token(kind, column)
    }

    /// Collects every token up to and including the first `Eof`.
    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }
}

/// Writes one `[line:column] Type: KIND Lexeme: "text"` line per token of
/// `source`, `Eof` included, then the count of meaningful tokens.
pub fn dump<W: Write>(source: &str, mut out: W) -> io::Result<usize> {
    let mut lexer = Lexer::new(source);
    let mut count = 0;

    loop {
        let token = lexer.next_token();
        writeln!(
            out,
            "[{:>3}:{:<2}] Type: {:<16} Lexeme: \"{}\"",
            token.line,
            token.column,
            token.kind.to_string(),
            token.lexeme
        )?;

        if token.kind == TokenKind::Illegal {
            writeln!(
                out,
                "!!! ERROR: Found illegal token on line {}, column {}",
                token.line, token.column
            )?;
        }

        if token.kind == TokenKind::Eof {
            break;
        }
        count += 1;
    }

    writeln!(out, "Successfully tokenized {} meaningful units.", count)?;
    Ok(count)
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).lex().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_declaration_and_assignment() {
        use TokenKind::*;

        assert_eq!(
            kinds("int x; x = (10 + 2) * 5;"),
            vec![
                Int, Ident, Semicolon, Ident, Assign, LeftParen, IntLit, Plus, IntLit, RightParen,
                Star, IntLit, Semicolon, Eof
            ]
        );
    }

    #[test]
    fn equals_needs_one_char_of_lookahead() {
        use TokenKind::*;

        assert_eq!(kinds("a == b"), vec![Ident, EqualEqual, Ident, Eof]);
        assert_eq!(kinds("a = b"), vec![Ident, Assign, Ident, Eof]);
        assert_eq!(kinds("a === b"), vec![Ident, EqualEqual, Assign, Ident, Eof]);
        assert_eq!(kinds("a<b>c"), vec![Ident, Lesser, Ident, Greater, Ident, Eof]);
    }

    #[test]
    fn keywords_are_only_whole_identifiers() {
        use TokenKind::*;

        assert_eq!(
            kinds("int integer if if_ print _print"),
            vec![Int, Ident, If, Ident, Print, Ident, Eof]
        );
    }

    #[test]
    fn identifiers_may_contain_digits_but_not_start_with_them() {
        let tokens = Lexer::new("x1 9lives").lex();

        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "x1");
        assert_eq!(tokens[1].kind, TokenKind::IntLit);
        assert_eq!(tokens[1].lexeme, "9");
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].lexeme, "lives");
    }

    #[test]
    fn illegal_characters_are_single_tokens_and_do_not_stop_lexing() {
        let tokens = Lexer::new("illegal@char é").lex();
        let summary = tokens
            .iter()
            .map(|t| (t.kind, t.lexeme.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(
            summary,
            vec![
                (TokenKind::Ident, "illegal"),
                (TokenKind::Illegal, "@"),
                (TokenKind::Ident, "char"),
                (TokenKind::Illegal, "é"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = Lexer::new("int my_var;\n  my_var = 60;").lex();
        let positions = tokens
            .iter()
            .map(|t| (t.line, t.column))
            .collect::<Vec<_>>();

        assert_eq!(
            positions,
            vec![(1, 1), (1, 5), (1, 11), (2, 3), (2, 10), (2, 12), (2, 14), (2, 15)]
        );
    }

    #[test]
    fn end_of_input_is_idempotent() {
        let mut lexer = Lexer::new("x ");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);

        for _ in 0..5 {
            let token = lexer.next_token();
            assert_eq!(token.kind, TokenKind::Eof);
            assert_eq!(token.lexeme, "");
            assert_eq!(token.span, 2..2);
        }
    }

    #[test]
    fn empty_and_blank_inputs_only_produce_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds(" \t\r\n\x0b\x0c"), vec![TokenKind::Eof]);
    }

    #[test]
    fn lexemes_and_whitespace_reconstruct_the_source() {
        let source = "int a;\n\ta = 7 / (2 - 9) ;  if (a<3)print(a);$ \n";
        let tokens = Lexer::new(source).lex();
        let chars = source.chars().collect::<Vec<_>>();

        let mut rebuilt = String::new();
        let mut cursor = 0;
        for token in &tokens {
            rebuilt.extend(&chars[cursor..token.span.start]);
            assert!(chars[cursor..token.span.start]
                .iter()
                .all(|c| c.is_ascii_whitespace()));
            rebuilt.push_str(&token.lexeme);
            cursor = token.span.end;
        }
        rebuilt.extend(&chars[cursor..]);

        assert_eq!(rebuilt, source);
    }

    #[test]
    fn iterator_stops_before_eof() {
        let lexemes = Lexer::new("print ( x ) ;  ")
            .map(|t| t.lexeme)
            .collect::<Vec<_>>();

        assert_eq!(lexemes, vec!["print", "(", "x", ")", ";"]);
    }

    #[test]
    fn dump_lists_every_token_and_flags_illegal_ones() {
        let source = "int my_var; \nmy_var = (10 + 2) * 5; \nif (my_var == 60) print(my_var); \nillegal@char";
        let mut out = Vec::new();

        let count = dump(source, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(count, 27);
        assert_eq!(lines[0], "[  1:1 ] Type: INT              Lexeme: \"int\"");
        assert_eq!(lines[1], "[  1:5 ] Type: IDENTIFIER       Lexeme: \"my_var\"");
        assert_eq!(lines[4], "[  2:8 ] Type: ASSIGN           Lexeme: \"=\"");
        assert_eq!(lines[16], "[  3:12] Type: EQUAL            Lexeme: \"==\"");
        assert_eq!(
            &lines[lines.len() - 6..],
            [
                "[  4:1 ] Type: IDENTIFIER       Lexeme: \"illegal\"",
                "[  4:8 ] Type: ILLEGAL          Lexeme: \"@\"",
                "!!! ERROR: Found illegal token on line 4, column 8",
                "[  4:9 ] Type: IDENTIFIER       Lexeme: \"char\"",
                "[  4:13] Type: EOF              Lexeme: \"\"",
                "Successfully tokenized 27 meaningful units.",
            ]
        );
    }
}
