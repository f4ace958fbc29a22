use derive_more::Display;

use crate::common::{ParseError, Span};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // keywords
    #[display(fmt = "INT")]
    Int,
    #[display(fmt = "IF")]
    If,
    #[display(fmt = "PRINT")]
    Print,

    // symbols
    #[display(fmt = "ASSIGN")]
    Assign,
    #[display(fmt = "PLUS")]
    Plus,
    #[display(fmt = "MINUS")]
    Minus,
    #[display(fmt = "STAR")]
    Star,
    #[display(fmt = "SLASH")]
    Slash,
    #[display(fmt = "SEMICOLON")]
    Semicolon,
    #[display(fmt = "LPAREN")]
    LeftParen,
    #[display(fmt = "RPAREN")]
    RightParen,
    #[display(fmt = "EQUAL")]
    EqualEqual,
    #[display(fmt = "LT")]
    Lesser,
    #[display(fmt = "GT")]
    Greater,

    #[display(fmt = "IDENTIFIER")]
    Ident,
    #[display(fmt = "INTEGER_LITERAL")]
    IntLit,

    #[display(fmt = "EOF")]
    Eof,
    #[display(fmt = "ILLEGAL")]
    Illegal,
}

impl TokenKind {
    pub fn from_keyword_str(name: &str) -> Option<TokenKind> {
        match name {
            "int" => Some(TokenKind::Int),
            "if" => Some(TokenKind::If),
            "print" => Some(TokenKind::Print),
            _ => None,
        }
    }

    pub fn is_additive_op(&self) -> bool {
        matches!(
            *self,
            Self::Plus | Self::Minus | Self::EqualEqual | Self::Lesser | Self::Greater
        )
    }

    pub fn is_multiplicative_op(&self) -> bool {
        matches!(*self, Self::Star | Self::Slash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn unexpected(&self, expected: TokenKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.kind,
            line: self.line,
            column: self.column,
        }
    }
}
