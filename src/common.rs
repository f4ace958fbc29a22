use std::{io, ops::Range};

use thiserror::Error;

use crate::{ast::BinaryOp, token::TokenKind};

pub type Span = Range<usize>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Parser Error (Line {line}, Column {column}): Expected token {expected}, got {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        line: usize,
        column: usize,
    },
    #[error("Parser Error (Line {line}, Column {column}): Expected literal, identifier, or '(', got {found}")]
    ExpectedExpression {
        found: TokenKind,
        line: usize,
        column: usize,
    },
    #[error("Parser Error (Line {line}, Column {column}): integer literal '{lexeme}' is out of range")]
    IntegerOutOfRange {
        lexeme: String,
        line: usize,
        column: usize,
    },
    #[error("Lexer Error (Line {line}, Column {column}): illegal character '{lexeme}'")]
    IllegalCharacter {
        lexeme: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::ExpectedExpression { line, .. }
            | Self::IntegerOutOfRange { line, .. }
            | Self::IllegalCharacter { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SymbolError {
    #[error("variable '{name}' already declared")]
    AlreadyDeclared { name: String },
    #[error("symbol table overflow, max {capacity} symbols supported")]
    Overflow { capacity: usize },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("cannot assign to undeclared variable '{name}'")]
    UndeclaredAssignment { name: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {left} {op} {right}")]
    Overflow { op: BinaryOp, left: i32, right: i32 },
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Semantic Error: {0}")]
    Semantic(#[from] SymbolError),
    #[error("Runtime Error: {0}")]
    Runtime(#[from] RuntimeError),
}
