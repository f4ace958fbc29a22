use std::fmt;

use derive_more::{Display, From, TryInto};

use crate::{common::Span, token::TokenKind};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    #[display(fmt = "+")]
    Add,
    #[display(fmt = "-")]
    Sub,
    #[display(fmt = "*")]
    Mul,
    #[display(fmt = "/")]
    Div,
    #[display(fmt = "==")]
    Eq,
    #[display(fmt = "<")]
    Lt,
    #[display(fmt = ">")]
    Gt,
}

impl BinaryOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOp> {
        match kind {
            TokenKind::Plus => Some(Self::Add),
            TokenKind::Minus => Some(Self::Sub),
            TokenKind::Star => Some(Self::Mul),
            TokenKind::Slash => Some(Self::Div),
            TokenKind::EqualEqual => Some(Self::Eq),
            TokenKind::Lesser => Some(Self::Lt),
            TokenKind::Greater => Some(Self::Gt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub expr: Expr,
}

// `body` is absent when the statement after `if (...)` could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, From, TryInto)]
pub enum StmtKind {
    VarDecl(VarDecl),
    Assign(Assign),
    Print(Print),
    If(IfStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lit {
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarExpr {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, From, TryInto)]
pub enum ExprKind {
    Binary(BinaryExpr),
    Lit(Lit),
    Var(VarExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr {
            span: left.span.start..right.span.end,
            kind: BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }
            .into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Binary(binary) => write!(f, "({} {} {})", binary.op, binary.left, binary.right),
            ExprKind::Lit(lit) => write!(f, "{}", lit.value),
            ExprKind::Var(var) => write!(f, "{}", var.name),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::VarDecl(decl) => write!(f, "(int {})", decl.name),
            StmtKind::Assign(assign) => write!(f, "(assign {} {})", assign.name, assign.expr),
            StmtKind::Print(print) => write!(f, "(print {})", print.expr),
            StmtKind::If(if_stmt) => match &if_stmt.body {
                Some(body) => write!(f, "(if {} {})", if_stmt.condition, body),
                None => write!(f, "(if {} ())", if_stmt.condition),
            },
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            writeln!(f, "{}", stmt)?;
        }

        Ok(())
    }
}
