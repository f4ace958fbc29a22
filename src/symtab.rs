use tracing::{debug, warn};

use crate::{
    ast::{self, StmtKind},
    common::SymbolError,
};

pub const MAX_SYMBOLS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub slot: usize,
}

/// Flat name to slot mapping. Slots are handed out in declaration order
/// starting at 0, so a symbol's slot is always its index in `symbols`.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    capacity: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SYMBOLS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SymbolTable {
            symbols: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn insert(&mut self, name: &str) -> Result<usize, SymbolError> {
        if self.symbols.len() >= self.capacity {
            return Err(SymbolError::Overflow {
                capacity: self.capacity,
            });
        }

        if self.lookup(name).is_some() {
            return Err(SymbolError::AlreadyDeclared { name: name.into() });
        }

        let slot = self.symbols.len();
        self.symbols.push(Symbol {
            name: name.into(),
            slot,
        });

        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.symbols
            .iter()
            .find(|symbol| symbol.name == name)
            .map(|symbol| symbol.slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Registers every top-level declaration of `program`, in order.
    ///
    /// Declarations nested as an `if` body are not registered; assignments to
    /// them fail at runtime.
    pub fn declare_program(&mut self, program: &ast::Program) -> Result<(), SymbolError> {
        for stmt in &program.stmts {
            match &stmt.kind {
                StmtKind::VarDecl(decl) => {
                    let slot = self.insert(&decl.name)?;
                    debug!(name = %decl.name, slot, "declared variable");
                }
                StmtKind::If(if_stmt) => {
                    if let Some(decl) = nested_declaration(if_stmt) {
                        warn!(name = %decl.name, "declaration inside `if` body is never registered");
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Follows a chain of `if` bodies down to the declaration at its end, if any.
pub fn nested_declaration(if_stmt: &ast::IfStmt) -> Option<&ast::VarDecl> {
    let mut body = if_stmt.body.as_deref();

    while let Some(stmt) = body {
        body = match &stmt.kind {
            StmtKind::If(nested) => nested.body.as_deref(),
            StmtKind::VarDecl(decl) => return Some(decl),
            _ => None,
        };
    }

    None
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
