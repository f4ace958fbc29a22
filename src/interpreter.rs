use std::io::{self, Stdout, Write};

use tracing::{debug, trace};

use crate::{
    ast::{self, BinaryOp, ExprKind, StmtKind},
    common::RuntimeError,
    symtab::SymbolTable,
};

pub struct Vm<W = Stdout> {
    symbols: SymbolTable,
    memory: Vec<i32>,
    out: W,
}

impl Vm<Stdout> {
    pub fn new(symbols: SymbolTable) -> Self {
        Self::with_output(symbols, io::stdout())
    }
}

impl<W: Write> Vm<W> {
    // one cell per declared symbol; the table is frozen once the VM owns it
    pub fn with_output(symbols: SymbolTable, out: W) -> Self {
        let memory = vec![0; symbols.len()];
        Vm {
            symbols,
            memory,
            out,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn memory(&self) -> &[i32] {
        &self.memory
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.symbols.lookup(name).map(|slot| self.memory[slot])
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn evaluate(&self, expr: &ast::Expr) -> Result<i32, RuntimeError> {
        match &expr.kind {
            ExprKind::Lit(lit) => Ok(lit.value),
            ExprKind::Var(var) => self
                .value_of(&var.name)
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: var.name.clone(),
                }),
            ExprKind::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                apply(binary.op, left, right)
            }
        }
    }

    pub fn execute(&mut self, stmt: &ast::Stmt) -> Result<(), RuntimeError> {
        trace!(span = ?stmt.span, "executing statement");

        match &stmt.kind {
            // slots are reserved by the semantic pass and memory starts zeroed
            StmtKind::VarDecl(_) => {}
            StmtKind::Assign(assign) => {
                let slot = self.symbols.lookup(&assign.name).ok_or_else(|| {
                    RuntimeError::UndeclaredAssignment {
                        name: assign.name.clone(),
                    }
                })?;

                let value = self.evaluate(&assign.expr)?;
                self.memory[slot] = value;
                writeln!(self.out, "Assigned '{}' = {}", assign.name, value)?;
            }
            StmtKind::Print(print) => {
                let value = self.evaluate(&print.expr)?;
                writeln!(self.out, "Oba-C Output: {}", value)?;
            }
            StmtKind::If(if_stmt) => {
                if self.evaluate(&if_stmt.condition)? != 0 {
                    if let Some(body) = &if_stmt.body {
                        self.execute(body)?;
                    }
                }
            }
        }

        Ok(())
    }

    pub fn execute_program(&mut self, program: &ast::Program) -> Result<(), RuntimeError> {
        debug!(statements = program.stmts.len(), "running program");

        for stmt in &program.stmts {
            self.execute(stmt)?;
        }

        self.out.flush()?;
        Ok(())
    }
}

fn apply(op: BinaryOp, left: i32, right: i32) -> Result<i32, RuntimeError> {
    let overflow = || RuntimeError::Overflow { op, left, right };

    match op {
        BinaryOp::Add => left.checked_add(right).ok_or_else(overflow),
        BinaryOp::Sub => left.checked_sub(right).ok_or_else(overflow),
        BinaryOp::Mul => left.checked_mul(right).ok_or_else(overflow),
        BinaryOp::Div => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            left.checked_div(right).ok_or_else(overflow)
        }
        BinaryOp::Eq => Ok((left == right) as i32),
        BinaryOp::Lt => Ok((left < right) as i32),
        BinaryOp::Gt => Ok((left > right) as i32),
    }
}
