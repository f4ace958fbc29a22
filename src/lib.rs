//! # obac
//!
//! A small interpreter for Oba-C, a toy imperative language with integer
//! variables, assignment, arithmetic and comparison expressions, `print`
//! and single-branch `if`.
//!
//! Source goes through four stages: the [`lexer`] produces tokens on demand,
//! the [`parser`] builds an [`ast::Program`] by recursive descent, the
//! semantic pass in [`symtab`] gives every top-level declaration a memory
//! slot, and the [`interpreter`] walks the tree against that memory.
//!
//! ```
//! let mut out = Vec::new();
//! let report = obac::run("int x; x = 6 * 7; print(x);", obac::MAX_SYMBOLS, &mut out).unwrap();
//!
//! assert!(report.diagnostics.is_empty());
//! assert_eq!(String::from_utf8(out).unwrap(), "Assigned 'x' = 42\nOba-C Output: 42\n");
//! ```

use std::io::{self, Write};

use tracing::debug;

pub mod ast;
pub mod common;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod symtab;
pub mod token;

pub use common::{Error, ParseError, RuntimeError, SymbolError};
pub use interpreter::Vm;
pub use lexer::Lexer;
pub use parser::Parser;
pub use symtab::{SymbolTable, MAX_SYMBOLS};

/// What a completed run leaves behind besides its output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Structural errors recovered from while parsing.
    pub diagnostics: Vec<ParseError>,
    /// Final value of every declared variable, in slot order.
    pub variables: Vec<(String, i32)>,
}

/// Runs `source` end to end, writing program output to `out`.
///
/// Structural errors do not stop the run; the statements that could be
/// recovered are still executed and the errors come back in the report.
///
/// # Errors
/// Fails on the first semantic error (duplicate declaration, too many
/// variables) or runtime error (undefined variable, division by zero,
/// overflow, failed write).
pub fn run<W: Write>(source: &str, capacity: usize, out: W) -> Result<Report, Error> {
    let (program, diagnostics) = parser::parse(source);
    let variables = execute(&program, capacity, out)?;

    Ok(Report {
        diagnostics,
        variables,
    })
}

/// Runs the semantic pass over an already parsed `program` and executes it
/// on a fresh VM with `capacity` memory cells, returning the final value of
/// every declared variable.
pub fn execute<W: Write>(
    program: &ast::Program,
    capacity: usize,
    out: W,
) -> Result<Vec<(String, i32)>, Error> {
    let mut symbols = SymbolTable::with_capacity(capacity);
    symbols.declare_program(program)?;

    let mut vm = Vm::with_output(symbols, out);
    if let Err(err) = vm.execute_program(program) {
        debug!(error = %err, "run aborted");
        return Err(err.into());
    }

    Ok(vm
        .symbols()
        .iter()
        .map(|symbol| (symbol.name.clone(), vm.memory()[symbol.slot]))
        .collect())
}

/// What the host does with a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    Tokens,
    Ast,
}

/// Drives one host invocation: program output and dumps go to `out`,
/// diagnostics and fatal errors to `err`. Returns the process exit status,
/// 0 on success and 1 on a semantic or runtime error (or, with
/// [`Mode::Ast`], on any structural error).
///
/// # Errors
/// Fails only when `out` or `err` cannot be written.
pub fn drive<O: Write, E: Write>(
    source: &str,
    mode: Mode,
    capacity: usize,
    mut out: O,
    mut err: E,
) -> io::Result<u8> {
    if mode == Mode::Tokens {
        lexer::dump(source, &mut out)?;
        return Ok(0);
    }

    let (program, diagnostics) = parser::parse(source);
    for error in &diagnostics {
        writeln!(err, "{}", error)?;
    }

    if mode == Mode::Ast {
        write!(out, "{}", program)?;
        return Ok(if diagnostics.is_empty() { 0 } else { 1 });
    }

    match execute(&program, capacity, &mut out) {
        Ok(variables) => {
            debug!(variables = variables.len(), "execution complete");
            Ok(0)
        }
        Err(Error::Runtime(RuntimeError::Output(e))) => Err(e),
        Err(e) => {
            writeln!(err, "{}", e)?;
            Ok(1)
        }
    }
}
