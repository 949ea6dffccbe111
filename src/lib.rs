//! # Introduction
//!
//! minic analyzes a small C-like language: it tokenizes the source, builds
//! an AST, and type checks it, reporting every fault it finds instead of
//! stopping at the first one.
//!
//! ## Analysis pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST + Symbols → Analyzer → Types
//! ```
//!
//! 1. [`lexer`] — turns source text into tokens, recovering from lexical
//!    faults at the next line.
//! 2. [`parser`] — recursive descent over the token stream; declarations
//!    register into the symbol table as they are parsed, and malformed
//!    constructs are replaced with error placeholders.
//! 3. [`semantic`] — revisits the parsed scopes and assigns every
//!    expression a resolved type; the error type spreads silently so each
//!    mistake is reported once.
//! 4. [`diagnostics`] — the shared append-only sink all three stages
//!    report into, in source order.
//!
//! ## Supported language
//!
//! Types: `int`, `float`, `void` (return only), one-dimensional arrays.
//! Functions with prototypes, expression statements, `return`, nested
//! blocks with lexical scoping, and C operator precedence for arithmetic,
//! comparison, logical, and bitwise operators.

pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod semantic;

use diagnostics::Diagnostics;
use lexer::Lexer;
use parser::ast::{NodeId, Program};
use parser::Parser;
use rustc_hash::FxHashMap;
use semantic::scopes::SymbolTable;
use semantic::types::Type;
use semantic::Analyzer;

/// Everything one analysis run produced.
pub struct Analysis {
    pub program: Program,
    pub symbols: SymbolTable,
    /// Resolved type of every expression, keyed by node id.
    pub types: FxHashMap<NodeId, Type>,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    /// Number of errors found. Warnings are excluded; a run with only
    /// warnings counts as successful.
    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }
}

/// Run the full analysis pipeline over one source unit.
///
/// Never fails: faults of any class are collected in the returned
/// diagnostics, and the partial program and types are still available.
pub fn analyze(source: &str) -> Analysis {
    let mut diagnostics = Diagnostics::new();

    let tokens = Lexer::new(source).tokenize(&mut diagnostics);

    let mut symbols = SymbolTable::new();
    let program = Parser::new(tokens, &mut symbols, &mut diagnostics).parse_program();

    let types = Analyzer::new(&symbols, &mut diagnostics).check_program(&program);

    diagnostics.finalize();

    Analysis {
        program,
        symbols,
        types,
        diagnostics,
    }
}
