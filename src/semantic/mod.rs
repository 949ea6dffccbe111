//! Semantic analysis: type checking over the parsed program
//!
//! The [`Analyzer`] walks the AST the parser produced, revisiting the
//! scopes it registered by id, and assigns every expression a resolved
//! [`Type`] in a side table keyed by node id. Faults become diagnostics;
//! analysis itself never fails. A fault poisons its expression with the
//! error type, which spreads upward silently so each mistake is reported
//! once.

pub mod scopes;
pub mod types;

mod const_eval;
mod expressions;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::*;
use crate::semantic::scopes::{ScopeId, SymbolTable, GLOBAL_SCOPE};
use crate::semantic::types::Type;
use rustc_hash::FxHashMap;

/// Type checker for one parsed program.
pub struct Analyzer<'a> {
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) diags: &'a mut Diagnostics,
    pub(crate) types: FxHashMap<NodeId, Type>,
    /// Return type of the function currently being checked.
    pub(crate) current_return: Type,
    /// Scope the walk is currently inside, used for name resolution.
    pub(crate) scope: ScopeId,
}

impl<'a> Analyzer<'a> {
    pub fn new(symbols: &'a SymbolTable, diags: &'a mut Diagnostics) -> Self {
        Self {
            symbols,
            diags,
            types: FxHashMap::default(),
            current_return: Type::Void,
            scope: GLOBAL_SCOPE,
        }
    }

    /// Check the whole program and return the expression type table.
    pub fn check_program(mut self, program: &Program) -> FxHashMap<NodeId, Type> {
        for item in &program.items {
            match item {
                Item::Function(decl) => self.check_function(decl),
                Item::Var { .. } | Item::Error { .. } => {}
            }
        }
        self.types
    }

    fn check_function(&mut self, decl: &FunctionDecl) {
        let body = match &decl.body {
            Some(body) => body,
            None => return,
        };

        self.current_return = decl.return_type.clone();
        self.scope = decl.scope;
        for stmt in &body.stmts {
            self.check_stmt(stmt);
        }
        self.scope = GLOBAL_SCOPE;
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { .. } | Stmt::Error { .. } => {}
            Stmt::Expr { expr, .. } => {
                self.check_expr(expr);
            }
            Stmt::Return { expr, location } => {
                self.check_return(expr.as_ref(), *location);
            }
            Stmt::Block(block) => {
                let outer = self.scope;
                self.scope = block.scope;
                for stmt in &block.stmts {
                    self.check_stmt(stmt);
                }
                self.scope = outer;
            }
        }
    }

    fn check_return(
        &mut self,
        expr: Option<&Expr>,
        location: crate::diagnostics::SourceLocation,
    ) {
        let expected = self.current_return.clone();

        let Some(expr) = expr else {
            if expected != Type::Void {
                self.diags.report(
                    DiagnosticKind::ConflictingType {
                        expected,
                        found: Type::Void,
                    },
                    location,
                );
            }
            return;
        };

        let found = self.check_expr(expr);
        if found.is_error() || found == expected {
            return;
        }
        if expected == Type::Int && found == Type::Float {
            self.diags.report(DiagnosticKind::FloatToInt, expr.location);
        } else if !(expected == Type::Float && found == Type::Int) {
            self.diags.report(
                DiagnosticKind::ConflictingType { expected, found },
                expr.location,
            );
        }
    }
}
