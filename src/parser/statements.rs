//! Statement parsing implementation
//!
//! Statements inside function bodies:
//!
//! ```text
//! statement      ::= var_decl | expr_statement | return_stmt | block
//! expr_statement ::= expr ";" | ";"
//! return_stmt    ::= "return" expr? ";"
//! block          ::= "{" statement* "}"
//! ```
//!
//! Local declarations register into the current scope immediately, like
//! their global counterparts. A malformed statement is reported, the
//! parser skips to the next `;` (or stops before the enclosing `}`), and
//! an error placeholder keeps the statement's position in the block.

use crate::diagnostics::DiagnosticKind;
use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::Parser;

impl<'a> Parser<'a> {
    /// Parse statements until the closing `}` of the current block, and
    /// consume it. Also used for function bodies, whose scope the caller
    /// manages.
    pub(crate) fn parse_block_statements(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let before = self.position;
            self.parse_statement(&mut stmts);
            if self.position == before {
                self.advance();
            }
        }

        if !self.match_kind(&TokenKind::RBrace) {
            // End of file inside an unterminated block.
            self.diags.report(
                DiagnosticKind::MalformedTopLevel {
                    detail: "unexpected end of file inside a block".to_string(),
                },
                self.current_location(),
            );
        }

        stmts
    }

    fn parse_statement(&mut self, stmts: &mut Vec<Stmt>) {
        let loc = self.current_location();

        if self.peek().is_type_keyword() {
            self.parse_local_decl(stmts);
            return;
        }

        if self.match_kind(&TokenKind::Return) {
            stmts.push(self.parse_return_statement());
            return;
        }

        if self.check(&TokenKind::LBrace) {
            stmts.push(Stmt::Block(self.parse_nested_block()));
            return;
        }

        // Empty statement
        if self.match_kind(&TokenKind::Semicolon) {
            return;
        }

        // Expression statement
        match self.parse_expression() {
            Ok(expr) => {
                if let Err(err) =
                    self.expect_kind(&TokenKind::Semicolon, "expected ';' after expression")
                {
                    self.diags.report(
                        DiagnosticKind::MalformedExprStatement {
                            detail: err.message,
                        },
                        err.location,
                    );
                    self.sync_statement();
                }
                stmts.push(Stmt::Expr {
                    expr,
                    location: loc,
                });
            }
            Err(err) => {
                self.diags.report(
                    DiagnosticKind::MalformedExprStatement {
                        detail: err.message,
                    },
                    err.location,
                );
                self.sync_statement();
                stmts.push(Stmt::Error { location: loc });
            }
        }
    }

    /// Parse a local variable declaration; the type keyword is next.
    fn parse_local_decl(&mut self, stmts: &mut Vec<Stmt>) {
        let loc = self.current_location();
        let base = self.parse_base_type();

        let first_name = match self.expect_identifier() {
            Ok(name) => name,
            Err(err) => {
                self.diags.report(
                    DiagnosticKind::MalformedDeclaration {
                        detail: err.message,
                    },
                    err.location,
                );
                self.sync_statement();
                stmts.push(Stmt::Error { location: loc });
                return;
            }
        };

        if base == crate::semantic::types::Type::Void {
            self.diags.report(
                DiagnosticKind::VoidType {
                    name: Some(first_name),
                },
                loc,
            );
            self.sync_statement();
            stmts.push(Stmt::Error { location: loc });
            return;
        }

        let mut name = first_name;
        loop {
            let decl_loc = self.previous_location();
            match self.parse_array_suffix(&base) {
                Ok(ty) => {
                    self.register_variable(&name, ty.clone(), decl_loc);
                    stmts.push(Stmt::VarDecl {
                        name: name.clone(),
                        declared: ty,
                        location: decl_loc,
                    });
                }
                Err(err) => {
                    self.diags.report(
                        DiagnosticKind::MalformedDeclaration {
                            detail: err.message,
                        },
                        err.location,
                    );
                    self.sync_statement();
                    stmts.push(Stmt::Error { location: decl_loc });
                    return;
                }
            }

            if self.match_kind(&TokenKind::Comma) {
                match self.expect_identifier() {
                    Ok(next) => name = next,
                    Err(err) => {
                        self.diags.report(
                            DiagnosticKind::MalformedDeclaration {
                                detail: err.message,
                            },
                            err.location,
                        );
                        self.sync_statement();
                        stmts.push(Stmt::Error { location: loc });
                        return;
                    }
                }
            } else {
                break;
            }
        }

        if let Err(err) = self.expect_kind(&TokenKind::Semicolon, "expected ';' after declaration") {
            self.diags.report(
                DiagnosticKind::MalformedDeclaration {
                    detail: err.message,
                },
                err.location,
            );
            self.sync_statement();
        }
    }

    /// Parse `return expr? ;`; the `return` keyword is already consumed.
    fn parse_return_statement(&mut self) -> Stmt {
        let loc = self.previous_location();

        if self.match_kind(&TokenKind::Semicolon) {
            return Stmt::Return {
                expr: None,
                location: loc,
            };
        }

        match self.parse_expression() {
            Ok(expr) => {
                if let Err(err) =
                    self.expect_kind(&TokenKind::Semicolon, "expected ';' after return value")
                {
                    self.diags.report(
                        DiagnosticKind::MalformedExprStatement {
                            detail: err.message,
                        },
                        err.location,
                    );
                    self.sync_statement();
                }
                Stmt::Return {
                    expr: Some(expr),
                    location: loc,
                }
            }
            Err(err) => {
                self.diags.report(
                    DiagnosticKind::MalformedExprStatement {
                        detail: err.message,
                    },
                    err.location,
                );
                self.sync_statement();
                Stmt::Error { location: loc }
            }
        }
    }

    /// Parse a nested `{ ... }` block with its own scope. The scope is
    /// closed before returning on every path.
    fn parse_nested_block(&mut self) -> Block {
        let loc = self.current_location();
        self.advance(); // '{'

        let scope = self.symbols.enter_scope();
        let stmts = self.parse_block_statements();
        self.symbols.exit_scope();

        Block {
            scope,
            stmts,
            location: loc,
        }
    }
}
