//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the error type, token-cursor helpers, the program entry
//! point, and the resynchronization routines used for error recovery.
//!
//! # Parser Architecture
//!
//! Recursive descent, with methods split across `impl Parser` blocks:
//! - This module: Parser struct, helpers, recovery, and coordination
//! - `declarations`: top-level declarations, types, parameter lists
//! - `statements`: block and statement parsing
//! - `expressions`: expression parsing with precedence climbing
//!
//! # Error recovery
//!
//! Parsing methods propagate [`ParseError`] with `?` internally; the
//! statement and top-level loops convert failures into SYNTAX diagnostics
//! and skip to a synchronizing token so later constructs still parse:
//! - top level: the next type keyword at brace depth zero
//! - statements: past the next `;`, or up to the enclosing `}`
//! - parameter lists: the closing `)` of the header
//!
//! Declarations register into the symbol table as soon as they are parsed,
//! which is where redefinition conflicts are detected and reported.

use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceLocation};
use crate::lexer::{Token, TokenKind};
use crate::parser::ast::*;
use crate::semantic::scopes::{DeclareConflict, SymbolKind, SymbolTable};
use std::fmt;

/// Parser error type, converted to a diagnostic at the recovery site.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Recursive descent parser over a lexed token stream.
///
/// Holds the symbol table and diagnostic sink for the run so declarations
/// can be registered the moment they are parsed.
pub struct Parser<'a> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) next_id: NodeId,
    pub(crate) symbols: &'a mut SymbolTable,
    pub(crate) diags: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        symbols: &'a mut SymbolTable,
        diags: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tokens,
            position: 0,
            next_id: 0,
            symbols,
            diags,
        }
    }

    /// Parse the entire program. Never fails: malformed constructs are
    /// reported and replaced with error placeholders.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.is_at_end() {
            let before = self.position;
            self.parse_top_level(&mut program);
            if self.position == before {
                // A recovery path that consumed nothing would loop forever.
                self.advance();
            }
        }

        program
    }

    // ===== Cursor helpers =====

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    pub(crate) fn expect_kind(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if matches!(self.peek().kind, TokenKind::Ident) {
            Ok(self.advance().lexeme.clone())
        } else {
            Err(ParseError {
                message: format!("expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    /// Allocate a fresh expression node.
    pub(crate) fn new_expr(&mut self, kind: ExprKind, location: SourceLocation) -> Expr {
        let id = self.next_id;
        self.next_id += 1;
        Expr { id, location, kind }
    }

    // ===== Recovery points =====

    /// Skip to the next type keyword at brace depth zero, the start of the
    /// next plausible top-level declaration.
    pub(crate) fn sync_top_level(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ if depth == 0 && self.peek().is_type_keyword() => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip past the next `;`, or stop before the enclosing `}` so the
    /// block parser can close its scope.
    pub(crate) fn sync_statement(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the closing `)` of a function header. Stops early at `{`
    /// or `;` so a missing parenthesis does not swallow the body.
    pub(crate) fn sync_parameter_list(&mut self) {
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::RParen => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace | TokenKind::Semicolon => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ===== Symbol registration =====

    /// Map a declaration conflict to its diagnostic kind. The kind of the
    /// *new* declaration picks the redefinition family; a kind or type
    /// mismatch is a redeclaration instead.
    pub(crate) fn report_declare_conflict(
        &mut self,
        name: &str,
        new_kind: SymbolKind,
        conflict: DeclareConflict,
        location: SourceLocation,
    ) {
        let kind = if conflict.same_kind_and_type {
            match new_kind {
                SymbolKind::Parameter => DiagnosticKind::ParamRedefinition {
                    name: name.to_string(),
                },
                SymbolKind::Function => DiagnosticKind::FuncRedefinition {
                    name: name.to_string(),
                },
                SymbolKind::Variable | SymbolKind::Array => DiagnosticKind::VariableRedefinition {
                    name: name.to_string(),
                },
            }
        } else {
            DiagnosticKind::DifferentRedeclaration {
                name: name.to_string(),
            }
        };
        self.diags.report(kind, location);
    }
}
