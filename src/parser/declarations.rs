//! Declaration parsing implementation
//!
//! Top-level declarations, parameter lists, and the shared declarator
//! forms:
//!
//! ```text
//! program     ::= ( var_decl | func_decl )*
//! var_decl    ::= type declarator ( "," declarator )* ";"
//! declarator  ::= ident ( "[" INTNUM "]" )?
//! func_decl   ::= type ident "(" params ")" ( "{" statements "}" | ";" )
//! params      ::= "void" | ε | param ( "," param )*
//! param       ::= type ident ( "[" "]" | "[" INTNUM "]" )?
//! ```
//!
//! Every declaration is registered into the symbol table as soon as it is
//! parsed; redefinition and redeclaration conflicts are reported here, at
//! declaration time. `void` is accepted only as a function return type.

use crate::diagnostics::{DiagnosticKind, SourceLocation};
use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};
use crate::semantic::scopes::{Symbol, SymbolKind, GLOBAL_SCOPE};
use crate::semantic::types::Type;

impl<'a> Parser<'a> {
    /// Parse one top-level construct into the program, recovering from
    /// malformed input so the next construct still parses.
    pub(crate) fn parse_top_level(&mut self, program: &mut Program) {
        let loc = self.current_location();

        if !self.peek().is_type_keyword() {
            self.diags.report(
                DiagnosticKind::MalformedTopLevel {
                    detail: format!("expected a declaration, found {}", self.peek()),
                },
                loc,
            );
            self.sync_top_level();
            program.items.push(Item::Error { location: loc });
            return;
        }

        let base = self.parse_base_type();

        let name = match self.expect_identifier() {
            Ok(name) => name,
            Err(err) => {
                self.diags.report(
                    DiagnosticKind::MalformedDeclaration {
                        detail: err.message,
                    },
                    err.location,
                );
                self.sync_statement();
                program.items.push(Item::Error { location: loc });
                return;
            }
        };

        if self.check(&TokenKind::LParen) {
            let item = self.parse_function(base, name, loc);
            program.items.push(item);
        } else {
            self.parse_global_var(base, name, loc, program);
        }
    }

    /// Consume a type keyword. The caller has already checked one is next.
    pub(crate) fn parse_base_type(&mut self) -> Type {
        match self.advance().kind {
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            _ => Type::Void,
        }
    }

    /// Parse the declarators of a global variable declaration; the first
    /// identifier has already been consumed.
    fn parse_global_var(&mut self, base: Type, first_name: String, loc: SourceLocation, program: &mut Program) {
        if base == Type::Void {
            self.diags.report(
                DiagnosticKind::VoidType {
                    name: Some(first_name),
                },
                loc,
            );
            self.sync_statement();
            program.items.push(Item::Error { location: loc });
            return;
        }

        let mut name = first_name;
        loop {
            let decl_loc = self.previous_location();
            match self.parse_array_suffix(&base) {
                Ok(ty) => {
                    self.register_variable(&name, ty.clone(), decl_loc);
                    program.items.push(Item::Var {
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
                    program.items.push(Item::Error { location: decl_loc });
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
                        program.items.push(Item::Error { location: loc });
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

    /// Optional `[ INTNUM ]` suffix turning a scalar declarator into an
    /// array declarator.
    pub(crate) fn parse_array_suffix(&mut self, base: &Type) -> Result<Type, ParseError> {
        if !self.match_kind(&TokenKind::LBracket) {
            return Ok(base.clone());
        }

        if let TokenKind::IntLiteral(size) = self.peek().kind {
            self.advance();
            self.expect_kind(&TokenKind::RBracket, "expected ']' after array size")?;
            Ok(Type::Array(Box::new(base.clone()), Some(size as usize)))
        } else {
            Err(ParseError {
                message: format!(
                    "array size must be an integer constant, found {}",
                    self.peek()
                ),
                location: self.current_location(),
            })
        }
    }

    /// Register a variable or array declaration in the current scope and
    /// report any conflict with an existing declaration.
    pub(crate) fn register_variable(
        &mut self,
        name: &str,
        ty: Type,
        location: SourceLocation,
    ) {
        let kind = if matches!(ty, Type::Array(_, _)) {
            SymbolKind::Array
        } else {
            SymbolKind::Variable
        };
        let result = self.symbols.declare(Symbol {
            name: name.to_string(),
            kind,
            ty,
            defined: true,
            location,
        });
        if let Err(conflict) = result {
            self.report_declare_conflict(name, kind, conflict, location);
        }
    }

    /// Parse a function definition or prototype. The parameter scope is
    /// entered here and closed on every path out, recovery included.
    fn parse_function(
        &mut self,
        return_type: Type,
        name: String,
        header_loc: SourceLocation,
    ) -> Item {
        self.advance(); // '('
        let scope = self.symbols.enter_scope();

        let params = match self.parse_parameter_list() {
            Ok(params) => params,
            Err(err) => {
                self.diags.report(
                    DiagnosticKind::MalformedParameterList {
                        detail: err.message,
                    },
                    err.location,
                );
                self.sync_parameter_list();
                Vec::new()
            }
        };

        let fn_type = Type::Function {
            params: params.iter().map(|p| p.ty.clone()).collect(),
            ret: Box::new(return_type.clone()),
        };
        let has_body = self.check(&TokenKind::LBrace);
        self.register_function(&name, fn_type, has_body, header_loc);

        let body = if self.match_kind(&TokenKind::LBrace) {
            let stmts = self.parse_block_statements();
            Some(Block {
                scope,
                stmts,
                location: header_loc,
            })
        } else if self.match_kind(&TokenKind::Semicolon) {
            None
        } else {
            self.diags.report(
                DiagnosticKind::MalformedTopLevel {
                    detail: format!("expected function body or ';', found {}", self.peek()),
                },
                self.current_location(),
            );
            self.sync_top_level();
            None
        };

        self.symbols.exit_scope();

        Item::Function(FunctionDecl {
            name,
            params,
            return_type,
            body,
            scope,
            location: header_loc,
        })
    }

    /// Register a function symbol in the global scope. A prototype
    /// followed by a matching definition completes the symbol; anything
    /// else that reuses the name is a conflict.
    fn register_function(
        &mut self,
        name: &str,
        ty: Type,
        has_body: bool,
        location: SourceLocation,
    ) {
        let existing = self
            .symbols
            .lookup_in(GLOBAL_SCOPE, name)
            .map(|s| (s.kind, s.ty.clone(), s.defined));

        match existing {
            Some((kind, existing_ty, defined)) => {
                let same = kind == SymbolKind::Function && existing_ty == ty;
                if same && !defined && has_body {
                    self.symbols.mark_defined(name);
                } else if same {
                    self.diags.report(
                        DiagnosticKind::FuncRedefinition {
                            name: name.to_string(),
                        },
                        location,
                    );
                } else {
                    self.diags.report(
                        DiagnosticKind::DifferentRedeclaration {
                            name: name.to_string(),
                        },
                        location,
                    );
                }
            }
            None => {
                // Cannot conflict: the name was just checked.
                let _ = self.symbols.declare_global(Symbol {
                    name: name.to_string(),
                    kind: SymbolKind::Function,
                    ty,
                    defined: has_body,
                    location,
                });
            }
        }
    }

    /// Parse a parameter list, consuming through the closing `)`.
    ///
    /// `(void)` and `()` both mean no parameters. A parameter without a
    /// name or with a `void` type is reported and dropped from the list;
    /// parsing continues with the next parameter.
    fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.match_kind(&TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(&TokenKind::Void)
            && matches!(self.peek_ahead(1), Some(t) if matches!(t.kind, TokenKind::RParen))
        {
            self.advance();
            self.advance();
            return Ok(params);
        }

        loop {
            let loc = self.current_location();

            if !self.peek().is_type_keyword() {
                return Err(ParseError {
                    message: format!("expected parameter type, found {}", self.peek()),
                    location: loc,
                });
            }
            let base = self.parse_base_type();

            let name = if matches!(self.peek().kind, TokenKind::Ident) {
                Some(self.advance().lexeme.clone())
            } else {
                self.diags.report(DiagnosticKind::NamelessParameter, loc);
                None
            };

            // Array suffix: `[]` (unsized) or `[N]`
            let ty = if self.match_kind(&TokenKind::LBracket) {
                if self.match_kind(&TokenKind::RBracket) {
                    Type::Array(Box::new(base.clone()), None)
                } else if let TokenKind::IntLiteral(size) = self.peek().kind {
                    self.advance();
                    self.expect_kind(&TokenKind::RBracket, "expected ']' after array size")?;
                    Type::Array(Box::new(base.clone()), Some(size as usize))
                } else {
                    return Err(ParseError {
                        message: format!(
                            "array size must be an integer constant, found {}",
                            self.peek()
                        ),
                        location: self.current_location(),
                    });
                }
            } else {
                base.clone()
            };

            if base == Type::Void {
                self.diags
                    .report(DiagnosticKind::VoidType { name: name.clone() }, loc);
            } else if let Some(name) = name {
                let result = self.symbols.declare(Symbol {
                    name: name.clone(),
                    kind: SymbolKind::Parameter,
                    ty: ty.clone(),
                    defined: true,
                    location: loc,
                });
                match result {
                    Ok(()) => params.push(Param {
                        name,
                        ty,
                        location: loc,
                    }),
                    Err(conflict) => {
                        self.report_declare_conflict(&name, SymbolKind::Parameter, conflict, loc);
                    }
                }
            }

            if self.match_kind(&TokenKind::Comma) {
                continue;
            }
            self.expect_kind(&TokenKind::RParen, "expected ')' after parameters")?;
            return Ok(params);
        }
    }
}
