//! Expression type checking implementation
//!
//! Every expression resolves to exactly one [`Type`], recorded in the
//! analyzer's side table. Name resolution uses the use site's location so
//! a declaration later in the same scope does not capture an earlier use.
//!
//! The error type is contagious and silent: once an operand has resolved
//! to `Error` the enclosing expression is `Error` too, with no further
//! report, so one source mistake produces one diagnostic.

use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::*;
use crate::semantic::const_eval::{eval_const_float, eval_const_int};
use crate::semantic::scopes::SymbolKind;
use crate::semantic::types::Type;
use crate::semantic::Analyzer;

/// How a value fits a typed destination (argument slot, assignment target,
/// or return slot).
enum Fit {
    Exact,
    /// Float into an int destination: legal, but warned about.
    Narrowing,
    Mismatch,
}

/// Whether `found` can flow into a destination of type `expected`.
fn fit(expected: &Type, found: &Type) -> Fit {
    match (expected, found) {
        _ if expected == found => Fit::Exact,
        (Type::Float, Type::Int) => Fit::Exact,
        (Type::Int, Type::Float) => Fit::Narrowing,
        // Unsized array parameters accept any array of the same element type.
        (Type::Array(e, None), Type::Array(f, _)) if e == f => Fit::Exact,
        _ => Fit::Mismatch,
    }
}

impl Analyzer<'_> {
    /// Resolve the type of an expression, recording it in the side table.
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> Type {
        let ty = self.expr_type(expr);
        self.types.insert(expr.id, ty.clone());
        ty
    }

    fn expr_type(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Type::Int,
            ExprKind::FloatLiteral(_) => Type::Float,
            // Character and string literals are integer values.
            ExprKind::CharLiteral(_) => Type::Int,
            ExprKind::StringLiteral(_) => Type::Int,
            ExprKind::Identifier(name) => self.check_identifier(name, expr),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, expr),
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand, expr),
            ExprKind::Assign { target, value } => self.check_assign(target, value),
            ExprKind::Call { name, args } => self.check_call(name, args, expr),
            ExprKind::Index { base, index } => self.check_index(base, index),
            ExprKind::Error => Type::Error,
        }
    }

    fn check_identifier(&mut self, name: &str, expr: &Expr) -> Type {
        let Some(symbol) = self.symbols.lookup_before(self.scope, name, expr.location) else {
            self.diags.report(
                DiagnosticKind::UndeclaredVariable {
                    name: name.to_string(),
                },
                expr.location,
            );
            return Type::Error;
        };

        if symbol.kind == SymbolKind::Function {
            self.diags.report(
                DiagnosticKind::FuncAsVar {
                    name: name.to_string(),
                },
                expr.location,
            );
            return Type::Error;
        }

        symbol.ty.clone()
    }

    /// Check that an operand is int or float, reporting the precise fault
    /// when it is not: void in value position, an array name used as a
    /// scalar, or a type no earlier fault can explain.
    fn require_numeric(&mut self, ty: &Type, operand: &Expr) -> bool {
        if ty.is_numeric() {
            return true;
        }
        let kind = match (ty, &operand.kind) {
            (Type::Void, _) => DiagnosticKind::VoidUsage,
            (Type::Array(_, _), ExprKind::Identifier(name)) => DiagnosticKind::ArrayAsVar {
                name: name.clone(),
            },
            _ => DiagnosticKind::TypeError,
        };
        self.diags.report(kind, operand.location);
        false
    }

    fn check_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> Type {
        let lt = self.check_expr(lhs);
        let rt = self.check_expr(rhs);
        if lt.is_error() || rt.is_error() {
            return Type::Error;
        }

        let lhs_ok = self.require_numeric(&lt, lhs);
        let rhs_ok = self.require_numeric(&rt, rhs);
        if !lhs_ok || !rhs_ok {
            return Type::Error;
        }

        if op.is_bitwise() {
            if lt == Type::Float || rt == Type::Float {
                self.diags
                    .report(DiagnosticKind::BitwiseFloat, expr.location);
                return Type::Error;
            }
            return Type::Int;
        }

        if op.is_logical() {
            if lt == Type::Float || rt == Type::Float {
                self.diags
                    .report(DiagnosticKind::LogicalFloat, expr.location);
                return Type::Error;
            }
            return Type::Int;
        }

        if op.is_comparison() {
            return Type::Int;
        }

        // Arithmetic
        if op == BinOp::Mod {
            if lt == Type::Float || rt == Type::Float {
                self.diags.report(DiagnosticKind::ModOperand, expr.location);
                return Type::Error;
            }
            if eval_const_int(rhs) == Some(0) {
                self.diags.report(DiagnosticKind::ModByZero, rhs.location);
                return Type::Error;
            }
            return Type::Int;
        }
        if op == BinOp::Div {
            let zero_divisor = match rt {
                Type::Int => eval_const_int(rhs) == Some(0),
                Type::Float => eval_const_float(rhs) == Some(0.0),
                _ => false,
            };
            if zero_divisor {
                self.diags.report(DiagnosticKind::DivByZero, rhs.location);
                return Type::Error;
            }
        }

        lt.arithmetic_result(&rt)
    }

    fn check_unary(&mut self, op: UnOp, operand: &Expr, expr: &Expr) -> Type {
        let ty = self.check_expr(operand);
        if ty.is_error() {
            return Type::Error;
        }
        if !self.require_numeric(&ty, operand) {
            return Type::Error;
        }

        match op {
            UnOp::Neg => ty,
            UnOp::Not => {
                if ty == Type::Float {
                    self.diags
                        .report(DiagnosticKind::LogicalFloat, expr.location);
                    return Type::Error;
                }
                Type::Int
            }
            UnOp::BitNot => {
                if ty == Type::Float {
                    self.diags
                        .report(DiagnosticKind::BitwiseFloat, expr.location);
                    return Type::Error;
                }
                Type::Int
            }
        }
    }

    fn check_assign(&mut self, target: &Expr, value: &Expr) -> Type {
        let tt = self.check_expr(target);
        let vt = self.check_expr(value);

        if !matches!(target.kind, ExprKind::Identifier(_) | ExprKind::Index { .. }) {
            self.diags
                .report(DiagnosticKind::TypeError, target.location);
            return Type::Error;
        }
        if tt.is_error() || vt.is_error() {
            return Type::Error;
        }
        if vt == Type::Void {
            self.diags.report(DiagnosticKind::VoidUsage, value.location);
            return Type::Error;
        }

        match fit(&tt, &vt) {
            Fit::Exact => tt,
            Fit::Narrowing => {
                self.diags
                    .report(DiagnosticKind::FloatToInt, value.location);
                tt
            }
            Fit::Mismatch => {
                self.diags.report(
                    DiagnosticKind::ConflictingType {
                        expected: tt,
                        found: vt,
                    },
                    value.location,
                );
                Type::Error
            }
        }
    }

    fn check_call(&mut self, name: &str, args: &[Expr], expr: &Expr) -> Type {
        // Argument expressions are checked even when the call itself is
        // unresolvable, so their own faults still surface.
        let arg_types: Vec<Type> = args.iter().map(|a| self.check_expr(a)).collect();

        let Some(symbol) = self.symbols.lookup_before(self.scope, name, expr.location) else {
            self.diags.report(
                DiagnosticKind::UndeclaredFunction {
                    name: name.to_string(),
                },
                expr.location,
            );
            return Type::Error;
        };

        if symbol.kind != SymbolKind::Function {
            self.diags.report(
                DiagnosticKind::NotAFunction {
                    name: name.to_string(),
                },
                expr.location,
            );
            return Type::Error;
        }

        let Type::Function { params, ret } = symbol.ty.clone() else {
            return Type::Error;
        };

        if !symbol.defined {
            self.diags.report(
                DiagnosticKind::UndefinedFunction {
                    name: name.to_string(),
                },
                expr.location,
            );
        }

        if arg_types.len() > params.len() {
            self.diags.report(
                DiagnosticKind::TooManyArguments {
                    name: name.to_string(),
                    expected: params.len(),
                    found: arg_types.len(),
                },
                expr.location,
            );
        } else if arg_types.len() < params.len() {
            self.diags.report(
                DiagnosticKind::TooFewArguments {
                    name: name.to_string(),
                    expected: params.len(),
                    found: arg_types.len(),
                },
                expr.location,
            );
        }

        for ((param, arg_ty), arg) in params.iter().zip(&arg_types).zip(args) {
            if arg_ty.is_error() {
                continue;
            }
            match fit(param, arg_ty) {
                Fit::Exact => {}
                Fit::Narrowing => {
                    self.diags.report(DiagnosticKind::FloatToInt, arg.location);
                }
                Fit::Mismatch => {
                    self.diags.report(
                        DiagnosticKind::ConflictingType {
                            expected: param.clone(),
                            found: arg_ty.clone(),
                        },
                        arg.location,
                    );
                }
            }
        }

        *ret
    }

    fn check_index(&mut self, base: &Expr, index: &Expr) -> Type {
        let element = match &base.kind {
            ExprKind::Identifier(name) => {
                match self.symbols.lookup_before(self.scope, name, base.location) {
                    None => {
                        self.diags.report(
                            DiagnosticKind::UndeclaredVariable {
                                name: name.clone(),
                            },
                            base.location,
                        );
                        Type::Error
                    }
                    Some(symbol) => match &symbol.ty {
                        Type::Array(elem, _) => {
                            let elem = (**elem).clone();
                            self.types.insert(base.id, symbol.ty.clone());
                            elem
                        }
                        _ => {
                            self.diags.report(
                                DiagnosticKind::ArrayAsVar { name: name.clone() },
                                base.location,
                            );
                            Type::Error
                        }
                    },
                }
            }
            ExprKind::Error => Type::Error,
            // Arrays are one-dimensional; nothing else can be indexed.
            _ => {
                let base_ty = self.check_expr(base);
                if !base_ty.is_error() {
                    self.diags
                        .report(DiagnosticKind::ErrorAsArray, base.location);
                }
                Type::Error
            }
        };

        let index_ty = self.check_expr(index);
        if !index_ty.is_error() && index_ty != Type::Int {
            self.diags
                .report(DiagnosticKind::IndexNotInt, index.location);
            return Type::Error;
        }

        if element.is_error() {
            return Type::Error;
        }

        // Constant indexes are checked against the declared bounds.
        if let Some(value) = eval_const_int(index) {
            if value < 0 {
                self.diags.report(
                    DiagnosticKind::IndexNegative { index: value },
                    index.location,
                );
                return Type::Error;
            }
            if let ExprKind::Identifier(name) = &base.kind {
                if let Some(symbol) = self.symbols.lookup_before(self.scope, name, base.location) {
                    if let Type::Array(_, Some(size)) = &symbol.ty {
                        if value as usize >= *size {
                            self.diags.report(
                                DiagnosticKind::IndexOutOfBounds {
                                    index: value,
                                    size: *size,
                                },
                                index.location,
                            );
                            return Type::Error;
                        }
                    }
                }
            }
        }

        element
    }
}
