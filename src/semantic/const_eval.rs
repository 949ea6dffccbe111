//! Compile-time folding of integer constant expressions
//!
//! Used to catch constant division or modulo by zero and constant array
//! indexes that fall outside the declared bounds. Anything that is not a
//! closed integer expression folds to `None` and is left for runtime.
//! Arithmetic wraps on overflow, matching two's-complement evaluation.

use crate::parser::ast::{BinOp, Expr, ExprKind, UnOp};

/// Fold an expression to an integer constant, if it is one.
pub(crate) fn eval_const_int(expr: &Expr) -> Option<i64> {
    match &expr.kind {
        ExprKind::IntLiteral(n) => Some(*n),
        ExprKind::CharLiteral(c) => Some(*c as i64),
        ExprKind::Unary { op, operand } => {
            let value = eval_const_int(operand)?;
            Some(match op {
                UnOp::Neg => value.wrapping_neg(),
                UnOp::Not => (value == 0) as i64,
                UnOp::BitNot => !value,
            })
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval_const_int(lhs)?;
            let r = eval_const_int(rhs)?;
            Some(match op {
                BinOp::Add => l.wrapping_add(r),
                BinOp::Sub => l.wrapping_sub(r),
                BinOp::Mul => l.wrapping_mul(r),
                // Folding stops at a zero divisor; the checker reports it.
                BinOp::Div => {
                    if r == 0 {
                        return None;
                    }
                    l.wrapping_div(r)
                }
                BinOp::Mod => {
                    if r == 0 {
                        return None;
                    }
                    l.wrapping_rem(r)
                }
                BinOp::BitAnd => l & r,
                BinOp::BitOr => l | r,
                BinOp::BitXor => l ^ r,
                BinOp::Shl => l.wrapping_shl(r as u32),
                BinOp::Shr => l.wrapping_shr(r as u32),
                BinOp::Eq => (l == r) as i64,
                BinOp::Ne => (l != r) as i64,
                BinOp::Lt => (l < r) as i64,
                BinOp::Le => (l <= r) as i64,
                BinOp::Gt => (l > r) as i64,
                BinOp::Ge => (l >= r) as i64,
                BinOp::And => (l != 0 && r != 0) as i64,
                BinOp::Or => (l != 0 || r != 0) as i64,
            })
        }
        _ => None,
    }
}

/// Fold an expression to a float constant, if it is one. Only the
/// arithmetic forms a constant divisor can take are folded; like the
/// integer fold, a zero divisor inside the expression stops the fold.
pub(crate) fn eval_const_float(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::IntLiteral(n) => Some(*n as f64),
        ExprKind::FloatLiteral(x) => Some(*x),
        ExprKind::CharLiteral(c) => Some(*c as i64 as f64),
        ExprKind::Unary {
            op: UnOp::Neg,
            operand,
        } => Some(-eval_const_float(operand)?),
        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval_const_float(lhs)?;
            let r = eval_const_float(rhs)?;
            match op {
                BinOp::Add => Some(l + r),
                BinOp::Sub => Some(l - r),
                BinOp::Mul => Some(l * r),
                BinOp::Div => {
                    if r == 0.0 {
                        return None;
                    }
                    Some(l / r)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SourceLocation;

    fn expr(kind: ExprKind) -> Expr {
        Expr {
            id: 0,
            location: SourceLocation::new(1, 1),
            kind,
        }
    }

    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        expr(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    #[test]
    fn test_folds_arithmetic() {
        let e = binary(
            BinOp::Add,
            expr(ExprKind::IntLiteral(2)),
            binary(
                BinOp::Mul,
                expr(ExprKind::IntLiteral(3)),
                expr(ExprKind::IntLiteral(4)),
            ),
        );
        assert_eq!(eval_const_int(&e), Some(14));
    }

    #[test]
    fn test_unary_minus() {
        let e = expr(ExprKind::Unary {
            op: UnOp::Neg,
            operand: Box::new(expr(ExprKind::IntLiteral(5))),
        });
        assert_eq!(eval_const_int(&e), Some(-5));
    }

    #[test]
    fn test_zero_divisor_does_not_fold() {
        let e = binary(
            BinOp::Div,
            expr(ExprKind::IntLiteral(1)),
            expr(ExprKind::IntLiteral(0)),
        );
        assert_eq!(eval_const_int(&e), None);
    }

    #[test]
    fn test_overflow_wraps() {
        let e = binary(
            BinOp::Add,
            expr(ExprKind::IntLiteral(i64::MAX)),
            expr(ExprKind::IntLiteral(1)),
        );
        assert_eq!(eval_const_int(&e), Some(i64::MIN));
    }

    #[test]
    fn test_folds_float_constants() {
        let e = binary(
            BinOp::Sub,
            expr(ExprKind::FloatLiteral(0.5)),
            expr(ExprKind::FloatLiteral(0.5)),
        );
        assert_eq!(eval_const_float(&e), Some(0.0));
        assert_eq!(
            eval_const_float(&expr(ExprKind::FloatLiteral(2.5))),
            Some(2.5)
        );
        assert_eq!(eval_const_float(&expr(ExprKind::IntLiteral(3))), Some(3.0));
    }

    #[test]
    fn test_non_constant_is_none() {
        let e = binary(
            BinOp::Add,
            expr(ExprKind::IntLiteral(1)),
            expr(ExprKind::Identifier("x".to_string())),
        );
        assert_eq!(eval_const_int(&e), None);
    }
}
