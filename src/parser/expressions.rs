//! Expression parsing implementation
//!
//! Precedence climbing through a cascade of methods, lowest precedence
//! first:
//!
//! ```text
//! assignment   ::= unary "=" assignment | logical_or      (right assoc)
//! logical_or   ::= logical_and ( "||" logical_and )*
//! logical_and  ::= bitwise_or ( "&&" bitwise_or )*
//! bitwise_or   ::= bitwise_xor ( "|" bitwise_xor )*
//! bitwise_xor  ::= bitwise_and ( "^" bitwise_and )*
//! bitwise_and  ::= equality ( "&" equality )*
//! equality     ::= relational ( ("==" | "!=") relational )*
//! relational   ::= shift ( ("<" | "<=" | ">" | ">=") shift )*
//! shift        ::= additive ( ("<<" | ">>") additive )*
//! additive     ::= multiplicative ( ("+" | "-") multiplicative )*
//! multiplicative ::= unary ( ("*" | "/" | "%") unary )*
//! unary        ::= ("-" | "!" | "~") unary | postfix
//! postfix      ::= primary ( "[" expr "]" | "(" args ")" )*
//! ```
//!
//! Error-marker tokens left behind by the lexer become error placeholder
//! nodes without a second report; the fault was already diagnosed.

use crate::lexer::TokenKind;
use crate::parser::ast::*;
use crate::parser::parse::{ParseError, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Right-associative assignment. The target is validated as an lvalue
    /// during analysis, not here.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_logical_or()?;

        if self.match_kind(&TokenKind::Eq) {
            let loc = self.previous_location();
            let value = self.parse_assignment()?;
            return Ok(self.new_expr(
                ExprKind::Assign {
                    target: Box::new(lhs),
                    value: Box::new(value),
                },
                loc,
            ));
        }

        Ok(lhs)
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_logical_and()?;
        while self.match_kind(&TokenKind::OrOr) {
            let loc = self.previous_location();
            let rhs = self.parse_logical_and()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op: BinOp::Or,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
        Ok(lhs)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_bitwise_or()?;
        while self.match_kind(&TokenKind::AndAnd) {
            let loc = self.previous_location();
            let rhs = self.parse_bitwise_or()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op: BinOp::And,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
        Ok(lhs)
    }

    fn parse_bitwise_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_bitwise_xor()?;
        while self.match_kind(&TokenKind::Pipe) {
            let loc = self.previous_location();
            let rhs = self.parse_bitwise_xor()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op: BinOp::BitOr,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
        Ok(lhs)
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_bitwise_and()?;
        while self.match_kind(&TokenKind::Caret) {
            let loc = self.previous_location();
            let rhs = self.parse_bitwise_and()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op: BinOp::BitXor,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
        Ok(lhs)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_equality()?;
        while self.match_kind(&TokenKind::Amp) {
            let loc = self.previous_location();
            let rhs = self.parse_equality()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op: BinOp::BitAnd,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.match_kind(&TokenKind::EqEq) {
                BinOp::Eq
            } else if self.match_kind(&TokenKind::NotEq) {
                BinOp::Ne
            } else {
                return Ok(lhs);
            };
            let loc = self.previous_location();
            let rhs = self.parse_relational()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_shift()?;
        loop {
            let op = if self.match_kind(&TokenKind::Lt) {
                BinOp::Lt
            } else if self.match_kind(&TokenKind::Le) {
                BinOp::Le
            } else if self.match_kind(&TokenKind::Gt) {
                BinOp::Gt
            } else if self.match_kind(&TokenKind::Ge) {
                BinOp::Ge
            } else {
                return Ok(lhs);
            };
            let loc = self.previous_location();
            let rhs = self.parse_shift()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = if self.match_kind(&TokenKind::Shl) {
                BinOp::Shl
            } else if self.match_kind(&TokenKind::Shr) {
                BinOp::Shr
            } else {
                return Ok(lhs);
            };
            let loc = self.previous_location();
            let rhs = self.parse_additive()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.match_kind(&TokenKind::Plus) {
                BinOp::Add
            } else if self.match_kind(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                return Ok(lhs);
            };
            let loc = self.previous_location();
            let rhs = self.parse_multiplicative()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.match_kind(&TokenKind::Star) {
                BinOp::Mul
            } else if self.match_kind(&TokenKind::Slash) {
                BinOp::Div
            } else if self.match_kind(&TokenKind::Percent) {
                BinOp::Mod
            } else {
                return Ok(lhs);
            };
            let loc = self.previous_location();
            let rhs = self.parse_unary()?;
            lhs = self.new_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                loc,
            );
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = if self.match_kind(&TokenKind::Minus) {
            UnOp::Neg
        } else if self.match_kind(&TokenKind::Bang) {
            UnOp::Not
        } else if self.match_kind(&TokenKind::Tilde) {
            UnOp::BitNot
        } else {
            return self.parse_postfix();
        };
        let loc = self.previous_location();
        let operand = self.parse_unary()?;
        Ok(self.new_expr(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            loc,
        ))
    }

    /// Indexing and calls bind tightest and chain left to right.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_kind(&TokenKind::LBracket) {
                let loc = self.previous_location();
                let index = self.parse_expression()?;
                self.expect_kind(&TokenKind::RBracket, "expected ']' after index")?;
                expr = self.new_expr(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    loc,
                );
            } else if self.check(&TokenKind::LParen) {
                // Calls apply to a bare function name only.
                let name = match &expr.kind {
                    ExprKind::Identifier(name) => name.clone(),
                    _ => {
                        return Err(ParseError {
                            message: "only a function name can be called".to_string(),
                            location: self.current_location(),
                        });
                    }
                };
                self.advance(); // '('
                let loc = expr.location;
                let args = self.parse_arguments()?;
                expr = self.new_expr(ExprKind::Call { name, args }, loc);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.match_kind(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if self.match_kind(&TokenKind::Comma) {
                continue;
            }
            self.expect_kind(&TokenKind::RParen, "expected ')' after arguments")?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek().kind.clone() {
            TokenKind::IntLiteral(n) => {
                self.advance();
                Ok(self.new_expr(ExprKind::IntLiteral(n), loc))
            }
            TokenKind::FloatLiteral(x) => {
                self.advance();
                Ok(self.new_expr(ExprKind::FloatLiteral(x), loc))
            }
            TokenKind::CharLiteral(c) => {
                self.advance();
                Ok(self.new_expr(ExprKind::CharLiteral(c), loc))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(self.new_expr(ExprKind::StringLiteral(s), loc))
            }
            TokenKind::Ident => {
                let name = self.advance().lexeme.clone();
                Ok(self.new_expr(ExprKind::Identifier(name), loc))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_kind(&TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            }
            // The lexer already reported this fault; swallow the marker and
            // leave a placeholder so checking skips the subtree.
            TokenKind::Error => {
                self.advance();
                Ok(self.new_expr(ExprKind::Error, loc))
            }
            _ => Err(ParseError {
                message: format!("expected expression, found {}", self.peek()),
                location: loc,
            }),
        }
    }
}
