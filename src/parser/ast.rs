//! AST (Abstract Syntax Tree) definitions for the analyzer
//!
//! Each node owns its children exclusively (tree, no cycles) and carries
//! the source location it came from. Expressions additionally carry a
//! [`NodeId`] so the type checker can record one resolved type per node in
//! a side table without mutating the tree.

use crate::diagnostics::SourceLocation;
use crate::semantic::scopes::ScopeId;
use crate::semantic::types::Type;

/// Unique identifier for expression nodes, assigned by the parser.
pub type NodeId = usize;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
}

/// An expression node: id for the type side table, location for
/// diagnostics, and the node kind with its children.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub location: SourceLocation,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    CharLiteral(char),
    StringLiteral(String),
    Identifier(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// Placeholder left behind by syntax recovery
    Error,
}

/// Function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub location: SourceLocation,
}

/// A braced block with its own scope.
#[derive(Debug, Clone)]
pub struct Block {
    pub scope: ScopeId,
    pub stmts: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Local variable declaration, already registered in its scope.
    VarDecl {
        name: String,
        declared: Type,
        location: SourceLocation,
    },
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Block(Block),
    /// Placeholder left behind by syntax recovery
    Error { location: SourceLocation },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::VarDecl { location, .. } => *location,
            Stmt::Expr { location, .. } => *location,
            Stmt::Return { location, .. } => *location,
            Stmt::Block(block) => block.location,
            Stmt::Error { location } => *location,
        }
    }
}

/// Function definition or prototype (`body` is `None` for prototypes).
/// `scope` holds the parameters and the body's outermost locals.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Option<Block>,
    pub scope: ScopeId,
    pub location: SourceLocation,
}

/// Top-level item
#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    /// Global variable declaration
    Var {
        name: String,
        declared: Type,
        location: SourceLocation,
    },
    /// Placeholder left behind by syntax recovery
    Error { location: SourceLocation },
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
