//! Resolved type tags assigned to expressions during analysis

use std::fmt;

/// The type assigned to every expression after analysis.
///
/// `Error` is contagious: an expression built from an `Error`-typed operand
/// is itself `Error`-typed, and no further diagnostics are reported for
/// that subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Void,
    /// Element type and declared size (`None` for unsized parameter arrays,
    /// whose bounds cannot be checked)
    Array(Box<Type>, Option<usize>),
    /// Ordered parameter types and return type
    Function { params: Vec<Type>, ret: Box<Type> },
    Error,
}

impl Type {
    /// Int or Float. Arrays, functions, and void are not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// The result type of an arithmetic operation on two numeric operands:
    /// INT only when both sides are INT, FLOAT as soon as either is.
    pub fn arithmetic_result(&self, other: &Type) -> Type {
        if *self == Type::Float || *other == Type::Float {
            Type::Float
        } else {
            Type::Int
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Void => write!(f, "void"),
            Type::Array(elem, Some(size)) => write!(f, "{}[{}]", elem, size),
            Type::Array(elem, None) => write!(f, "{}[]", elem),
            Type::Function { params, ret } => {
                write!(f, "{}(", ret)?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")")
            }
            Type::Error => write!(f, "<error>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_result() {
        assert_eq!(Type::Int.arithmetic_result(&Type::Int), Type::Int);
        assert_eq!(Type::Int.arithmetic_result(&Type::Float), Type::Float);
        assert_eq!(Type::Float.arithmetic_result(&Type::Int), Type::Float);
        assert_eq!(Type::Float.arithmetic_result(&Type::Float), Type::Float);
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(
            Type::Array(Box::new(Type::Float), Some(3)).to_string(),
            "float[3]"
        );
        assert_eq!(Type::Array(Box::new(Type::Int), None).to_string(), "int[]");
        assert_eq!(
            Type::Function {
                params: vec![Type::Int, Type::Float],
                ret: Box::new(Type::Void),
            }
            .to_string(),
            "void(int, float)"
        );
    }
}
