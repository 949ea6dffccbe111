//! Diagnostic records and the append-only diagnostic sink
//!
//! Every fault found during analysis becomes a [`Diagnostic`]: a closed
//! [`DiagnosticKind`] with structured payload plus the source location where
//! the fault was detected. Message text is rendered at the boundary (the
//! `Display` impls), never stored inside the record.
//!
//! Diagnostics never halt analysis. The [`Diagnostics`] sink appends
//! during the run and is ordered once at the end by phase and source line
//! ([`Diagnostics::finalize`]); the aggregate error count (warnings
//! excluded) is the overall success/failure signal exposed to the host.

use crate::semantic::types::Type;
use std::fmt;

/// Source location information for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The four diagnostic classes. Only the first three count as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticClass {
    Lexical,
    Syntax,
    Semantic,
    Warning,
}

impl DiagnosticClass {
    /// Pipeline phase this class is reported from, for ordering.
    /// Warnings come out of the checker alongside semantic records.
    fn phase(self) -> u8 {
        match self {
            DiagnosticClass::Lexical => 0,
            DiagnosticClass::Syntax => 1,
            DiagnosticClass::Semantic | DiagnosticClass::Warning => 2,
        }
    }
}

impl fmt::Display for DiagnosticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticClass::Lexical => write!(f, "lexical error"),
            DiagnosticClass::Syntax => write!(f, "syntax error"),
            DiagnosticClass::Semantic => write!(f, "semantic error"),
            DiagnosticClass::Warning => write!(f, "warning"),
        }
    }
}

/// Every fault the analyzer can report, with its structured payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    // Lexical
    /// Character literal with more than one character
    MultiCharLiteral,
    /// Character literal with no characters: ''
    EmptyCharLiteral,
    /// Character literal not closed before end of line or file
    UnfinishedCharLiteral,
    /// A character that cannot start any token
    UnrecognizedCharacter(char),
    /// Numeric literal with a second decimal point
    TooManyDecimalPoints { lexeme: String },
    /// Digit sequence that parses as no numeric form
    IllFormedNumber { lexeme: String },
    /// Identifier characters glued onto a numeric literal
    InvalidNumericSuffix { lexeme: String },
    /// String literal not closed before end of line or file
    UnfinishedString,
    /// Block comment not closed before end of file
    UnfinishedComment,

    // Syntax
    /// Malformed parameter list inside a function header
    MalformedParameterList { detail: String },
    /// Declaration statement matching no recognized declaration shape
    MalformedDeclaration { detail: String },
    /// Unrecognized top-level construct
    MalformedTopLevel { detail: String },
    /// Standalone expression statement matching no recognized shape
    MalformedExprStatement { detail: String },
    /// Function parameter without a name
    NamelessParameter,
    /// `void` used as a variable or parameter type
    VoidType { name: Option<String> },

    // Semantic
    ParamRedefinition { name: String },
    FuncRedefinition { name: String },
    VariableRedefinition { name: String },
    /// Redeclared in the same scope as a different kind or type
    DifferentRedeclaration { name: String },
    /// Argument, parameter, or return type mismatch
    ConflictingType { expected: Type, found: Type },
    UndeclaredVariable { name: String },
    UndeclaredFunction { name: String },
    /// Call target exists but is not a function
    NotAFunction { name: String },
    /// Function declared (prototype) but called without a definition
    UndefinedFunction { name: String },
    TooManyArguments { name: String, expected: usize, found: usize },
    TooFewArguments { name: String, expected: usize, found: usize },
    /// Array-vs-scalar mismatch: a non-array name indexed like an array,
    /// or an array name used as a scalar value
    ArrayAsVar { name: String },
    /// Function name used where a variable is expected
    FuncAsVar { name: String },
    /// Index applied to an expression that cannot be an array
    ErrorAsArray,
    IndexNotInt,
    IndexNegative { index: i64 },
    IndexOutOfBounds { index: i64, size: usize },
    /// A void-typed expression used in a value context
    VoidUsage,
    /// `%` applied to a float operand
    ModOperand,
    ModByZero,
    DivByZero,
    BitwiseFloat,
    LogicalFloat,
    /// Expression whose type could not be determined
    TypeError,

    // Warning
    /// Implicit narrowing of a float value into an int destination
    FloatToInt,
}

impl DiagnosticKind {
    /// The class this kind belongs to.
    pub fn class(&self) -> DiagnosticClass {
        use DiagnosticKind::*;
        match self {
            MultiCharLiteral
            | EmptyCharLiteral
            | UnfinishedCharLiteral
            | UnrecognizedCharacter(_)
            | TooManyDecimalPoints { .. }
            | IllFormedNumber { .. }
            | InvalidNumericSuffix { .. }
            | UnfinishedString
            | UnfinishedComment => DiagnosticClass::Lexical,

            MalformedParameterList { .. }
            | MalformedDeclaration { .. }
            | MalformedTopLevel { .. }
            | MalformedExprStatement { .. }
            | NamelessParameter
            | VoidType { .. } => DiagnosticClass::Syntax,

            FloatToInt => DiagnosticClass::Warning,

            _ => DiagnosticClass::Semantic,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DiagnosticKind::*;
        match self {
            MultiCharLiteral => {
                write!(f, "character literal contains more than one character")
            }
            EmptyCharLiteral => write!(f, "empty character literal"),
            UnfinishedCharLiteral => write!(f, "unterminated character literal"),
            UnrecognizedCharacter(c) => {
                write!(f, "unrecognized character '{}'", c.escape_default())
            }
            TooManyDecimalPoints { lexeme } => {
                write!(f, "too many decimal points in number '{}'", lexeme)
            }
            IllFormedNumber { lexeme } => {
                write!(f, "ill-formed number '{}'", lexeme)
            }
            InvalidNumericSuffix { lexeme } => {
                write!(f, "invalid suffix on number '{}'", lexeme)
            }
            UnfinishedString => write!(f, "unterminated string literal"),
            UnfinishedComment => write!(f, "unterminated block comment"),

            MalformedParameterList { detail } => {
                write!(f, "malformed parameter list: {}", detail)
            }
            MalformedDeclaration { detail } => {
                write!(f, "malformed declaration: {}", detail)
            }
            MalformedTopLevel { detail } => {
                write!(f, "unrecognized top-level construct: {}", detail)
            }
            MalformedExprStatement { detail } => {
                write!(f, "malformed expression statement: {}", detail)
            }
            NamelessParameter => write!(f, "parameter is missing a name"),
            VoidType { name: Some(name) } => {
                write!(f, "variable '{}' declared void", name)
            }
            VoidType { name: None } => {
                write!(f, "'void' is not a valid variable type")
            }

            ParamRedefinition { name } => {
                write!(f, "redefinition of parameter '{}'", name)
            }
            FuncRedefinition { name } => {
                write!(f, "redefinition of function '{}'", name)
            }
            VariableRedefinition { name } => {
                write!(f, "redefinition of variable '{}'", name)
            }
            DifferentRedeclaration { name } => {
                write!(f, "'{}' redeclared as a different kind or type", name)
            }
            ConflictingType { expected, found } => {
                write!(f, "conflicting types: expected {}, found {}", expected, found)
            }
            UndeclaredVariable { name } => {
                write!(f, "undeclared variable '{}'", name)
            }
            UndeclaredFunction { name } => {
                write!(f, "undeclared function '{}'", name)
            }
            NotAFunction { name } => write!(f, "'{}' is not a function", name),
            UndefinedFunction { name } => {
                write!(f, "function '{}' is declared but never defined", name)
            }
            TooManyArguments {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "too many arguments to '{}': expected {}, got {}",
                    name, expected, found
                )
            }
            TooFewArguments {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "too few arguments to '{}': expected {}, got {}",
                    name, expected, found
                )
            }
            ArrayAsVar { name } => {
                write!(f, "array/scalar mismatch in use of '{}'", name)
            }
            FuncAsVar { name } => {
                write!(f, "function '{}' used as a variable", name)
            }
            ErrorAsArray => {
                write!(f, "indexed expression cannot be an array")
            }
            IndexNotInt => write!(f, "array index is not an integer"),
            IndexNegative { index } => {
                write!(f, "array index is negative ({})", index)
            }
            IndexOutOfBounds { index, size } => {
                write!(
                    f,
                    "array index {} out of bounds for array of size {}",
                    index, size
                )
            }
            VoidUsage => write!(f, "void value used in an expression"),
            ModOperand => write!(f, "'%' applied to a float operand"),
            ModByZero => write!(f, "modulo by zero"),
            DivByZero => write!(f, "division by zero"),
            BitwiseFloat => {
                write!(f, "bitwise operator applied to a float operand")
            }
            LogicalFloat => {
                write!(f, "logical operator applied to a float operand")
            }
            TypeError => write!(f, "expression has no determinable type"),

            FloatToInt => write!(f, "implicit conversion from float to int"),
        }
    }
}

/// One recorded compiler message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn class(&self) -> DiagnosticClass {
        self.kind.class()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}: {}",
            self.class(),
            self.location.line,
            self.kind
        )
    }
}

/// Append-only sink for all diagnostics produced by one analysis run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Never fails and never halts analysis.
    pub fn report(&mut self, kind: DiagnosticKind, location: SourceLocation) {
        self.records.push(Diagnostic { kind, location });
    }

    /// Order the records by phase (lexical, then syntax, then semantic)
    /// and by source line within each phase. Declarations register during
    /// parsing, so their conflicts arrive interleaved with syntax records
    /// and ahead of checker records from earlier lines; one stable sort at
    /// the end of the run restores the guaranteed order.
    pub fn finalize(&mut self) {
        self.records
            .sort_by_key(|d| (d.class().phase(), d.location.line));
    }

    /// Number of recorded errors. Warnings are excluded: a run with only
    /// warnings is a successful run.
    pub fn error_count(&self) -> usize {
        self.records
            .iter()
            .filter(|d| d.class() != DiagnosticClass::Warning)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.records.len() - self.error_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut diags = Diagnostics::new();
        diags.report(DiagnosticKind::FloatToInt, SourceLocation::new(3, 1));
        diags.report(DiagnosticKind::DivByZero, SourceLocation::new(4, 1));

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
    }

    #[test]
    fn test_finalize_orders_by_phase_then_line() {
        let mut diags = Diagnostics::new();
        diags.report(
            DiagnosticKind::VariableRedefinition {
                name: "x".to_string(),
            },
            SourceLocation::new(2, 1),
        );
        diags.report(
            DiagnosticKind::MalformedDeclaration {
                detail: "bad".to_string(),
            },
            SourceLocation::new(3, 1),
        );
        diags.report(DiagnosticKind::UnfinishedString, SourceLocation::new(5, 1));
        diags.report(
            DiagnosticKind::UndeclaredVariable {
                name: "y".to_string(),
            },
            SourceLocation::new(1, 1),
        );

        diags.finalize();
        let order: Vec<(DiagnosticClass, usize)> = diags
            .iter()
            .map(|d| (d.class(), d.location.line))
            .collect();
        assert_eq!(
            order,
            vec![
                (DiagnosticClass::Lexical, 5),
                (DiagnosticClass::Syntax, 3),
                (DiagnosticClass::Semantic, 1),
                (DiagnosticClass::Semantic, 2),
            ]
        );
    }

    #[test]
    fn test_kind_classes() {
        assert_eq!(
            DiagnosticKind::MultiCharLiteral.class(),
            DiagnosticClass::Lexical
        );
        assert_eq!(
            DiagnosticKind::NamelessParameter.class(),
            DiagnosticClass::Syntax
        );
        assert_eq!(DiagnosticKind::ModByZero.class(), DiagnosticClass::Semantic);
        assert_eq!(DiagnosticKind::FloatToInt.class(), DiagnosticClass::Warning);
    }

    #[test]
    fn test_display_includes_line() {
        let diag = Diagnostic {
            kind: DiagnosticKind::UndeclaredVariable {
                name: "x".to_string(),
            },
            location: SourceLocation::new(7, 5),
        };
        let rendered = diag.to_string();
        assert!(rendered.contains("line 7"));
        assert!(rendered.contains("undeclared variable 'x'"));
        assert!(rendered.starts_with("semantic error"));
    }
}
