//! End-to-end tests running the full analysis pipeline over source text.

use minic::diagnostics::{DiagnosticClass, DiagnosticKind};
use minic::semantic::scopes::{SymbolKind, GLOBAL_SCOPE};
use minic::semantic::types::Type;
use minic::{analyze, Analysis};

fn kinds(analysis: &Analysis) -> Vec<DiagnosticKind> {
    analysis.diagnostics.iter().map(|d| d.kind.clone()).collect()
}

#[test]
fn test_clean_program() {
    let analysis = analyze(
        "int max(int a, int b) {\n\
         \x20   int result;\n\
         \x20   result = a;\n\
         \x20   b > a && (result = b);\n\
         \x20   return result;\n\
         }\n",
    );
    assert!(analysis.diagnostics.is_empty(), "{:?}", kinds(&analysis));
    assert_eq!(analysis.error_count(), 0);

    let max = analysis.symbols.lookup_in(GLOBAL_SCOPE, "max").unwrap();
    assert_eq!(max.kind, SymbolKind::Function);
    assert!(max.defined);
    assert_eq!(
        max.ty,
        Type::Function {
            params: vec![Type::Int, Type::Int],
            ret: Box::new(Type::Int),
        }
    );
}

#[test]
fn test_variable_redefinition_keeps_first() {
    let analysis = analyze("int x;\nint x;\n");

    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::VariableRedefinition {
            name: "x".to_string()
        }]
    );
    // The first declaration survives in the table.
    let x = analysis.symbols.lookup_in(GLOBAL_SCOPE, "x").unwrap();
    assert_eq!(x.location.line, 1);
}

#[test]
fn test_mod_by_zero() {
    let analysis = analyze("int f(int a) { return a % 0; }\n");

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::ModByZero]);
    // The function itself still registered normally.
    let f = analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").unwrap();
    assert_eq!(f.kind, SymbolKind::Function);
}

#[test]
fn test_constant_index_out_of_bounds() {
    let analysis = analyze(
        "float arr[3];\n\
         float f(void) { return arr[3]; }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::IndexOutOfBounds { index: 3, size: 3 }]
    );
}

#[test]
fn test_negative_constant_index() {
    let analysis = analyze(
        "int arr[4];\n\
         int f(void) { return arr[1 - 2]; }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::IndexNegative { index: -1 }]
    );
}

#[test]
fn test_void_variable_rejected() {
    let analysis = analyze("void v;\n");

    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::VoidType {
            name: Some("v".to_string())
        }]
    );
    assert!(analysis.symbols.lookup_in(GLOBAL_SCOPE, "v").is_none());
}

#[test]
fn test_undeclared_variable_reported_once() {
    // The fault poisons the whole expression; only one report.
    let analysis = analyze("int f(void) { return (missing + 1) * 2; }\n");

    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::UndeclaredVariable {
            name: "missing".to_string()
        }]
    );
}

#[test]
fn test_prototype_completed_by_definition() {
    let analysis = analyze(
        "int twice(int n);\n\
         int f(void) { return twice(4); }\n\
         int twice(int n) { return n * 2; }\n",
    );
    assert!(analysis.diagnostics.is_empty(), "{:?}", kinds(&analysis));

    let twice = analysis.symbols.lookup_in(GLOBAL_SCOPE, "twice").unwrap();
    assert!(twice.defined);
}

#[test]
fn test_call_of_undefined_prototype() {
    let analysis = analyze(
        "int g(int a);\n\
         int f(void) { return g(1); }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::UndefinedFunction {
            name: "g".to_string()
        }]
    );
}

#[test]
fn test_argument_count_mismatch() {
    let analysis = analyze(
        "int add(int a, int b) { return a + b; }\n\
         int f(void) { return add(1) + add(1, 2, 3); }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![
            DiagnosticKind::TooFewArguments {
                name: "add".to_string(),
                expected: 2,
                found: 1,
            },
            DiagnosticKind::TooManyArguments {
                name: "add".to_string(),
                expected: 2,
                found: 3,
            },
        ]
    );
}

#[test]
fn test_function_used_as_variable() {
    let analysis = analyze(
        "int g(void) { return 1; }\n\
         int f(void) { return g + 1; }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::FuncAsVar {
            name: "g".to_string()
        }]
    );
}

#[test]
fn test_calling_a_variable() {
    let analysis = analyze(
        "int x;\n\
         int f(void) { return x(); }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::NotAFunction {
            name: "x".to_string()
        }]
    );
}

#[test]
fn test_bitwise_and_logical_on_float() {
    let analysis = analyze(
        "int f(float a) {\n\
         \x20   a & 1;\n\
         \x20   a || 0;\n\
         \x20   return 0;\n\
         }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::BitwiseFloat, DiagnosticKind::LogicalFloat]
    );
}

#[test]
fn test_mod_on_float_operand() {
    let analysis = analyze("int f(float a) { return a % 2; }\n");
    assert_eq!(kinds(&analysis), vec![DiagnosticKind::ModOperand]);
}

#[test]
fn test_float_to_int_is_a_warning_not_an_error() {
    let analysis = analyze(
        "int f(void) {\n\
         \x20   int x;\n\
         \x20   x = 2.5;\n\
         \x20   return x;\n\
         }\n",
    );
    assert_eq!(kinds(&analysis), vec![DiagnosticKind::FloatToInt]);
    assert_eq!(analysis.error_count(), 0);
    assert_eq!(analysis.diagnostics.warning_count(), 1);
}

#[test]
fn test_use_before_later_shadowing_declaration() {
    // The assignment on line 3 predates the inner float x, so it targets
    // the global int and neither line warns.
    let analysis = analyze(
        "int x;\n\
         int f(void) {\n\
         \x20   x = 5;\n\
         \x20   float x;\n\
         \x20   x = 2.5;\n\
         \x20   return 0;\n\
         }\n",
    );
    assert!(analysis.diagnostics.is_empty(), "{:?}", kinds(&analysis));
}

#[test]
fn test_unsized_array_parameter() {
    let analysis = analyze(
        "int sum(int values[], int n) { return values[0] * n; }\n\
         int data[8];\n\
         int f(void) { return sum(data, 8); }\n",
    );
    assert!(analysis.diagnostics.is_empty(), "{:?}", kinds(&analysis));
}

#[test]
fn test_parameter_redefinition() {
    let analysis = analyze("int f(int a, int a) { return 0; }\n");
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::ParamRedefinition {
            name: "a".to_string()
        }]
    );
}

#[test]
fn test_redeclared_as_different_kind() {
    let analysis = analyze(
        "int x;\n\
         float x(void) { return 1.0; }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::DifferentRedeclaration {
            name: "x".to_string()
        }]
    );
}

#[test]
fn test_float_division_by_constant_zero() {
    let analysis = analyze("float f(float a) { return a / 0.0; }\n");
    assert_eq!(kinds(&analysis), vec![DiagnosticKind::DivByZero]);
}

#[test]
fn test_float_division_by_folded_zero() {
    let analysis = analyze("float f(float a) { return a / (0.5 - 0.5); }\n");
    assert_eq!(kinds(&analysis), vec![DiagnosticKind::DivByZero]);
}

#[test]
fn test_array_used_as_scalar_value() {
    let analysis = analyze(
        "int arr[3];\n\
         int f(void) { return arr + 1; }\n",
    );
    assert_eq!(
        kinds(&analysis),
        vec![DiagnosticKind::ArrayAsVar {
            name: "arr".to_string()
        }]
    );
}

#[test]
fn test_syntax_reported_before_parse_time_semantic() {
    // The redefinition on line 2 is found while parsing, but the syntax
    // fault on line 3 still comes first in the finished sequence.
    let analysis = analyze("int x;\nint x;\nint 5;\n");

    let order: Vec<(DiagnosticClass, usize)> = analysis
        .diagnostics
        .iter()
        .map(|d| (d.class(), d.location.line))
        .collect();
    assert_eq!(
        order,
        vec![(DiagnosticClass::Syntax, 3), (DiagnosticClass::Semantic, 2)]
    );
}

#[test]
fn test_semantic_diagnostics_sorted_by_line_across_passes() {
    // Undeclared y (line 1) is found by the checker, the redefinition
    // (line 3) earlier by the parser; the output is still in line order.
    let analysis = analyze("int f(void) { return y; }\nint x;\nint x;\n");

    let lines: Vec<usize> = analysis.diagnostics.iter().map(|d| d.location.line).collect();
    assert_eq!(lines, vec![1, 3]);
    assert!(analysis
        .diagnostics
        .iter()
        .all(|d| d.class() == DiagnosticClass::Semantic));
}

#[test]
fn test_diagnostics_are_in_source_order() {
    let analysis = analyze(
        "int x;\n\
         int x;\n\
         int f(void) { return y; }\n",
    );
    let lines: Vec<usize> = analysis.diagnostics.iter().map(|d| d.location.line).collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(
        analysis.diagnostics.iter().next().unwrap().class(),
        DiagnosticClass::Semantic
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let source = "int x;\nint x;\nint f(void) { return z % 0; }\n";
    let first = analyze(source);
    let second = analyze(source);
    assert_eq!(kinds(&first), kinds(&second));
}
