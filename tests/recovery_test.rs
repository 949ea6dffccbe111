//! Tests that analysis keeps going after lexical and syntactic faults.

use minic::diagnostics::{DiagnosticClass, DiagnosticKind};
use minic::semantic::scopes::GLOBAL_SCOPE;
use minic::{analyze, Analysis};

fn kinds(analysis: &Analysis) -> Vec<DiagnosticKind> {
    analysis.diagnostics.iter().map(|d| d.kind.clone()).collect()
}

#[test]
fn test_unrecognized_characters_are_skipped() {
    let analysis = analyze("@ $\nint f(void) { return 1; }\n");

    assert_eq!(
        kinds(&analysis),
        vec![
            DiagnosticKind::UnrecognizedCharacter('@'),
            DiagnosticKind::UnrecognizedCharacter('$'),
        ]
    );
    assert!(analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").is_some());
}

#[test]
fn test_unfinished_string_resumes_next_line() {
    let analysis = analyze(
        "int x;\n\
         int f(void) {\n\
         \x20   x = \"oops;\n\
         \x20   return 2;\n\
         }\n",
    );
    assert!(kinds(&analysis).contains(&DiagnosticKind::UnfinishedString));
    // The return on the following line still lexed and parsed.
    let f = analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").unwrap();
    assert!(f.defined);
}

#[test]
fn test_malformed_declaration_recovers_at_semicolon() {
    let analysis = analyze("int 42;\nint y;\n");

    assert!(matches!(
        kinds(&analysis).as_slice(),
        [DiagnosticKind::MalformedDeclaration { .. }]
    ));
    assert!(analysis.symbols.lookup_in(GLOBAL_SCOPE, "y").is_some());
}

#[test]
fn test_garbage_top_level_recovers_at_next_declaration() {
    let analysis = analyze(";;;\nint f(void) { return 1; }\n");

    assert!(kinds(&analysis)
        .iter()
        .all(|k| matches!(k, DiagnosticKind::MalformedTopLevel { .. })));
    assert!(!analysis.diagnostics.is_empty());
    assert!(analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").is_some());
}

#[test]
fn test_malformed_statement_keeps_rest_of_body() {
    let analysis = analyze(
        "int f(void) {\n\
         \x20   + ;\n\
         \x20   return undeclared;\n\
         }\n",
    );
    // One syntax fault for the bad statement, one semantic fault from the
    // statement after it. Recovery did not swallow the return.
    let classes: Vec<DiagnosticClass> =
        analysis.diagnostics.iter().map(|d| d.class()).collect();
    assert_eq!(
        classes,
        vec![DiagnosticClass::Syntax, DiagnosticClass::Semantic]
    );
}

#[test]
fn test_nameless_parameter_is_dropped() {
    let analysis = analyze("int f(int) { return 1; }\n");

    assert_eq!(kinds(&analysis), vec![DiagnosticKind::NamelessParameter]);
    // The parameter is dropped but the function still registers.
    let f = analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").unwrap();
    assert!(f.defined);
}

#[test]
fn test_malformed_parameter_list_skips_to_body() {
    let analysis = analyze("int f(int a, 7) { return 1; }\n");

    assert!(kinds(&analysis)
        .iter()
        .any(|k| matches!(k, DiagnosticKind::MalformedParameterList { .. })));
    assert!(analysis.symbols.lookup_in(GLOBAL_SCOPE, "f").is_some());
}

#[test]
fn test_lexical_error_token_poisons_silently() {
    // 12abc is one invalid-suffix fault; the parser swallows the marker
    // token without a second syntax report.
    let analysis = analyze("int f(void) { return 12abc; }\n");

    assert!(matches!(
        kinds(&analysis).as_slice(),
        [DiagnosticKind::InvalidNumericSuffix { .. }]
    ));
}

#[test]
fn test_unterminated_block_reports_eof() {
    let analysis = analyze("int f(void) { return 1;\n");

    assert!(kinds(&analysis)
        .iter()
        .any(|k| matches!(k, DiagnosticKind::MalformedTopLevel { .. })));
}
