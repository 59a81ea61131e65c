//! Binder integration tests.
//!
//! Each test parses a snippet, binds its top level, and checks the
//! produced diagnostics. The error-containment tests assert exact
//! diagnostic counts: one root cause must yield one diagnostic.

use coco_binder::{bind_function_body, bind_global_scope, BoundGlobalScope};
use coco_parser::parse;
use std::rc::Rc;

fn bind(text: &str) -> BoundGlobalScope {
    let tree = parse(text);
    assert!(
        tree.diagnostics().is_empty(),
        "unexpected syntax diagnostics for {text:?}: {:?}",
        tree.diagnostics()
    );
    bind_global_scope(None, &tree)
}

fn messages(text: &str) -> Vec<String> {
    bind(text)
        .diagnostics
        .iter()
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn test_well_typed_program_has_no_diagnostics() {
    let scope = bind("{ var a = 10 var b = a * 2 print(string(b)) }");
    assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);
}

#[test]
fn test_redeclaration_in_same_scope_reports_once() {
    let diagnostics = messages("{ var x = 1 var x = 2 }");
    assert_eq!(diagnostics, vec!["'x' is already declared.".to_string()]);
}

#[test]
fn test_redeclaration_span_is_second_declaration() {
    let text = "{ var x = 1 var x = 2 }";
    let scope = bind(text);
    assert_eq!(scope.diagnostics.len(), 1);
    let span = scope.diagnostics[0].span;
    // The second `x`.
    assert_eq!(&text[span.to_range()], "x");
    assert_eq!(span.start, text.rfind("x = 2").map(|i| i as u32).unwrap());
}

#[test]
fn test_shadowing_in_nested_scope_is_allowed() {
    let diagnostics = messages("{ var x = 1 { var x = 2 } }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_undefined_name_reports_once() {
    let diagnostics = messages("missing");
    assert_eq!(diagnostics, vec!["Variable 'missing' doesn't exist.".to_string()]);
}

#[test]
fn test_error_containment_in_larger_expression() {
    // The undefined name is the single root cause; the surrounding
    // binary expressions must not add operator diagnostics.
    let diagnostics = messages("1 + missing * 2");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert!(diagnostics[0].contains("'missing' doesn't exist"));
}

#[test]
fn test_undefined_operator_for_mixed_types() {
    let diagnostics = messages("true + 1");
    assert_eq!(
        diagnostics,
        vec!["Binary operator '+' is not defined for types 'bool' and 'int'.".to_string()]
    );
}

#[test]
fn test_assignment_to_read_only_variable() {
    let diagnostics = messages("{ let x = 1 x = 2 }");
    assert_eq!(
        diagnostics,
        vec!["Variable 'x' is read-only and cannot be assigned to.".to_string()]
    );
}

#[test]
fn test_assignment_type_mismatch_needs_explicit_conversion() {
    let diagnostics = messages("{ var x = 1 x = \"two\" }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Cannot convert type 'string' to 'int'"));
    assert!(diagnostics[0].contains("explicit conversion exists"));
}

#[test]
fn test_explicit_conversion_call_is_accepted() {
    let diagnostics = messages("{ var x = int(\"42\") var s = string(10) }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_break_outside_loop() {
    let diagnostics = messages("break");
    assert_eq!(
        diagnostics,
        vec!["The keyword 'break' can only be used inside of loops.".to_string()]
    );
}

#[test]
fn test_continue_outside_loop() {
    let diagnostics = messages("continue");
    assert_eq!(
        diagnostics,
        vec!["The keyword 'continue' can only be used inside of loops.".to_string()]
    );
}

#[test]
fn test_break_inside_loop_is_fine() {
    let diagnostics = messages("while true { break }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_return_outside_function() {
    let diagnostics = messages("return");
    assert_eq!(
        diagnostics,
        vec!["The 'return' keyword can only be used inside of functions.".to_string()]
    );
}

#[test]
fn test_wrong_argument_count() {
    let diagnostics = messages("print(\"a\", \"b\")");
    assert_eq!(
        diagnostics,
        vec!["Function 'print' requires 1 arguments but was given 2.".to_string()]
    );
}

#[test]
fn test_wrong_argument_count_still_binds_arguments() {
    let diagnostics = messages("print(missing, 2)");
    assert_eq!(
        diagnostics,
        vec![
            "Variable 'missing' doesn't exist.".to_string(),
            "Function 'print' requires 1 arguments but was given 2.".to_string(),
        ]
    );
}

#[test]
fn test_wrong_argument_type() {
    let diagnostics = messages("print(42)");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Parameter 'text' requires a value of type 'string'"));
}

#[test]
fn test_undefined_function() {
    let diagnostics = messages("frobnicate()");
    assert_eq!(
        diagnostics,
        vec!["Function 'frobnicate' doesn't exist.".to_string()]
    );
}

#[test]
fn test_void_call_has_no_value() {
    let diagnostics = messages("{ var x = print(\"hi\") }");
    assert_eq!(diagnostics, vec!["Expression must have a value.".to_string()]);
}

#[test]
fn test_duplicate_parameter_name() {
    let diagnostics = messages("function f(a: int, a: int) { }");
    assert_eq!(
        diagnostics,
        vec!["A parameter with the name 'a' already exists.".to_string()]
    );
}

#[test]
fn test_undefined_type_in_clause() {
    let diagnostics = messages("function f(a: quux) { }");
    assert_eq!(diagnostics, vec!["Type 'quux' doesn't exist.".to_string()]);
}

#[test]
fn test_for_variable_is_read_only_in_body() {
    let diagnostics = messages("for i = 1 to 10 { i = 0 }");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("'i' is read-only"));
}

#[test]
fn test_function_callable_before_declaration() {
    let diagnostics = messages("later() function later() { }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_function_body_binds_parameters() {
    let scope = Rc::new(bind("function double(n: int): int { return n * 2 }"));
    assert_eq!(scope.functions.len(), 1);
    let (body, diagnostics) = bind_function_body(&scope, &scope.functions[0]);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(matches!(body, coco_binder::BoundStatement::Block(_)));
}

#[test]
fn test_void_function_cannot_return_value() {
    let scope = Rc::new(bind("function shout() { return 1 }"));
    let (_, diagnostics) = bind_function_body(&scope, &scope.functions[0]);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .contains("does not return a value"));
}

#[test]
fn test_non_void_function_return_needs_expression() {
    let scope = Rc::new(bind("function f(): int {\n    return\n}"));
    let (_, diagnostics) = bind_function_body(&scope, &scope.functions[0]);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .contains("An expression of type 'int' is expected"));
}

#[test]
fn test_incremental_submission_sees_previous_variables() {
    let first = Rc::new(bind("var shared = 10"));
    let tree = parse("shared + 5");
    let second = bind_global_scope(Some(first), &tree);
    assert!(second.diagnostics.is_empty(), "{:?}", second.diagnostics);
}

#[test]
fn test_incremental_submission_allows_shadowing_previous() {
    let first = Rc::new(bind("var x = 10"));
    let tree = parse("var x = \"now a string\"");
    let second = bind_global_scope(Some(first), &tree);
    assert!(second.diagnostics.is_empty(), "{:?}", second.diagnostics);
}

#[test]
fn test_incremental_submission_keeps_previous_diagnostics() {
    let first = Rc::new(bind("missing"));
    assert_eq!(first.diagnostics.len(), 1);
    let tree = parse("var fine = 1");
    let second = bind_global_scope(Some(first), &tree);
    let messages: Vec<&str> = second
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(messages, vec!["Variable 'missing' doesn't exist."]);
}

#[test]
fn test_all_functions_accumulates_across_submissions() {
    let first = Rc::new(bind("function a() { }"));
    let tree = parse("function b() { }");
    let second = bind_global_scope(Some(Rc::clone(&first)), &tree);
    let names: Vec<String> = second
        .all_functions()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}
