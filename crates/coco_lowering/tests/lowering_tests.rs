//! Lowering integration tests.
//!
//! Parses and binds small programs, lowers them, and checks the shape of
//! the flat goto form: only lowered statement kinds remain, every goto
//! targets an existing label, and lowering twice changes nothing.

use coco_binder::{bind_global_scope, BoundStatement};
use coco_lowering::lower;
use coco_parser::parse;
use std::collections::HashSet;

fn bind_and_lower(text: &str) -> BoundStatement {
    let tree = parse(text);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
    let scope = bind_global_scope(None, &tree);
    assert!(scope.diagnostics.is_empty(), "{:?}", scope.diagnostics);
    lower(BoundStatement::Block(scope.statements))
}

fn flat_statements(statement: &BoundStatement) -> &[BoundStatement] {
    match statement {
        BoundStatement::Block(statements) => statements,
        other => panic!("lowered tree must be a block, got {other:?}"),
    }
}

fn assert_fully_lowered(statement: &BoundStatement) {
    for statement in flat_statements(statement) {
        match statement {
            BoundStatement::VariableDeclaration { .. }
            | BoundStatement::Label(_)
            | BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto { .. }
            | BoundStatement::Return(_)
            | BoundStatement::Expression(_) => {}
            other => panic!("structured statement survived lowering: {other:?}"),
        }
    }
}

fn assert_gotos_resolve(statement: &BoundStatement) {
    let statements = flat_statements(statement);
    let labels: HashSet<_> = statements
        .iter()
        .filter_map(|s| match s {
            BoundStatement::Label(label) => Some(label.clone()),
            _ => None,
        })
        .collect();
    for statement in statements {
        let target = match statement {
            BoundStatement::Goto(label) => label,
            BoundStatement::ConditionalGoto { label, .. } => label,
            _ => continue,
        };
        assert!(labels.contains(target), "goto targets unknown label {target}");
    }
}

#[test]
fn test_if_lowers_to_conditional_goto() {
    let lowered = bind_and_lower("{ var a = 0 if a == 0 a = 10 }");
    assert_fully_lowered(&lowered);
    assert_gotos_resolve(&lowered);
    let conditional_gotos = flat_statements(&lowered)
        .iter()
        .filter(|s| matches!(s, BoundStatement::ConditionalGoto { .. }))
        .count();
    assert_eq!(conditional_gotos, 1);
}

#[test]
fn test_if_else_lowers_with_join_label() {
    let lowered = bind_and_lower("{ var a = 0 if a == 4 a = 10 else a = 5 }");
    assert_fully_lowered(&lowered);
    assert_gotos_resolve(&lowered);
    // One conditional jump into the else arm, one unconditional jump
    // over it.
    let statements = flat_statements(&lowered);
    assert!(statements
        .iter()
        .any(|s| matches!(s, BoundStatement::Goto(_))));
    assert_eq!(
        statements
            .iter()
            .filter(|s| matches!(s, BoundStatement::Label(_)))
            .count(),
        2
    );
}

#[test]
fn test_while_reuses_bound_loop_labels() {
    let lowered = bind_and_lower("while true { break continue }");
    assert_fully_lowered(&lowered);
    assert_gotos_resolve(&lowered);
    let statements = flat_statements(&lowered);
    // `break` and `continue` were bound as gotos to the loop's own
    // labels; lowering must emit those exact labels.
    let goto_targets: Vec<String> = statements
        .iter()
        .filter_map(|s| match s {
            BoundStatement::Goto(label) => Some(label.to_string()),
            _ => None,
        })
        .collect();
    assert!(goto_targets.contains(&"break1".to_string()), "{goto_targets:?}");
    assert!(goto_targets.contains(&"continue1".to_string()), "{goto_targets:?}");
}

#[test]
fn test_while_condition_is_tested_after_body_entry_jump() {
    let lowered = bind_and_lower("{ var n = 0 while n < 3 n = n + 1 }");
    let statements = flat_statements(&lowered);
    // The loop opens with a jump to the condition test, so the body is
    // skipped entirely when the condition is initially false.
    assert!(matches!(&statements[1], BoundStatement::Goto(label) if label.to_string() == "continue1"));
    assert!(matches!(
        statements.last(),
        Some(BoundStatement::Label(label)) if label.to_string() == "break1"
    ));
}

#[test]
fn test_do_while_body_precedes_condition() {
    let lowered = bind_and_lower("{ var n = 0 do n = n + 1 while n < 3 }");
    assert_fully_lowered(&lowered);
    assert_gotos_resolve(&lowered);
    let statements = flat_statements(&lowered);
    // No entry jump: the first loop statement is the body label.
    assert!(matches!(&statements[1], BoundStatement::Label(_)));
    assert!(matches!(&statements[2], BoundStatement::Expression(_)));
}

#[test]
fn test_for_desugars_to_counted_while() {
    let lowered = bind_and_lower("{ var total = 0 for i = 1 to 10 total = total + i }");
    assert_fully_lowered(&lowered);
    assert_gotos_resolve(&lowered);
    let statements = flat_statements(&lowered);
    // Loop variable plus a once-evaluated upper bound.
    let declarations: Vec<String> = statements
        .iter()
        .filter_map(|s| match s {
            BoundStatement::VariableDeclaration { variable, .. } => Some(variable.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(declarations, vec!["total", "i", "upperBound"]);
}

#[test]
fn test_for_continue_label_precedes_increment() {
    let lowered = bind_and_lower("for i = 1 to 3 { continue }");
    assert_gotos_resolve(&lowered);
    let statements = flat_statements(&lowered);
    let continue_index = statements
        .iter()
        .position(|s| matches!(s, BoundStatement::Label(label) if label.to_string() == "continue1"))
        .expect("continue label missing");
    // The statement after the source-level continue label is the
    // increment assignment.
    assert!(matches!(
        &statements[continue_index + 1],
        BoundStatement::Expression(coco_binder::BoundExpression::Assignment { .. })
    ));
}

#[test]
fn test_lowering_is_idempotent() {
    for text in [
        "{ var a = 0 if a == 0 a = 10 else a = 5 }",
        "{ var n = 0 while n < 3 n = n + 1 }",
        "{ var n = 0 do n = n + 1 while n < 3 }",
        "for i = 1 to 10 { if i == 5 break }",
    ] {
        let once = bind_and_lower(text);
        let printed_once = coco_binder::printer::statement_to_string(&once);
        let twice = lower(once);
        let printed_twice = coco_binder::printer::statement_to_string(&twice);
        assert_eq!(printed_once, printed_twice, "for {text:?}");
    }
}
