//! Parser integration tests.
//!
//! Checks tree shapes for each statement form, operator precedence and
//! associativity, and error recovery via fabricated missing tokens.

use coco_ast::node::*;
use coco_ast::syntax_kind::SyntaxKind;
use coco_parser::parse;

fn parse_clean(text: &str) -> CompilationUnit {
    let tree = parse(text);
    assert!(
        tree.diagnostics().is_empty(),
        "unexpected diagnostics for {text:?}: {:?}",
        tree.diagnostics()
    );
    tree.root().clone()
}

fn single_expression(text: &str) -> Expression {
    let root = parse_clean(text);
    assert_eq!(root.members.len(), 1);
    match &root.members[0] {
        Member::GlobalStatement(Statement::Expression(s)) => s.expression.clone(),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn single_statement(text: &str) -> Statement {
    let root = parse_clean(text);
    assert_eq!(root.members.len(), 1);
    match &root.members[0] {
        Member::GlobalStatement(statement) => statement.clone(),
        other => panic!("expected global statement, got {other:?}"),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expression = single_expression("1 + 2 * 3");
    let Expression::Binary(add) = expression else {
        panic!("expected binary expression");
    };
    assert_eq!(add.operator.kind, SyntaxKind::Plus);
    let Expression::Binary(mul) = add.right.as_ref() else {
        panic!("expected right operand to be the multiplication");
    };
    assert_eq!(mul.operator.kind, SyntaxKind::Star);
}

#[test]
fn test_same_precedence_is_left_associative() {
    let expression = single_expression("1 - 2 - 3");
    let Expression::Binary(outer) = expression else {
        panic!("expected binary expression");
    };
    assert!(matches!(outer.left.as_ref(), Expression::Binary(_)));
    assert!(matches!(
        outer.right.as_ref(),
        Expression::Literal(LiteralExpression {
            value: LiteralValue::Int(3),
            ..
        })
    ));
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let expression = single_expression("-1 + 2");
    let Expression::Binary(add) = expression else {
        panic!("expected binary expression");
    };
    assert!(matches!(add.left.as_ref(), Expression::Unary(_)));
}

#[test]
fn test_assignment_is_right_associative() {
    let expression = single_expression("a = b = 1");
    let Expression::Assignment(outer) = expression else {
        panic!("expected assignment");
    };
    assert_eq!(outer.identifier.text, "a");
    assert!(matches!(
        outer.expression.as_ref(),
        Expression::Assignment(_)
    ));
}

#[test]
fn test_call_with_arguments() {
    let expression = single_expression("random(10 + 1)");
    let Expression::Call(call) = expression else {
        panic!("expected call");
    };
    assert_eq!(call.identifier.text, "random");
    assert_eq!(call.arguments.len(), 1);
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let statement = single_statement("if a if b c else d");
    let Statement::If(outer) = statement else {
        panic!("expected if statement");
    };
    assert!(outer.else_clause.is_none());
    let Statement::If(inner) = outer.then_statement.as_ref() else {
        panic!("expected nested if");
    };
    assert!(inner.else_clause.is_some());
}

#[test]
fn test_for_statement_shape() {
    let statement = single_statement("for i = 1 to 10 { i }");
    let Statement::For(for_statement) = statement else {
        panic!("expected for statement");
    };
    assert_eq!(for_statement.identifier.text, "i");
    assert!(matches!(for_statement.body.as_ref(), Statement::Block(_)));
}

#[test]
fn test_do_while_statement_shape() {
    let statement = single_statement("do { x } while x < 10");
    let Statement::DoWhile(do_while) = statement else {
        panic!("expected do-while statement");
    };
    assert!(matches!(do_while.body.as_ref(), Statement::Block(_)));
    assert!(matches!(do_while.condition, Expression::Binary(_)));
}

#[test]
fn test_variable_declaration_with_type_clause() {
    let statement = single_statement("let x: int = 10");
    let Statement::VariableDeclaration(declaration) = statement else {
        panic!("expected variable declaration");
    };
    assert_eq!(declaration.keyword.kind, SyntaxKind::LetKeyword);
    let clause = declaration.type_clause.expect("expected type clause");
    assert_eq!(clause.identifier.text, "int");
}

#[test]
fn test_function_declaration() {
    let root = parse_clean("function add(a: int, b: int): int { return a + b }");
    assert_eq!(root.members.len(), 1);
    let Member::Function(function) = &root.members[0] else {
        panic!("expected function member");
    };
    assert_eq!(function.identifier.text, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(
        function
            .type_clause
            .as_ref()
            .map(|c| c.identifier.text.as_str()),
        Some("int")
    );
}

#[test]
fn test_return_value_must_be_on_same_line() {
    let root = parse(
        "function f(): int {\n    return 1\n}\nfunction g() {\n    return\n    f()\n}",
    )
    .root()
    .clone();
    assert_eq!(root.members.len(), 2);
    let Member::Function(g) = &root.members[1] else {
        panic!("expected function member");
    };
    let Statement::Block(BlockStatement { statements, .. }) = &g.body else {
        panic!("expected block body");
    };
    assert!(matches!(
        &statements[0],
        Statement::Return(ReturnStatement {
            expression: None,
            ..
        })
    ));
    assert!(matches!(&statements[1], Statement::Expression(_)));
}

#[test]
fn test_missing_token_is_fabricated_and_reported() {
    let tree = parse("(1 + 2");
    assert_eq!(tree.diagnostics().len(), 1);
    assert!(tree.diagnostics()[0].message.contains("expected <CloseParen>"));
    let Member::GlobalStatement(Statement::Expression(s)) = &tree.root().members[0] else {
        panic!("expected expression statement");
    };
    let Expression::Parenthesized(paren) = &s.expression else {
        panic!("expected parenthesized expression");
    };
    assert!(paren.close_paren.is_missing);
}

#[test]
fn test_tree_printer_renders_node_kinds() {
    let tree = parse("function f(n: int): int { return n } f(1 + 2)");
    let rendered = coco_ast::printer::tree_to_string(tree.root());
    assert!(rendered.starts_with("CompilationUnit\n"));
    assert!(rendered.contains("FunctionDeclaration f"));
    assert!(rendered.contains("Parameter n: int"));
    assert!(rendered.contains("ReturnStatement"));
    assert!(rendered.contains("CallExpression f"));
    assert!(rendered.contains("BinaryExpression +"));
}

#[test]
fn test_parser_never_loops_on_garbage() {
    // Every token here is unexpected in statement position; the parser
    // must consume them all and still produce a tree.
    let tree = parse(") ) )");
    assert!(!tree.diagnostics().is_empty());
    assert_eq!(tree.root().end_of_file.kind, SyntaxKind::EndOfFile);
}
