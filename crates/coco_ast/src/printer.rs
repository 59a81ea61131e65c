//! Textual dump of syntax trees, for debugging and tooling.
//!
//! Each node prints its kind name, one per line, indented by depth;
//! identifier and operator tokens print their source text alongside.

use crate::node::*;
use std::fmt::{self, Write};

/// Write an indented rendering of a compilation unit to `writer`.
pub fn write_tree(writer: &mut dyn Write, unit: &CompilationUnit) -> fmt::Result {
    writeln!(writer, "CompilationUnit")?;
    for member in &unit.members {
        write_member(writer, member, 1)?;
    }
    Ok(())
}

/// Render a compilation unit to a string.
pub fn tree_to_string(unit: &CompilationUnit) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_tree(&mut out, unit);
    out
}

fn write_member(writer: &mut dyn Write, member: &Member, indent: usize) -> fmt::Result {
    let pad = "    ".repeat(indent);
    match member {
        Member::Function(function) => {
            writeln!(writer, "{pad}FunctionDeclaration {}", function.identifier.text)?;
            for parameter in &function.parameters {
                writeln!(
                    writer,
                    "{pad}    Parameter {}: {}",
                    parameter.identifier.text, parameter.type_clause.identifier.text
                )?;
            }
            if let Some(type_clause) = &function.type_clause {
                writeln!(writer, "{pad}    TypeClause {}", type_clause.identifier.text)?;
            }
            write_statement(writer, &function.body, indent + 1)
        }
        Member::GlobalStatement(statement) => {
            writeln!(writer, "{pad}GlobalStatement")?;
            write_statement(writer, statement, indent + 1)
        }
    }
}

fn write_statement(writer: &mut dyn Write, statement: &Statement, indent: usize) -> fmt::Result {
    let pad = "    ".repeat(indent);
    match statement {
        Statement::Block(block) => {
            writeln!(writer, "{pad}BlockStatement")?;
            for statement in &block.statements {
                write_statement(writer, statement, indent + 1)?;
            }
            Ok(())
        }
        Statement::VariableDeclaration(declaration) => {
            writeln!(
                writer,
                "{pad}VariableDeclaration {} {}",
                declaration.keyword.text, declaration.identifier.text
            )?;
            if let Some(type_clause) = &declaration.type_clause {
                writeln!(writer, "{pad}    TypeClause {}", type_clause.identifier.text)?;
            }
            write_expression(writer, &declaration.initializer, indent + 1)
        }
        Statement::If(statement) => {
            writeln!(writer, "{pad}IfStatement")?;
            write_expression(writer, &statement.condition, indent + 1)?;
            write_statement(writer, &statement.then_statement, indent + 1)?;
            if let Some(else_clause) = &statement.else_clause {
                writeln!(writer, "{pad}ElseClause")?;
                write_statement(writer, &else_clause.else_statement, indent + 1)?;
            }
            Ok(())
        }
        Statement::While(statement) => {
            writeln!(writer, "{pad}WhileStatement")?;
            write_expression(writer, &statement.condition, indent + 1)?;
            write_statement(writer, &statement.body, indent + 1)
        }
        Statement::DoWhile(statement) => {
            writeln!(writer, "{pad}DoWhileStatement")?;
            write_statement(writer, &statement.body, indent + 1)?;
            write_expression(writer, &statement.condition, indent + 1)
        }
        Statement::For(statement) => {
            writeln!(writer, "{pad}ForStatement {}", statement.identifier.text)?;
            write_expression(writer, &statement.lower_bound, indent + 1)?;
            write_expression(writer, &statement.upper_bound, indent + 1)?;
            write_statement(writer, &statement.body, indent + 1)
        }
        Statement::Break(_) => writeln!(writer, "{pad}BreakStatement"),
        Statement::Continue(_) => writeln!(writer, "{pad}ContinueStatement"),
        Statement::Return(statement) => {
            writeln!(writer, "{pad}ReturnStatement")?;
            match &statement.expression {
                Some(expression) => write_expression(writer, expression, indent + 1),
                None => Ok(()),
            }
        }
        Statement::Expression(statement) => {
            writeln!(writer, "{pad}ExpressionStatement")?;
            write_expression(writer, &statement.expression, indent + 1)
        }
    }
}

fn write_expression(
    writer: &mut dyn Write,
    expression: &Expression,
    indent: usize,
) -> fmt::Result {
    let pad = "    ".repeat(indent);
    match expression {
        Expression::Literal(literal) => {
            let rendered = match &literal.value {
                LiteralValue::Bool(value) => value.to_string(),
                LiteralValue::Int(value) => value.to_string(),
                LiteralValue::String(value) => format!("{value:?}"),
            };
            writeln!(writer, "{pad}LiteralExpression {rendered}")
        }
        Expression::Name(name) => {
            writeln!(writer, "{pad}NameExpression {}", name.identifier.text)
        }
        Expression::Assignment(assignment) => {
            writeln!(writer, "{pad}AssignmentExpression {}", assignment.identifier.text)?;
            write_expression(writer, &assignment.expression, indent + 1)
        }
        Expression::Unary(unary) => {
            writeln!(writer, "{pad}UnaryExpression {}", unary.operator.text)?;
            write_expression(writer, &unary.operand, indent + 1)
        }
        Expression::Binary(binary) => {
            writeln!(writer, "{pad}BinaryExpression {}", binary.operator.text)?;
            write_expression(writer, &binary.left, indent + 1)?;
            write_expression(writer, &binary.right, indent + 1)
        }
        Expression::Call(call) => {
            writeln!(writer, "{pad}CallExpression {}", call.identifier.text)?;
            for argument in &call.arguments {
                write_expression(writer, argument, indent + 1)?;
            }
            Ok(())
        }
        Expression::Parenthesized(parenthesized) => {
            writeln!(writer, "{pad}ParenthesizedExpression")?;
            write_expression(writer, &parenthesized.expression, indent + 1)
        }
    }
}
