//! Textual dump of bound trees, for debugging and tooling.

use crate::bound::{BoundExpression, BoundStatement};
use crate::operators::{BinaryOperatorKind, UnaryOperatorKind};
use std::fmt::{self, Write};

/// Write an indented rendering of a statement to `writer`.
pub fn write_statement(writer: &mut dyn Write, statement: &BoundStatement) -> fmt::Result {
    write_statement_indented(writer, statement, 0)
}

/// Render a statement to a string. Convenient for tests that compare
/// tree shapes.
pub fn statement_to_string(statement: &BoundStatement) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_statement(&mut out, statement);
    out
}

fn write_statement_indented(
    writer: &mut dyn Write,
    statement: &BoundStatement,
    indent: usize,
) -> fmt::Result {
    let pad = "    ".repeat(indent);
    match statement {
        BoundStatement::Block(statements) => {
            writeln!(writer, "{pad}{{")?;
            for statement in statements {
                write_statement_indented(writer, statement, indent + 1)?;
            }
            writeln!(writer, "{pad}}}")
        }
        BoundStatement::VariableDeclaration {
            variable,
            initializer,
        } => {
            let keyword = if variable.is_read_only { "let" } else { "var" };
            writeln!(
                writer,
                "{pad}{keyword} {}: {} = {}",
                variable.name,
                variable.ty,
                expression_to_string(initializer)
            )
        }
        BoundStatement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            writeln!(writer, "{pad}if {}", expression_to_string(condition))?;
            write_statement_indented(writer, then_branch, indent + 1)?;
            if let Some(else_branch) = else_branch {
                writeln!(writer, "{pad}else")?;
                write_statement_indented(writer, else_branch, indent + 1)?;
            }
            Ok(())
        }
        BoundStatement::While {
            condition, body, ..
        } => {
            writeln!(writer, "{pad}while {}", expression_to_string(condition))?;
            write_statement_indented(writer, body, indent + 1)
        }
        BoundStatement::DoWhile {
            body, condition, ..
        } => {
            writeln!(writer, "{pad}do")?;
            write_statement_indented(writer, body, indent + 1)?;
            writeln!(writer, "{pad}while {}", expression_to_string(condition))
        }
        BoundStatement::For {
            variable,
            lower_bound,
            upper_bound,
            body,
            ..
        } => {
            writeln!(
                writer,
                "{pad}for {} = {} to {}",
                variable.name,
                expression_to_string(lower_bound),
                expression_to_string(upper_bound)
            )?;
            write_statement_indented(writer, body, indent + 1)
        }
        BoundStatement::Label(label) => writeln!(writer, "{pad}{label}:"),
        BoundStatement::Goto(label) => writeln!(writer, "{pad}goto {label}"),
        BoundStatement::ConditionalGoto {
            label,
            condition,
            jump_if_true,
        } => {
            let polarity = if *jump_if_true { "if" } else { "unless" };
            writeln!(
                writer,
                "{pad}goto {label} {polarity} {}",
                expression_to_string(condition)
            )
        }
        BoundStatement::Return(expression) => match expression {
            Some(expression) => {
                writeln!(writer, "{pad}return {}", expression_to_string(expression))
            }
            None => writeln!(writer, "{pad}return"),
        },
        BoundStatement::Expression(expression) => {
            writeln!(writer, "{pad}{}", expression_to_string(expression))
        }
    }
}

pub fn expression_to_string(expression: &BoundExpression) -> String {
    let mut out = String::new();
    let _ = write_expression(&mut out, expression);
    out
}

fn write_expression(writer: &mut dyn Write, expression: &BoundExpression) -> fmt::Result {
    match expression {
        BoundExpression::Error => writer.write_str("?"),
        BoundExpression::Literal(constant) => write!(writer, "{constant}"),
        BoundExpression::Variable(variable) => writer.write_str(&variable.name),
        BoundExpression::Assignment {
            variable,
            expression,
        } => {
            write!(writer, "{} = ", variable.name)?;
            write_expression(writer, expression)
        }
        BoundExpression::Unary { operator, operand } => {
            writer.write_str(unary_operator_text(operator.kind))?;
            write_expression(writer, operand)
        }
        BoundExpression::Binary {
            operator,
            left,
            right,
        } => {
            writer.write_char('(')?;
            write_expression(writer, left)?;
            write!(writer, " {} ", binary_operator_text(operator.kind))?;
            write_expression(writer, right)?;
            writer.write_char(')')
        }
        BoundExpression::Call {
            function,
            arguments,
        } => {
            write!(writer, "{}(", function.name)?;
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    writer.write_str(", ")?;
                }
                write_expression(writer, argument)?;
            }
            writer.write_char(')')
        }
        BoundExpression::Conversion { ty, expression } => {
            write!(writer, "{ty}(")?;
            write_expression(writer, expression)?;
            writer.write_char(')')
        }
    }
}

fn unary_operator_text(kind: UnaryOperatorKind) -> &'static str {
    match kind {
        UnaryOperatorKind::Identity => "+",
        UnaryOperatorKind::Negation => "-",
        UnaryOperatorKind::LogicalNegation => "!",
        UnaryOperatorKind::OnesComplement => "~",
    }
}

fn binary_operator_text(kind: BinaryOperatorKind) -> &'static str {
    match kind {
        BinaryOperatorKind::Addition => "+",
        BinaryOperatorKind::Subtraction => "-",
        BinaryOperatorKind::Multiplication => "*",
        BinaryOperatorKind::Division => "/",
        BinaryOperatorKind::LogicalAnd => "&&",
        BinaryOperatorKind::LogicalOr => "||",
        BinaryOperatorKind::BitwiseAnd => "&",
        BinaryOperatorKind::BitwiseOr => "|",
        BinaryOperatorKind::BitwiseXor => "^",
        BinaryOperatorKind::Equals => "==",
        BinaryOperatorKind::NotEquals => "!=",
        BinaryOperatorKind::Less => "<",
        BinaryOperatorKind::LessOrEquals => "<=",
        BinaryOperatorKind::Greater => ">",
        BinaryOperatorKind::GreaterOrEquals => ">=",
    }
}
