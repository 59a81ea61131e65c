//! The lowerer.
//!
//! Rewrites a bound statement into a single flat block containing only
//! {variable-declaration, goto, conditional-goto, label, return,
//! expression-statement}. The break and continue labels minted during
//! binding are reused as-is; fresh labels are minted only for the jump
//! targets the source never names (branch joins, loop body entries).
//! The pass is pure: it emits no diagnostics and is idempotent on
//! already-lowered input.

use coco_binder::bound::{BoundExpression, BoundLabel, BoundStatement, Constant};
use coco_binder::operators::BoundBinaryOperator;
use coco_binder::symbol::VariableSymbol;
use std::rc::Rc;

/// Lower a statement into a flat block of labels and jumps.
pub fn lower(statement: BoundStatement) -> BoundStatement {
    let mut lowerer = Lowerer { label_counter: 0 };
    let mut statements = Vec::new();
    lowerer.lower_statement(statement, &mut statements);
    BoundStatement::Block(statements)
}

struct Lowerer {
    label_counter: u32,
}

impl Lowerer {
    fn fresh_label(&mut self) -> BoundLabel {
        self.label_counter += 1;
        BoundLabel::new(format!("Label{}", self.label_counter))
    }

    fn lower_statement(&mut self, statement: BoundStatement, out: &mut Vec<BoundStatement>) {
        match statement {
            BoundStatement::Block(statements) => {
                // Nested blocks flatten away; scoping was resolved during
                // binding, so the structure carries no information here.
                for statement in statements {
                    self.lower_statement(statement, out);
                }
            }
            BoundStatement::If {
                condition,
                then_branch,
                else_branch,
            } => self.lower_if(condition, *then_branch, else_branch, out),
            BoundStatement::While {
                condition,
                body,
                break_label,
                continue_label,
            } => self.lower_while(condition, *body, break_label, continue_label, out),
            BoundStatement::DoWhile {
                body,
                condition,
                break_label,
                continue_label,
            } => self.lower_do_while(*body, condition, break_label, continue_label, out),
            BoundStatement::For {
                variable,
                lower_bound,
                upper_bound,
                body,
                break_label,
                continue_label,
            } => self.lower_for(
                variable,
                lower_bound,
                upper_bound,
                *body,
                break_label,
                continue_label,
                out,
            ),
            // Already in lowered form.
            statement @ (BoundStatement::VariableDeclaration { .. }
            | BoundStatement::Label(_)
            | BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto { .. }
            | BoundStatement::Return(_)
            | BoundStatement::Expression(_)) => out.push(statement),
        }
    }

    /// ```text
    /// if <condition>              goto end unless <condition>
    ///     <then>                  <then>
    ///                       ==>   end:
    ///
    /// if <condition>              goto else unless <condition>
    ///     <then>                  <then>
    /// else                        goto end
    ///     <else>            ==>   else:
    ///                             <else>
    ///                             end:
    /// ```
    fn lower_if(
        &mut self,
        condition: BoundExpression,
        then_branch: BoundStatement,
        else_branch: Option<Box<BoundStatement>>,
        out: &mut Vec<BoundStatement>,
    ) {
        match else_branch {
            None => {
                let end_label = self.fresh_label();
                out.push(BoundStatement::ConditionalGoto {
                    label: end_label.clone(),
                    condition,
                    jump_if_true: false,
                });
                self.lower_statement(then_branch, out);
                out.push(BoundStatement::Label(end_label));
            }
            Some(else_branch) => {
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();
                out.push(BoundStatement::ConditionalGoto {
                    label: else_label.clone(),
                    condition,
                    jump_if_true: false,
                });
                self.lower_statement(then_branch, out);
                out.push(BoundStatement::Goto(end_label.clone()));
                out.push(BoundStatement::Label(else_label));
                self.lower_statement(*else_branch, out);
                out.push(BoundStatement::Label(end_label));
            }
        }
    }

    /// ```text
    /// while <condition>           goto continue
    ///     <body>                  body:
    ///                       ==>   <body>
    ///                             continue:
    ///                             goto body if <condition>
    ///                             break:
    /// ```
    fn lower_while(
        &mut self,
        condition: BoundExpression,
        body: BoundStatement,
        break_label: BoundLabel,
        continue_label: BoundLabel,
        out: &mut Vec<BoundStatement>,
    ) {
        let body_label = self.fresh_label();
        out.push(BoundStatement::Goto(continue_label.clone()));
        out.push(BoundStatement::Label(body_label.clone()));
        self.lower_statement(body, out);
        out.push(BoundStatement::Label(continue_label));
        out.push(BoundStatement::ConditionalGoto {
            label: body_label,
            condition,
            jump_if_true: true,
        });
        out.push(BoundStatement::Label(break_label));
    }

    /// Same as `while`, but the body runs once before the first test.
    fn lower_do_while(
        &mut self,
        body: BoundStatement,
        condition: BoundExpression,
        break_label: BoundLabel,
        continue_label: BoundLabel,
        out: &mut Vec<BoundStatement>,
    ) {
        let body_label = self.fresh_label();
        out.push(BoundStatement::Label(body_label.clone()));
        self.lower_statement(body, out);
        out.push(BoundStatement::Label(continue_label));
        out.push(BoundStatement::ConditionalGoto {
            label: body_label,
            condition,
            jump_if_true: true,
        });
        out.push(BoundStatement::Label(break_label));
    }

    /// ```text
    /// for <var> = <lo> to <hi>          var <var> = <lo>
    ///     <body>                        let upperBound = <hi>
    ///                            ==>    while <var> <= upperBound
    ///                                       <body>
    ///                                       continue:
    ///                                       <var> = <var> + 1
    /// ```
    ///
    /// The upper bound is evaluated once, before the loop. The source's
    /// continue label sits before the increment; the generated while
    /// receives a fresh continue label of its own so `continue` in the
    /// body still reaches the increment.
    #[allow(clippy::too_many_arguments)]
    fn lower_for(
        &mut self,
        variable: Rc<VariableSymbol>,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: BoundStatement,
        break_label: BoundLabel,
        continue_label: BoundLabel,
        out: &mut Vec<BoundStatement>,
    ) {
        let upper_bound_variable = Rc::new(VariableSymbol::new(
            "upperBound",
            variable.kind,
            true,
            coco_binder::Type::Int,
        ));

        let condition = BoundExpression::Binary {
            operator: &BoundBinaryOperator::INT_LESS_OR_EQUALS,
            left: Box::new(BoundExpression::Variable(Rc::clone(&variable))),
            right: Box::new(BoundExpression::Variable(Rc::clone(&upper_bound_variable))),
        };
        let increment = BoundStatement::Expression(BoundExpression::Assignment {
            variable: Rc::clone(&variable),
            expression: Box::new(BoundExpression::Binary {
                operator: &BoundBinaryOperator::INT_ADDITION,
                left: Box::new(BoundExpression::Variable(Rc::clone(&variable))),
                right: Box::new(BoundExpression::Literal(Constant::Int(1))),
            }),
        });
        let while_body = BoundStatement::Block(vec![
            body,
            BoundStatement::Label(continue_label),
            increment,
        ]);
        let while_statement = BoundStatement::While {
            condition,
            body: Box::new(while_body),
            break_label,
            continue_label: self.fresh_label(),
        };

        out.push(BoundStatement::VariableDeclaration {
            variable,
            initializer: lower_bound,
        });
        out.push(BoundStatement::VariableDeclaration {
            variable: upper_bound_variable,
            initializer: upper_bound,
        });
        self.lower_statement(while_statement, out);
    }
}
