//! The tree-walking evaluator.
//!
//! Executes a lowered body as a state machine over its flat statement
//! list: an instruction pointer advances statement by statement, and
//! gotos set it from a label map built once per invoked body. Globals
//! live in a caller-provided store; each function call pushes a fresh
//! local frame holding exactly its parameters and locals.

use crate::value::Value;
use coco_binder::bound::{BoundExpression, BoundLabel, BoundStatement, Constant};
use coco_binder::operators::{BinaryOperatorKind, UnaryOperatorKind};
use coco_binder::symbol::{builtins, FunctionSymbol, VariableKind, VariableSymbol};
use coco_binder::Type;
use rustc_hash::FxHashMap;
use std::io::BufRead;
use std::rc::Rc;
use thiserror::Error;

/// Mutable variable storage, keyed by symbol identity.
pub type Variables = FxHashMap<Rc<VariableSymbol>, Value>;

/// A fault that aborts the current evaluation. These are not language
/// diagnostics: apart from division by zero and a failed runtime cast,
/// any of them means an earlier pipeline stage produced a malformed
/// program.
#[derive(Debug, Error)]
pub enum RuntimeFault {
    #[error("division by zero")]
    DivisionByZero,
    #[error("'{value}' is not a valid {target}")]
    InvalidCast { value: String, target: &'static str },
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
    #[error("unresolved label '{0}'")]
    UnresolvedLabel(BoundLabel),
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub struct Evaluator<'a> {
    /// Lowered bodies for every declared function, keyed by symbol.
    functions: &'a FxHashMap<Rc<FunctionSymbol>, Rc<BoundStatement>>,
    globals: &'a mut Variables,
    locals: Vec<Variables>,
    /// Created on the first `random` call.
    rng: Option<fastrand::Rng>,
    last_value: Value,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        functions: &'a FxHashMap<Rc<FunctionSymbol>, Rc<BoundStatement>>,
        globals: &'a mut Variables,
    ) -> Self {
        Self {
            functions,
            globals,
            locals: vec![Variables::default()],
            rng: None,
            last_value: Value::Unit,
        }
    }

    /// Run a lowered top-level body. The result is the value of the last
    /// executed expression statement or initializer, the implicit result
    /// channel of global code.
    pub fn evaluate(&mut self, body: &BoundStatement) -> Result<Value, RuntimeFault> {
        self.run_body(body)?;
        Ok(self.last_value.clone())
    }

    /// Execute a flat body to completion. An explicit `return` produces
    /// `Some(value)` and unwinds the rest of the body; running off the
    /// end produces `None`. This channel is distinct from the last-value
    /// channel used by top-level code.
    fn run_body(&mut self, body: &BoundStatement) -> Result<Option<Value>, RuntimeFault> {
        let statements: &[BoundStatement] = match body {
            BoundStatement::Block(statements) => statements,
            other => std::slice::from_ref(other),
        };

        // Jump targets resolve to the slot after the label, so taking a
        // goto skips the label no-op.
        let mut label_targets: FxHashMap<&BoundLabel, usize> = FxHashMap::default();
        for (i, statement) in statements.iter().enumerate() {
            if let BoundStatement::Label(label) = statement {
                label_targets.insert(label, i + 1);
            }
        }
        let resolve = |label: &BoundLabel| {
            label_targets
                .get(label)
                .copied()
                .ok_or_else(|| RuntimeFault::UnresolvedLabel(label.clone()))
        };

        let mut index = 0;
        while index < statements.len() {
            match &statements[index] {
                BoundStatement::VariableDeclaration {
                    variable,
                    initializer,
                } => {
                    let value = self.evaluate_expression(initializer)?;
                    self.last_value = value.clone();
                    self.assign(variable, value);
                    index += 1;
                }
                BoundStatement::Expression(expression) => {
                    self.last_value = self.evaluate_expression(expression)?;
                    index += 1;
                }
                BoundStatement::Goto(label) => {
                    index = resolve(label)?;
                }
                BoundStatement::ConditionalGoto {
                    label,
                    condition,
                    jump_if_true,
                } => {
                    let condition = self.evaluate_bool(condition)?;
                    if condition == *jump_if_true {
                        index = resolve(label)?;
                    } else {
                        index += 1;
                    }
                }
                BoundStatement::Label(_) => {
                    index += 1;
                }
                BoundStatement::Return(expression) => {
                    let value = match expression {
                        Some(expression) => self.evaluate_expression(expression)?,
                        None => Value::Unit,
                    };
                    return Ok(Some(value));
                }
                BoundStatement::Block(_)
                | BoundStatement::If { .. }
                | BoundStatement::While { .. }
                | BoundStatement::DoWhile { .. }
                | BoundStatement::For { .. } => {
                    return Err(RuntimeFault::Internal(
                        "structured statement reached the evaluator",
                    ));
                }
            }
        }
        Ok(None)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn evaluate_expression(&mut self, expression: &BoundExpression) -> Result<Value, RuntimeFault> {
        match expression {
            BoundExpression::Error => Err(RuntimeFault::Internal(
                "error expression reached the evaluator",
            )),
            BoundExpression::Literal(constant) => Ok(match constant {
                Constant::Bool(value) => Value::Bool(*value),
                Constant::Int(value) => Value::Int(*value),
                Constant::String(value) => Value::String(Rc::clone(value)),
            }),
            BoundExpression::Variable(variable) => self.read(variable),
            BoundExpression::Assignment {
                variable,
                expression,
            } => {
                let value = self.evaluate_expression(expression)?;
                self.assign(variable, value.clone());
                Ok(value)
            }
            BoundExpression::Unary { operator, operand } => {
                let operand = self.evaluate_expression(operand)?;
                self.evaluate_unary(operator.kind, operand)
            }
            BoundExpression::Binary {
                operator,
                left,
                right,
            } => self.evaluate_binary(operator.kind, left, right),
            BoundExpression::Call {
                function,
                arguments,
            } => self.evaluate_call(function, arguments),
            BoundExpression::Conversion { ty, expression } => {
                let value = self.evaluate_expression(expression)?;
                self.evaluate_conversion(*ty, value)
            }
        }
    }

    fn evaluate_bool(&mut self, expression: &BoundExpression) -> Result<bool, RuntimeFault> {
        match self.evaluate_expression(expression)? {
            Value::Bool(value) => Ok(value),
            _ => Err(RuntimeFault::Internal("condition was not a bool")),
        }
    }

    fn evaluate_unary(
        &mut self,
        kind: UnaryOperatorKind,
        operand: Value,
    ) -> Result<Value, RuntimeFault> {
        match (kind, operand) {
            (UnaryOperatorKind::Identity, Value::Int(value)) => Ok(Value::Int(value)),
            (UnaryOperatorKind::Negation, Value::Int(value)) => {
                Ok(Value::Int(value.wrapping_neg()))
            }
            (UnaryOperatorKind::LogicalNegation, Value::Bool(value)) => Ok(Value::Bool(!value)),
            (UnaryOperatorKind::OnesComplement, Value::Int(value)) => Ok(Value::Int(!value)),
            _ => Err(RuntimeFault::Internal("ill-typed unary operand")),
        }
    }

    fn evaluate_binary(
        &mut self,
        kind: BinaryOperatorKind,
        left: &BoundExpression,
        right: &BoundExpression,
    ) -> Result<Value, RuntimeFault> {
        // Only `&&` and `||` short-circuit. Their bitwise cousins `&`,
        // `|`, `^` on bool always evaluate both operands.
        match kind {
            BinaryOperatorKind::LogicalAnd => {
                if !self.evaluate_bool(left)? {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.evaluate_bool(right)?));
            }
            BinaryOperatorKind::LogicalOr => {
                if self.evaluate_bool(left)? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.evaluate_bool(right)?));
            }
            _ => {}
        }

        let left = self.evaluate_expression(left)?;
        let right = self.evaluate_expression(right)?;
        match (kind, left, right) {
            (BinaryOperatorKind::Addition, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Int(l.wrapping_add(r)))
            }
            (BinaryOperatorKind::Addition, Value::String(l), Value::String(r)) => {
                Ok(Value::String(Rc::from(format!("{l}{r}"))))
            }
            (BinaryOperatorKind::Subtraction, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Int(l.wrapping_sub(r)))
            }
            (BinaryOperatorKind::Multiplication, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Int(l.wrapping_mul(r)))
            }
            (BinaryOperatorKind::Division, Value::Int(l), Value::Int(r)) => {
                if r == 0 {
                    return Err(RuntimeFault::DivisionByZero);
                }
                Ok(Value::Int(l.wrapping_div(r)))
            }
            (BinaryOperatorKind::BitwiseAnd, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Int(l & r))
            }
            (BinaryOperatorKind::BitwiseAnd, Value::Bool(l), Value::Bool(r)) => {
                Ok(Value::Bool(l & r))
            }
            (BinaryOperatorKind::BitwiseOr, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l | r)),
            (BinaryOperatorKind::BitwiseOr, Value::Bool(l), Value::Bool(r)) => {
                Ok(Value::Bool(l | r))
            }
            (BinaryOperatorKind::BitwiseXor, Value::Int(l), Value::Int(r)) => Ok(Value::Int(l ^ r)),
            (BinaryOperatorKind::BitwiseXor, Value::Bool(l), Value::Bool(r)) => {
                Ok(Value::Bool(l ^ r))
            }
            (BinaryOperatorKind::Equals, l, r) => Ok(Value::Bool(l == r)),
            (BinaryOperatorKind::NotEquals, l, r) => Ok(Value::Bool(l != r)),
            (BinaryOperatorKind::Less, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l < r)),
            (BinaryOperatorKind::LessOrEquals, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Bool(l <= r))
            }
            (BinaryOperatorKind::Greater, Value::Int(l), Value::Int(r)) => Ok(Value::Bool(l > r)),
            (BinaryOperatorKind::GreaterOrEquals, Value::Int(l), Value::Int(r)) => {
                Ok(Value::Bool(l >= r))
            }
            _ => Err(RuntimeFault::Internal("ill-typed binary operands")),
        }
    }

    fn evaluate_call(
        &mut self,
        function: &Rc<FunctionSymbol>,
        arguments: &[BoundExpression],
    ) -> Result<Value, RuntimeFault> {
        // Builtins dispatch on symbol identity; they have no body.
        match function.id {
            builtins::PRINT_ID => {
                let Some(argument) = arguments.first() else {
                    return Err(RuntimeFault::Internal("print() takes one argument"));
                };
                let text = self.evaluate_expression(argument)?;
                println!("{text}");
                return Ok(Value::Unit);
            }
            builtins::INPUT_ID => {
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line)?;
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                return Ok(Value::String(Rc::from(line)));
            }
            builtins::RANDOM_ID => {
                let Some(argument) = arguments.first() else {
                    return Err(RuntimeFault::Internal("random() takes one argument"));
                };
                let max = match self.evaluate_expression(argument)? {
                    Value::Int(max) => max,
                    _ => return Err(RuntimeFault::Internal("random() takes an int")),
                };
                let rng = self.rng.get_or_insert_with(fastrand::Rng::new);
                let value = if max <= 0 { 0 } else { rng.i64(0..max) };
                return Ok(Value::Int(value));
            }
            _ => {}
        }

        // Arguments are evaluated left to right against the caller's
        // frame, before the callee's frame exists.
        let mut frame = Variables::default();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            let value = self.evaluate_expression(argument)?;
            frame.insert(Rc::clone(parameter), value);
        }

        let Some(body) = self.functions.get(function).map(Rc::clone) else {
            return Err(RuntimeFault::Internal("call to a function with no body"));
        };
        self.locals.push(frame);
        let result = self.run_body(&body);
        self.locals.pop();
        // A body that runs off its end without an explicit return yields
        // the callee's last-value channel.
        match result? {
            Some(value) => Ok(value),
            None => Ok(self.last_value.clone()),
        }
    }

    fn evaluate_conversion(&self, ty: Type, value: Value) -> Result<Value, RuntimeFault> {
        match (ty, value) {
            (Type::Bool, Value::Bool(value)) => Ok(Value::Bool(value)),
            (Type::Bool, Value::Int(value)) => Ok(Value::Bool(value != 0)),
            (Type::Bool, Value::String(value)) => {
                value
                    .parse::<bool>()
                    .map(Value::Bool)
                    .map_err(|_| RuntimeFault::InvalidCast {
                        value: value.to_string(),
                        target: "bool",
                    })
            }
            (Type::Int, Value::Int(value)) => Ok(Value::Int(value)),
            (Type::Int, Value::Bool(value)) => Ok(Value::Int(i64::from(value))),
            (Type::Int, Value::String(value)) => {
                value
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| RuntimeFault::InvalidCast {
                        value: value.to_string(),
                        target: "int",
                    })
            }
            (Type::String, value) => Ok(Value::String(Rc::from(value.to_string()))),
            _ => Err(RuntimeFault::Internal("unsupported conversion")),
        }
    }

    // ========================================================================
    // Variable storage
    // ========================================================================

    fn assign(&mut self, variable: &Rc<VariableSymbol>, value: Value) {
        if variable.kind == VariableKind::Global {
            self.globals.insert(Rc::clone(variable), value);
        } else if let Some(frame) = self.locals.last_mut() {
            frame.insert(Rc::clone(variable), value);
        }
    }

    fn read(&self, variable: &Rc<VariableSymbol>) -> Result<Value, RuntimeFault> {
        let stored = if variable.kind == VariableKind::Global {
            self.globals.get(variable)
        } else {
            self.locals.last().and_then(|frame| frame.get(variable))
        };
        stored
            .cloned()
            .ok_or(RuntimeFault::Internal("read of an unbound variable"))
    }
}
