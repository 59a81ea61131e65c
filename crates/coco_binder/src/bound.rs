//! The bound tree: semantically checked statements and expressions.
//!
//! Every expression carries a resolved static type, computed when the
//! node is created and never revised. Loop statements carry the break
//! and continue labels minted during binding; lowering reuses exactly
//! these labels so the evaluator's label map stays consistent.

use crate::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::symbol::{FunctionSymbol, VariableSymbol};
use crate::types::Type;
use std::fmt;
use std::rc::Rc;

/// An opaque named jump target, unique within one body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundLabel(pub Rc<str>);

impl BoundLabel {
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compile-time constant value, as carried by literal expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    String(Rc<str>),
}

impl Constant {
    pub fn ty(&self) -> Type {
        match self {
            Constant::Bool(_) => Type::Bool,
            Constant::Int(_) => Type::Int,
            Constant::String(_) => Type::String,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(value) => write!(f, "{value}"),
            Constant::Int(value) => write!(f, "{value}"),
            Constant::String(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BoundStatement {
    Block(Vec<BoundStatement>),
    VariableDeclaration {
        variable: Rc<VariableSymbol>,
        initializer: BoundExpression,
    },
    If {
        condition: BoundExpression,
        then_branch: Box<BoundStatement>,
        else_branch: Option<Box<BoundStatement>>,
    },
    While {
        condition: BoundExpression,
        body: Box<BoundStatement>,
        break_label: BoundLabel,
        continue_label: BoundLabel,
    },
    DoWhile {
        body: Box<BoundStatement>,
        condition: BoundExpression,
        break_label: BoundLabel,
        continue_label: BoundLabel,
    },
    For {
        variable: Rc<VariableSymbol>,
        lower_bound: BoundExpression,
        upper_bound: BoundExpression,
        body: Box<BoundStatement>,
        break_label: BoundLabel,
        continue_label: BoundLabel,
    },
    Label(BoundLabel),
    Goto(BoundLabel),
    ConditionalGoto {
        label: BoundLabel,
        condition: BoundExpression,
        /// Jump when the condition evaluates to this polarity; fall
        /// through otherwise.
        jump_if_true: bool,
    },
    Return(Option<BoundExpression>),
    Expression(BoundExpression),
}

#[derive(Debug, Clone)]
pub enum BoundExpression {
    /// Placeholder for a subtree that failed to bind. Its `Error` type
    /// suppresses further diagnostics about anything containing it.
    Error,
    Literal(Constant),
    Variable(Rc<VariableSymbol>),
    Assignment {
        variable: Rc<VariableSymbol>,
        expression: Box<BoundExpression>,
    },
    Unary {
        operator: &'static BoundUnaryOperator,
        operand: Box<BoundExpression>,
    },
    Binary {
        operator: &'static BoundBinaryOperator,
        left: Box<BoundExpression>,
        right: Box<BoundExpression>,
    },
    Call {
        function: Rc<FunctionSymbol>,
        arguments: Vec<BoundExpression>,
    },
    Conversion {
        ty: Type,
        expression: Box<BoundExpression>,
    },
}

impl BoundExpression {
    pub fn ty(&self) -> Type {
        match self {
            BoundExpression::Error => Type::Error,
            BoundExpression::Literal(constant) => constant.ty(),
            BoundExpression::Variable(variable) => variable.ty,
            BoundExpression::Assignment { variable, .. } => variable.ty,
            BoundExpression::Unary { operator, .. } => operator.result_type,
            BoundExpression::Binary { operator, .. } => operator.result_type,
            BoundExpression::Call { function, .. } => function.return_type,
            BoundExpression::Conversion { ty, .. } => *ty,
        }
    }
}
