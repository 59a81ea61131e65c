//! coco_binder: name and type resolution producing a bound tree.

pub mod binder;
pub mod bound;
pub mod operators;
pub mod printer;
pub mod scope;
pub mod symbol;
pub mod types;

pub use binder::{bind_function_body, bind_global_scope, BoundGlobalScope};
pub use bound::{BoundExpression, BoundLabel, BoundStatement, Constant};
pub use operators::{
    BinaryOperatorKind, BoundBinaryOperator, BoundUnaryOperator, UnaryOperatorKind,
};
pub use scope::BoundScope;
pub use symbol::{builtins, FunctionSymbol, SymbolId, VariableKind, VariableSymbol};
pub use types::{Conversion, Type};
