//! Runtime values.

use coco_binder::Type;
use std::fmt;
use std::rc::Rc;

/// A value produced during evaluation. `Unit` is the result of calling a
/// void function; it never reaches user-visible output.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    String(Rc<str>),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Unit => Type::Void,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::String(_) => Type::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String(Rc::from("hi")).to_string(), "hi");
        assert_eq!(Value::Unit.to_string(), "");
    }
}
