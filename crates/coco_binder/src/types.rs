//! The primitive types and the conversion classification between them.

use std::fmt;

/// A static type. `Error` marks subtrees whose type could not be
/// determined; it suppresses follow-on diagnostics about that subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Error,
    Bool,
    Int,
    String,
    Void,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Error => "?",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::String => "string",
            Type::Void => "void",
        }
    }

    /// Resolve a type name as written in source. Only the nameable
    /// primitive types resolve; `?` and `void` cannot be written.
    pub fn lookup(name: &str) -> Option<Type> {
        match name {
            "bool" => Some(Type::Bool),
            "int" => Some(Type::Int),
            "string" => Some(Type::String),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a value of one type may become a value of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// No conversion exists between the two types.
    None,
    /// The types are the same; no work is needed.
    Identity,
    /// Inserted silently by the binder.
    Implicit,
    /// Legal only through conversion-call syntax, e.g. `string(42)`.
    Explicit,
}

impl Conversion {
    /// Classify the conversion from one type to another. Identity for
    /// equal types; every distinct pair among bool, int, and string is
    /// explicit; nothing converts to or from void or error.
    pub fn classify(from: Type, to: Type) -> Conversion {
        if from == to {
            return Conversion::Identity;
        }
        let convertible =
            |ty: Type| matches!(ty, Type::Bool | Type::Int | Type::String);
        if convertible(from) && convertible(to) {
            return Conversion::Explicit;
        }
        Conversion::None
    }

    pub fn exists(self) -> bool {
        self != Conversion::None
    }

    pub fn is_identity(self) -> bool {
        self == Conversion::Identity
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_for_equal_types() {
        assert_eq!(Conversion::classify(Type::Int, Type::Int), Conversion::Identity);
        assert_eq!(Conversion::classify(Type::Void, Type::Void), Conversion::Identity);
    }

    #[test]
    fn test_primitive_cross_conversions_are_explicit() {
        for from in [Type::Bool, Type::Int, Type::String] {
            for to in [Type::Bool, Type::Int, Type::String] {
                if from == to {
                    continue;
                }
                assert_eq!(Conversion::classify(from, to), Conversion::Explicit);
            }
        }
    }

    #[test]
    fn test_void_and_error_do_not_convert() {
        assert_eq!(Conversion::classify(Type::Void, Type::Int), Conversion::None);
        assert_eq!(Conversion::classify(Type::Int, Type::Void), Conversion::None);
        assert_eq!(Conversion::classify(Type::Error, Type::Int), Conversion::None);
    }

    #[test]
    fn test_lookup_only_nameable_types() {
        assert_eq!(Type::lookup("int"), Some(Type::Int));
        assert_eq!(Type::lookup("void"), None);
        assert_eq!(Type::lookup("?"), None);
    }
}
