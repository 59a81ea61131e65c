//! The operator tables.
//!
//! An operator is legal only for the exact (token, operand types)
//! combinations enumerated here. Resolution is a linear scan of a fixed
//! static table; an unmatched combination is reported by the binder as an
//! undefined operator.

use crate::types::Type;
use coco_ast::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: UnaryOperatorKind,
    pub operand_type: Type,
    pub result_type: Type,
}

impl BoundUnaryOperator {
    const fn new(syntax_kind: SyntaxKind, kind: UnaryOperatorKind, operand_type: Type) -> Self {
        Self {
            syntax_kind,
            kind,
            operand_type,
            result_type: operand_type,
        }
    }

    /// `!` on bool, synthesized when a flow edge needs the complement
    /// of a branch condition.
    pub const BOOL_LOGICAL_NEGATION: Self = Self::new(
        SyntaxKind::Bang,
        UnaryOperatorKind::LogicalNegation,
        Type::Bool,
    );

    pub fn bind(syntax_kind: SyntaxKind, operand_type: Type) -> Option<&'static Self> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
    }
}

static UNARY_OPERATORS: &[BoundUnaryOperator] = &[
    BoundUnaryOperator::new(SyntaxKind::Bang, UnaryOperatorKind::LogicalNegation, Type::Bool),
    BoundUnaryOperator::new(SyntaxKind::Plus, UnaryOperatorKind::Identity, Type::Int),
    BoundUnaryOperator::new(SyntaxKind::Minus, UnaryOperatorKind::Negation, Type::Int),
    BoundUnaryOperator::new(SyntaxKind::Tilde, UnaryOperatorKind::OnesComplement, Type::Int),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BinaryOperatorKind,
    pub left_type: Type,
    pub right_type: Type,
    pub result_type: Type,
}

impl BoundBinaryOperator {
    const fn new(
        syntax_kind: SyntaxKind,
        kind: BinaryOperatorKind,
        operand_type: Type,
        result_type: Type,
    ) -> Self {
        Self {
            syntax_kind,
            kind,
            left_type: operand_type,
            right_type: operand_type,
            result_type,
        }
    }

    /// `<=` on int, synthesized when desugaring counted loops.
    pub const INT_LESS_OR_EQUALS: Self = Self::new(
        SyntaxKind::LessOrEquals,
        BinaryOperatorKind::LessOrEquals,
        Type::Int,
        Type::Bool,
    );

    /// `+` on int, synthesized for the counted-loop increment.
    pub const INT_ADDITION: Self =
        Self::new(SyntaxKind::Plus, BinaryOperatorKind::Addition, Type::Int, Type::Int);

    pub fn bind(
        syntax_kind: SyntaxKind,
        left_type: Type,
        right_type: Type,
    ) -> Option<&'static Self> {
        BINARY_OPERATORS.iter().find(|op| {
            op.syntax_kind == syntax_kind
                && op.left_type == left_type
                && op.right_type == right_type
        })
    }
}

static BINARY_OPERATORS: &[BoundBinaryOperator] = &[
    // Arithmetic, int only.
    BoundBinaryOperator::new(SyntaxKind::Plus, BinaryOperatorKind::Addition, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Minus, BinaryOperatorKind::Subtraction, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Star, BinaryOperatorKind::Multiplication, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Slash, BinaryOperatorKind::Division, Type::Int, Type::Int),
    // Bitwise, on int and on bool. The bool forms never short-circuit.
    BoundBinaryOperator::new(SyntaxKind::Ampersand, BinaryOperatorKind::BitwiseAnd, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Pipe, BinaryOperatorKind::BitwiseOr, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Hat, BinaryOperatorKind::BitwiseXor, Type::Int, Type::Int),
    BoundBinaryOperator::new(SyntaxKind::Ampersand, BinaryOperatorKind::BitwiseAnd, Type::Bool, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::Pipe, BinaryOperatorKind::BitwiseOr, Type::Bool, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::Hat, BinaryOperatorKind::BitwiseXor, Type::Bool, Type::Bool),
    // Short-circuiting logical operators, bool only.
    BoundBinaryOperator::new(SyntaxKind::AmpersandAmpersand, BinaryOperatorKind::LogicalAnd, Type::Bool, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::PipePipe, BinaryOperatorKind::LogicalOr, Type::Bool, Type::Bool),
    // Equality, for every value type.
    BoundBinaryOperator::new(SyntaxKind::EqualsEquals, BinaryOperatorKind::Equals, Type::Int, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::BangEquals, BinaryOperatorKind::NotEquals, Type::Int, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::EqualsEquals, BinaryOperatorKind::Equals, Type::Bool, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::BangEquals, BinaryOperatorKind::NotEquals, Type::Bool, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::EqualsEquals, BinaryOperatorKind::Equals, Type::String, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::BangEquals, BinaryOperatorKind::NotEquals, Type::String, Type::Bool),
    // Comparison, int only.
    BoundBinaryOperator::new(SyntaxKind::Less, BinaryOperatorKind::Less, Type::Int, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::LessOrEquals, BinaryOperatorKind::LessOrEquals, Type::Int, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::Greater, BinaryOperatorKind::Greater, Type::Int, Type::Bool),
    BoundBinaryOperator::new(SyntaxKind::GreaterOrEquals, BinaryOperatorKind::GreaterOrEquals, Type::Int, Type::Bool),
    // String concatenation.
    BoundBinaryOperator::new(SyntaxKind::Plus, BinaryOperatorKind::Addition, Type::String, Type::String),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_only_for_int() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::Star, Type::Int, Type::Int).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::Star, Type::Bool, Type::Bool).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::Star, Type::String, Type::String).is_none());
    }

    #[test]
    fn test_plus_concatenates_strings() {
        let op = BoundBinaryOperator::bind(SyntaxKind::Plus, Type::String, Type::String);
        assert_eq!(op.map(|op| op.result_type), Some(Type::String));
    }

    #[test]
    fn test_bitwise_on_bool_and_int_only_with_matching_operands() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::Hat, Type::Bool, Type::Bool).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::Hat, Type::Int, Type::Int).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::Hat, Type::Int, Type::Bool).is_none());
    }

    #[test]
    fn test_comparison_only_for_int() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::Less, Type::Int, Type::Int).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::Less, Type::String, Type::String).is_none());
    }

    #[test]
    fn test_unary_operators() {
        assert!(BoundUnaryOperator::bind(SyntaxKind::Bang, Type::Bool).is_some());
        assert!(BoundUnaryOperator::bind(SyntaxKind::Bang, Type::Int).is_none());
        assert!(BoundUnaryOperator::bind(SyntaxKind::Tilde, Type::Int).is_some());
    }
}
