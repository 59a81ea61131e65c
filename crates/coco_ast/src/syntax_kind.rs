//! The kinds of tokens produced by the scanner, plus the fixed facts the
//! parser needs about them (keyword lookup, operator precedence).

use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Special
    EndOfFile,
    Bad,

    // Literals and names
    Number,
    String,
    Identifier,

    // Punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Tilde,
    Ampersand,
    AmpersandAmpersand,
    Pipe,
    PipePipe,
    Hat,
    Equals,
    EqualsEquals,
    BangEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Colon,
    Comma,

    // Keywords
    TrueKeyword,
    FalseKeyword,
    VarKeyword,
    LetKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    DoKeyword,
    ForKeyword,
    ToKeyword,
    BreakKeyword,
    ContinueKeyword,
    ReturnKeyword,
    FunctionKeyword,
}

impl SyntaxKind {
    /// The keyword kind for an identifier-shaped word, if it is a keyword.
    pub fn keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "true" => SyntaxKind::TrueKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "var" => SyntaxKind::VarKeyword,
            "let" => SyntaxKind::LetKeyword,
            "if" => SyntaxKind::IfKeyword,
            "else" => SyntaxKind::ElseKeyword,
            "while" => SyntaxKind::WhileKeyword,
            "do" => SyntaxKind::DoKeyword,
            "for" => SyntaxKind::ForKeyword,
            "to" => SyntaxKind::ToKeyword,
            "break" => SyntaxKind::BreakKeyword,
            "continue" => SyntaxKind::ContinueKeyword,
            "return" => SyntaxKind::ReturnKeyword,
            "function" => SyntaxKind::FunctionKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// Precedence of this kind as a unary operator; 0 if it isn't one.
    pub fn unary_operator_precedence(self) -> u8 {
        match self {
            SyntaxKind::Plus | SyntaxKind::Minus | SyntaxKind::Bang | SyntaxKind::Tilde => 6,
            _ => 0,
        }
    }

    /// Precedence of this kind as a binary operator; 0 if it isn't one.
    pub fn binary_operator_precedence(self) -> u8 {
        match self {
            SyntaxKind::Star | SyntaxKind::Slash => 5,
            SyntaxKind::Plus | SyntaxKind::Minus => 4,
            SyntaxKind::EqualsEquals
            | SyntaxKind::BangEquals
            | SyntaxKind::Less
            | SyntaxKind::LessOrEquals
            | SyntaxKind::Greater
            | SyntaxKind::GreaterOrEquals => 3,
            SyntaxKind::Ampersand | SyntaxKind::AmpersandAmpersand => 2,
            SyntaxKind::Pipe | SyntaxKind::PipePipe | SyntaxKind::Hat => 1,
            _ => 0,
        }
    }

    /// The fixed source text of this kind, for kinds that have one.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Bang => "!",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Ampersand => "&",
            SyntaxKind::AmpersandAmpersand => "&&",
            SyntaxKind::Pipe => "|",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::Hat => "^",
            SyntaxKind::Equals => "=",
            SyntaxKind::EqualsEquals => "==",
            SyntaxKind::BangEquals => "!=",
            SyntaxKind::Less => "<",
            SyntaxKind::LessOrEquals => "<=",
            SyntaxKind::Greater => ">",
            SyntaxKind::GreaterOrEquals => ">=",
            SyntaxKind::OpenParen => "(",
            SyntaxKind::CloseParen => ")",
            SyntaxKind::OpenBrace => "{",
            SyntaxKind::CloseBrace => "}",
            SyntaxKind::Colon => ":",
            SyntaxKind::Comma => ",",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::WhileKeyword => "while",
            SyntaxKind::DoKeyword => "do",
            SyntaxKind::ForKeyword => "for",
            SyntaxKind::ToKeyword => "to",
            SyntaxKind::BreakKeyword => "break",
            SyntaxKind::ContinueKeyword => "continue",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::FunctionKeyword => "function",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(SyntaxKind::keyword("while"), Some(SyntaxKind::WhileKeyword));
        assert_eq!(SyntaxKind::keyword("function"), Some(SyntaxKind::FunctionKeyword));
        assert_eq!(SyntaxKind::keyword("whale"), None);
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        assert!(
            SyntaxKind::Star.binary_operator_precedence()
                > SyntaxKind::Plus.binary_operator_precedence()
        );
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        assert!(
            SyntaxKind::Minus.unary_operator_precedence()
                > SyntaxKind::Star.binary_operator_precedence()
        );
    }

    #[test]
    fn test_non_operators_have_zero_precedence() {
        assert_eq!(SyntaxKind::OpenParen.binary_operator_precedence(), 0);
        assert_eq!(SyntaxKind::Identifier.unary_operator_precedence(), 0);
    }
}
