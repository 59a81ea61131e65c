//! Token information produced by the scanner.

use crate::syntax_kind::SyntaxKind;
use coco_core::text::TextSpan;

/// A literal value carried by a number or string token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Int(i64),
    String(String),
}

/// A scanned token.
#[derive(Debug, Clone)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The source span this token covers.
    pub span: TextSpan,
    /// The text of the token as it appeared in the source.
    pub text: String,
    /// The parsed literal value, for number and string tokens.
    pub value: Option<TokenValue>,
    /// Whether this token was inserted by the parser during error recovery.
    pub is_missing: bool,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextSpan, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            value: None,
            is_missing: false,
        }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }

    /// A zero-width token fabricated by the parser when the expected kind
    /// was not found.
    pub fn missing(kind: SyntaxKind, position: u32) -> Self {
        Self {
            kind,
            span: TextSpan::empty(position),
            text: String::new(),
            value: None,
            is_missing: true,
        }
    }

    /// The length of this token in bytes.
    pub fn len(&self) -> u32 {
        self.span.length
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_zero_width() {
        let token = Token::missing(SyntaxKind::Identifier, 7);
        assert!(token.is_missing);
        assert!(token.is_empty());
        assert_eq!(token.span.start, 7);
    }

    #[test]
    fn test_token_value() {
        let token = Token::new(SyntaxKind::Number, TextSpan::new(0, 2), "42")
            .with_value(TokenValue::Int(42));
        assert_eq!(token.value, Some(TokenValue::Int(42)));
    }
}
