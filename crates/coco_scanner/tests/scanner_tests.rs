//! Scanner integration tests.
//!
//! Verifies tokenization of the full token inventory: literals, keywords,
//! identifiers, and every one- and two-character operator.

use coco_ast::syntax_kind::SyntaxKind;
use coco_ast::token::TokenValue;
use coco_scanner::scan;

/// Helper: scan source and return (kind, text) pairs, dropping the eof token.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let (tokens, diagnostics) = scan(source);
    assert!(
        diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        diagnostics.diagnostics()
    );
    tokens
        .into_iter()
        .take_while(|t| t.kind != SyntaxKind::EndOfFile)
        .map(|t| (t.kind, t.text))
        .collect()
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t  ").is_empty());
}

#[test]
fn test_number_literal() {
    let tokens = scan_all("42");
    assert_eq!(tokens, vec![(SyntaxKind::Number, "42".to_string())]);
}

#[test]
fn test_string_literal_value_drops_quotes() {
    let (tokens, _) = scan(r#""hello""#);
    assert_eq!(tokens[0].kind, SyntaxKind::String);
    assert_eq!(tokens[0].text, r#""hello""#);
    assert_eq!(tokens[0].value, Some(TokenValue::String("hello".to_string())));
}

#[test]
fn test_keywords_and_identifiers() {
    let kinds = scan_kinds("var x = true while whileish");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::VarKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::Equals,
            SyntaxKind::TrueKeyword,
            SyntaxKind::WhileKeyword,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_every_fixed_token_scans_back_to_its_kind() {
    // Every kind with fixed text must round-trip through the scanner.
    let all = [
        SyntaxKind::Plus,
        SyntaxKind::Minus,
        SyntaxKind::Star,
        SyntaxKind::Slash,
        SyntaxKind::Bang,
        SyntaxKind::Tilde,
        SyntaxKind::Ampersand,
        SyntaxKind::AmpersandAmpersand,
        SyntaxKind::Pipe,
        SyntaxKind::PipePipe,
        SyntaxKind::Hat,
        SyntaxKind::Equals,
        SyntaxKind::EqualsEquals,
        SyntaxKind::BangEquals,
        SyntaxKind::Less,
        SyntaxKind::LessOrEquals,
        SyntaxKind::Greater,
        SyntaxKind::GreaterOrEquals,
        SyntaxKind::OpenParen,
        SyntaxKind::CloseParen,
        SyntaxKind::OpenBrace,
        SyntaxKind::CloseBrace,
        SyntaxKind::Colon,
        SyntaxKind::Comma,
        SyntaxKind::TrueKeyword,
        SyntaxKind::FalseKeyword,
        SyntaxKind::VarKeyword,
        SyntaxKind::LetKeyword,
        SyntaxKind::IfKeyword,
        SyntaxKind::ElseKeyword,
        SyntaxKind::WhileKeyword,
        SyntaxKind::DoKeyword,
        SyntaxKind::ForKeyword,
        SyntaxKind::ToKeyword,
        SyntaxKind::BreakKeyword,
        SyntaxKind::ContinueKeyword,
        SyntaxKind::ReturnKeyword,
        SyntaxKind::FunctionKeyword,
    ];
    for kind in all {
        let text = kind.fixed_text().unwrap();
        assert_eq!(scan_kinds(text), vec![kind], "for text {text:?}");
    }
}

#[test]
fn test_two_char_operators_are_not_split() {
    let kinds = scan_kinds("a<=b != c && d");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessOrEquals,
            SyntaxKind::Identifier,
            SyntaxKind::BangEquals,
            SyntaxKind::Identifier,
            SyntaxKind::AmpersandAmpersand,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_token_spans_cover_source() {
    let (tokens, _) = scan("ab + 12");
    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.length, 2);
    assert_eq!(tokens[1].span.start, 3);
    assert_eq!(tokens[2].span.start, 5);
    assert_eq!(tokens[2].span.length, 2);
}

#[test]
fn test_bad_character_reported_and_dropped() {
    let (tokens, diagnostics) = scan("1 + $ 2");
    let kinds: Vec<SyntaxKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Number,
            SyntaxKind::Plus,
            SyntaxKind::Number,
            SyntaxKind::EndOfFile,
        ]
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.diagnostics()[0].message.contains("Bad character"));
}
