//! The scanner.
//!
//! Converts source text into a stream of tokens the parser consumes.
//! Unknown characters and malformed literals are reported as diagnostics;
//! the scanner never fails, it always produces a token stream ending in
//! an end-of-file token.

use coco_ast::syntax_kind::SyntaxKind;
use coco_ast::token::{Token, TokenValue};
use coco_core::text::TextSpan;
use coco_diagnostics::DiagnosticBag;

/// The scanner converts source text into tokens.
pub struct Scanner<'a> {
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticBag,
}

/// Scan the whole text into a token vector ending with an end-of-file
/// token, plus the diagnostics produced along the way.
pub fn scan(text: &str) -> (Vec<Token>, DiagnosticBag) {
    let mut scanner = Scanner::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let done = token.kind == SyntaxKind::EndOfFile;
        // Bad tokens are reported as diagnostics and dropped from the
        // stream so the parser only ever sees well-formed kinds.
        if token.kind != SyntaxKind::Bad {
            tokens.push(token);
        }
        if done {
            break;
        }
    }
    (tokens, scanner.take_diagnostics())
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    /// Scan the next token. Returns an end-of-file token at the end of
    /// the text, forever after.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let Some(current) = self.peek(0) else {
            return Token::new(SyntaxKind::EndOfFile, TextSpan::empty(start as u32), "");
        };

        match current {
            '0'..='9' => self.scan_number(start),
            '"' => self.scan_string(start),
            c if is_identifier_start(c) => self.scan_identifier(start),
            '+' => self.punctuation(start, SyntaxKind::Plus, 1),
            '-' => self.punctuation(start, SyntaxKind::Minus, 1),
            '*' => self.punctuation(start, SyntaxKind::Star, 1),
            '/' => self.punctuation(start, SyntaxKind::Slash, 1),
            '(' => self.punctuation(start, SyntaxKind::OpenParen, 1),
            ')' => self.punctuation(start, SyntaxKind::CloseParen, 1),
            '{' => self.punctuation(start, SyntaxKind::OpenBrace, 1),
            '}' => self.punctuation(start, SyntaxKind::CloseBrace, 1),
            ':' => self.punctuation(start, SyntaxKind::Colon, 1),
            ',' => self.punctuation(start, SyntaxKind::Comma, 1),
            '~' => self.punctuation(start, SyntaxKind::Tilde, 1),
            '^' => self.punctuation(start, SyntaxKind::Hat, 1),
            '&' => {
                if self.peek(1) == Some('&') {
                    self.punctuation(start, SyntaxKind::AmpersandAmpersand, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Ampersand, 1)
                }
            }
            '|' => {
                if self.peek(1) == Some('|') {
                    self.punctuation(start, SyntaxKind::PipePipe, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Pipe, 1)
                }
            }
            '=' => {
                if self.peek(1) == Some('=') {
                    self.punctuation(start, SyntaxKind::EqualsEquals, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Equals, 1)
                }
            }
            '!' => {
                if self.peek(1) == Some('=') {
                    self.punctuation(start, SyntaxKind::BangEquals, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Bang, 1)
                }
            }
            '<' => {
                if self.peek(1) == Some('=') {
                    self.punctuation(start, SyntaxKind::LessOrEquals, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Less, 1)
                }
            }
            '>' => {
                if self.peek(1) == Some('=') {
                    self.punctuation(start, SyntaxKind::GreaterOrEquals, 2)
                } else {
                    self.punctuation(start, SyntaxKind::Greater, 1)
                }
            }
            other => {
                self.diagnostics.report_bad_character(start as u32, other);
                self.pos += other.len_utf8();
                let text = &self.text[start..self.pos];
                Token::new(
                    SyntaxKind::Bad,
                    TextSpan::from_bounds(start as u32, self.pos as u32),
                    text,
                )
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn punctuation(&mut self, start: usize, kind: SyntaxKind, len: usize) -> Token {
        self.pos += len;
        Token::new(
            kind,
            TextSpan::from_bounds(start as u32, self.pos as u32),
            &self.text[start..self.pos],
        )
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while matches!(self.peek(0), Some('0'..='9')) {
            self.pos += 1;
        }
        let text = &self.text[start..self.pos];
        let span = TextSpan::from_bounds(start as u32, self.pos as u32);
        let value = match text.parse::<i64>() {
            Ok(value) => value,
            Err(_) => {
                // Digits only, so the sole failure mode is overflow.
                self.diagnostics.report_invalid_number(span, text, "int");
                0
            }
        };
        Token::new(SyntaxKind::Number, span, text).with_value(TokenValue::Int(value))
    }

    fn scan_string(&mut self, start: usize) -> Token {
        // Skip the opening quote. A doubled quote inside the literal is
        // an escaped quote character.
        self.pos += 1;
        let mut value = String::new();
        let mut terminated = false;
        while let Some(c) = self.peek(0) {
            match c {
                '"' => {
                    if self.peek(1) == Some('"') {
                        value.push('"');
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        terminated = true;
                        break;
                    }
                }
                '\r' | '\n' => break,
                _ => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        let span = TextSpan::from_bounds(start as u32, self.pos as u32);
        if !terminated {
            self.diagnostics.report_unterminated_string(span);
        }
        Token::new(SyntaxKind::String, span, &self.text[start..self.pos])
            .with_value(TokenValue::String(value))
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while matches!(self.peek(0), Some(c) if is_identifier_part(c)) {
            self.pos += 1;
        }
        let text = &self.text[start..self.pos];
        let span = TextSpan::from_bounds(start as u32, self.pos as u32);
        let kind = SyntaxKind::keyword(text).unwrap_or(SyntaxKind::Identifier);
        Token::new(kind, span, text)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
