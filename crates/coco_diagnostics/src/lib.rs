//! coco_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! A diagnostic is a (span, message) pair. There are no severity levels:
//! any non-empty diagnostic set blocks progression to the next pipeline
//! stage. The `DiagnosticBag` exposes one `report_*` method per diagnosable
//! condition so that message wording lives in exactly one place.

use coco_core::text::TextSpan;
use std::fmt;

/// A realized diagnostic with location information and message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The source text span where this diagnostic occurred.
    pub span: TextSpan,
    /// The resolved message text.
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// An append-only collection of diagnostics accumulated during one
/// pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, span: TextSpan, message: String) {
        self.diagnostics.push(Diagnostic::new(span, message));
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn extend_from_slice(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostics.extend_from_slice(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    // ========================================================================
    // Scanner errors
    // ========================================================================

    pub fn report_bad_character(&mut self, position: u32, character: char) {
        let span = TextSpan::new(position, character.len_utf8() as u32);
        self.report(span, format!("Bad character input: '{character}'."));
    }

    pub fn report_invalid_number(&mut self, span: TextSpan, text: &str, type_name: &str) {
        self.report(span, format!("The number '{text}' isn't a valid {type_name}."));
    }

    pub fn report_unterminated_string(&mut self, span: TextSpan) {
        self.report(span, "Unterminated string literal.".to_string());
    }

    // ========================================================================
    // Parser errors
    // ========================================================================

    pub fn report_unexpected_token(&mut self, span: TextSpan, actual: &str, expected: &str) {
        self.report(
            span,
            format!("Unexpected token <{actual}>, expected <{expected}>."),
        );
    }

    // ========================================================================
    // Binder errors
    // ========================================================================

    pub fn report_undefined_name(&mut self, span: TextSpan, name: &str) {
        self.report(span, format!("Variable '{name}' doesn't exist."));
    }

    pub fn report_undefined_type(&mut self, span: TextSpan, name: &str) {
        self.report(span, format!("Type '{name}' doesn't exist."));
    }

    pub fn report_undefined_function(&mut self, span: TextSpan, name: &str) {
        self.report(span, format!("Function '{name}' doesn't exist."));
    }

    pub fn report_undefined_unary_operator(
        &mut self,
        span: TextSpan,
        operator: &str,
        operand_type: impl fmt::Display,
    ) {
        self.report(
            span,
            format!("Unary operator '{operator}' is not defined for type '{operand_type}'."),
        );
    }

    pub fn report_undefined_binary_operator(
        &mut self,
        span: TextSpan,
        operator: &str,
        left_type: impl fmt::Display,
        right_type: impl fmt::Display,
    ) {
        self.report(
            span,
            format!(
                "Binary operator '{operator}' is not defined for types '{left_type}' and '{right_type}'."
            ),
        );
    }

    pub fn report_symbol_already_declared(&mut self, span: TextSpan, name: &str) {
        self.report(span, format!("'{name}' is already declared."));
    }

    pub fn report_parameter_already_declared(&mut self, span: TextSpan, name: &str) {
        self.report(
            span,
            format!("A parameter with the name '{name}' already exists."),
        );
    }

    pub fn report_cannot_convert(
        &mut self,
        span: TextSpan,
        from_type: impl fmt::Display,
        to_type: impl fmt::Display,
    ) {
        self.report(
            span,
            format!("Cannot convert type '{from_type}' to '{to_type}'."),
        );
    }

    pub fn report_cannot_convert_implicitly(
        &mut self,
        span: TextSpan,
        from_type: impl fmt::Display,
        to_type: impl fmt::Display,
    ) {
        self.report(
            span,
            format!(
                "Cannot convert type '{from_type}' to '{to_type}'. An explicit conversion exists (are you missing a cast?)"
            ),
        );
    }

    pub fn report_cannot_assign(&mut self, span: TextSpan, name: &str) {
        self.report(
            span,
            format!("Variable '{name}' is read-only and cannot be assigned to."),
        );
    }

    pub fn report_wrong_argument_count(
        &mut self,
        span: TextSpan,
        name: &str,
        expected: usize,
        actual: usize,
    ) {
        self.report(
            span,
            format!("Function '{name}' requires {expected} arguments but was given {actual}."),
        );
    }

    pub fn report_wrong_argument_type(
        &mut self,
        span: TextSpan,
        parameter_name: &str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) {
        self.report(
            span,
            format!(
                "Parameter '{parameter_name}' requires a value of type '{expected}' but was given a value of type '{actual}'."
            ),
        );
    }

    pub fn report_expression_must_have_value(&mut self, span: TextSpan) {
        self.report(span, "Expression must have a value.".to_string());
    }

    pub fn report_invalid_break_or_continue(&mut self, span: TextSpan, keyword: &str) {
        self.report(
            span,
            format!("The keyword '{keyword}' can only be used inside of loops."),
        );
    }

    pub fn report_invalid_return(&mut self, span: TextSpan) {
        self.report(
            span,
            "The 'return' keyword can only be used inside of functions.".to_string(),
        );
    }

    pub fn report_invalid_return_expression(&mut self, span: TextSpan, function_name: &str) {
        self.report(
            span,
            format!(
                "Since the function '{function_name}' does not return a value the 'return' keyword cannot be followed by an expression."
            ),
        );
    }

    pub fn report_missing_return_expression(
        &mut self,
        span: TextSpan,
        return_type: impl fmt::Display,
    ) {
        self.report(
            span,
            format!("An expression of type '{return_type}' is expected."),
        );
    }

    pub fn report_all_paths_must_return(&mut self, span: TextSpan) {
        self.report(
            span,
            "Not all code paths return a value.".to_string(),
        );
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_starts_empty() {
        let bag = DiagnosticBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.len(), 0);
    }

    #[test]
    fn test_report_attaches_span() {
        let mut bag = DiagnosticBag::new();
        bag.report_undefined_name(TextSpan::new(4, 3), "foo");
        assert_eq!(bag.len(), 1);
        let diag = &bag.diagnostics()[0];
        assert_eq!(diag.span, TextSpan::new(4, 3));
        assert!(diag.message.contains("foo"));
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = DiagnosticBag::new();
        first.report_undefined_name(TextSpan::new(0, 1), "a");
        let mut second = DiagnosticBag::new();
        second.report_undefined_name(TextSpan::new(2, 1), "b");
        first.extend(second);
        assert_eq!(first.len(), 2);
        assert!(first.diagnostics()[0].message.contains("'a'"));
        assert!(first.diagnostics()[1].message.contains("'b'"));
    }
}
