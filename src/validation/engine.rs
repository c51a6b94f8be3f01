//! Validation Engine
//!
//! Runs every built-in rule over a document. Separate from fixtures and
//! reporting; the fixture registry only sees it through [`Linter`].

use std::convert::Infallible;

use crate::core::Diagnostic;
use crate::linter::Linter;
use crate::parser::{tokenize_document, LexedLine};
use crate::validation::rules;

/// Line length limit when none is configured
pub const DEFAULT_MAX_LINE_LENGTH: usize = 88;

/// The linter that ships with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinLinter {
    max_line_length: usize,
}

impl Default for BuiltinLinter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl BuiltinLinter {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}

impl Linter for BuiltinLinter {
    type Error = Infallible;

    fn lint(&self, source: &str) -> Result<Vec<Diagnostic>, Infallible> {
        Ok(lint_document(source, self.max_line_length))
    }
}

/// Run the per-line rules on one line
pub fn lint_line(line: &LexedLine<'_>, max_line_length: usize, out: &mut Vec<Diagnostic>) {
    rules::check_line_length(line, max_line_length, out);
    rules::check_trailing_whitespace(line, out);
    rules::check_debug_print(line, out);
    rules::check_operator_whitespace(line, out);
    rules::check_comma_whitespace(line, out);
    rules::check_shadowed_builtin(line, out);
}

/// Lint an entire document, diagnostics ordered by position
pub fn lint_document(content: &str, max_line_length: usize) -> Vec<Diagnostic> {
    let lines = tokenize_document(content);
    let mut diagnostics = Vec::new();

    for line in &lines {
        lint_line(line, max_line_length, &mut diagnostics);
    }
    rules::check_unused_variables(&lines, &mut diagnostics);

    // Nested functions are scanned once per enclosing body
    diagnostics.sort_by(|a, b| {
        (a.line, a.column, &a.rule_id).cmp(&(b.line, b.column, &b.rule_id))
    });
    diagnostics.dedup();

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Finding;

    fn findings(source: &str) -> Vec<Finding> {
        lint_document(source, DEFAULT_MAX_LINE_LENGTH)
            .iter()
            .map(Diagnostic::finding)
            .collect()
    }

    #[test]
    fn test_clean_source() {
        let source = "\
def add(a, b):
    total = a + b
    return total
";
        assert!(findings(source).is_empty());
    }

    #[test]
    fn test_diagnostics_are_ordered() {
        let source = "\
def f():
    list=[1,2]
";
        assert_eq!(
            findings(source),
            vec![
                Finding::new(rules::SHADOWED_BUILTIN, 2, 5),
                Finding::new(rules::UNUSED_VARIABLE, 2, 5),
                Finding::new(rules::MISSING_WHITESPACE_AROUND_OPERATOR, 2, 9),
                Finding::new(rules::MISSING_WHITESPACE_AFTER_COMMA, 2, 12),
            ]
        );
    }

    #[test]
    fn test_nested_function_reported_once() {
        let source = "\
def outer():
    def inner():
        leftover = 1
    return inner
";
        assert_eq!(
            findings(source),
            vec![Finding::new(rules::UNUSED_VARIABLE, 3, 9)]
        );
    }

    #[test]
    fn test_builtin_linter_respects_line_length() {
        let linter = BuiltinLinter::new(20);
        let diagnostics = linter
            .lint("short = 1\nthis_line_is_definitely_long = 1\n")
            .expect("built-in linter never fails");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, rules::LINE_TOO_LONG);
        assert_eq!(diagnostics[0].column, 21);
    }

    #[test]
    fn test_default_line_length() {
        assert_eq!(BuiltinLinter::default().max_line_length(), 88);
    }
}
