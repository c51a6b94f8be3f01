//! Diagnostics
//!
//! A [`Diagnostic`] is what a linter reports. A [`Finding`] is the part of it
//! that fixture expectations are written against: rule, line and column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The comparable identity of a diagnostic (rule id, line, column)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub line: usize,
    pub column: usize,
}

impl Finding {
    pub fn new(rule_id: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            rule_id: rule_id.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.rule_id, self.line, self.column)
    }
}

/// A single finding reported by a linter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    /// 1-based line number
    pub line: usize,
    pub column: usize,
    #[serde(default)]
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Drop the message, keeping what expectations are compared by
    pub fn finding(&self) -> Finding {
        Finding::new(self.rule_id.clone(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_ignores_message() {
        let a = Diagnostic::new("debug-print", 3, 5, "print found");
        let b = Diagnostic::new("debug-print", 3, 5, "different wording");
        assert_ne!(a, b);
        assert_eq!(a.finding(), b.finding());
    }

    #[test]
    fn test_finding_ordering() {
        let mut findings = vec![
            Finding::new("b-rule", 1, 1),
            Finding::new("a-rule", 2, 1),
            Finding::new("a-rule", 1, 7),
        ];
        findings.sort();
        assert_eq!(findings[0], Finding::new("a-rule", 1, 7));
        assert_eq!(findings[1], Finding::new("a-rule", 2, 1));
        assert_eq!(findings[2], Finding::new("b-rule", 1, 1));
    }

    #[test]
    fn test_diagnostic_message_defaults_when_missing() {
        let diagnostic: Diagnostic =
            serde_json::from_str(r#"{"rule_id": "unused-variable", "line": 4, "column": 5}"#)
                .expect("parse diagnostic");
        assert_eq!(diagnostic.message, "");
        assert_eq!(diagnostic.finding().to_string(), "unused-variable at 4:5");
    }
}
