//! Inline Expectations
//!
//! Fixture sources may carry their own expectations in comments:
//!
//! ```text
//! x=1  # lint-expect: missing-whitespace-around-operator at 2
//! # lint-expect: line-too-long at 12:89
//! ```
//!
//! `at <column>` refers to the line the directive is on, `at <line>:<column>`
//! to any line.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Finding;

static EXPECT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"lint-expect:\s*([A-Za-z0-9_./-]+)\s+at\s+(?:(\d+):)?(\d+)")
        .expect("valid lint-expect regex")
});

/// Collect every `lint-expect:` directive in a source text
pub fn parse_expectations(source: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        for captures in EXPECT_DIRECTIVE.captures_iter(line) {
            let line_number = match captures.get(2) {
                Some(m) => m.as_str().parse::<usize>(),
                None => Ok(idx + 1),
            };
            let column = captures[3].parse::<usize>();

            match (line_number, column) {
                (Ok(line_number), Ok(column)) => {
                    findings.push(Finding::new(&captures[1], line_number, column));
                }
                _ => log::warn!(
                    "ignoring out-of-range lint-expect directive on line {}: {}",
                    idx + 1,
                    &captures[0]
                ),
            }
        }
    }

    findings
}
