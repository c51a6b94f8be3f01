//! Run Reports
//!
//! Per-fixture outcomes of a run, with text and JSON rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use serde::Serialize;

use crate::core::Finding;

/// Result of checking one fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FixtureOutcome {
    Pass,
    Fail {
        /// Expected but not reported
        missing: BTreeSet<Finding>,
        /// Reported but not expected
        extra: BTreeSet<Finding>,
    },
}

impl FixtureOutcome {
    /// Set comparison of expected against actual findings
    pub fn compare(expected: &BTreeSet<Finding>, actual: &BTreeSet<Finding>) -> Self {
        if expected == actual {
            return FixtureOutcome::Pass;
        }

        FixtureOutcome::Fail {
            missing: expected.difference(actual).cloned().collect(),
            extra: actual.difference(expected).cloned().collect(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, FixtureOutcome::Pass)
    }
}

/// Outcome of every fixture in a run, keyed by fixture identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    results: BTreeMap<String, FixtureOutcome>,
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    passed: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: &'a BTreeMap<String, FixtureOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: &str, outcome: FixtureOutcome) {
        self.results.insert(id.to_string(), outcome);
    }

    pub fn outcome(&self, id: &str) -> Option<&FixtureOutcome> {
        self.results.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FixtureOutcome)> {
        self.results.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.values().filter(|o| o.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Human-readable report, one line per fixture plus a summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for (id, outcome) in &self.results {
            match outcome {
                FixtureOutcome::Pass => {
                    let _ = writeln!(out, "PASS {}", id);
                }
                FixtureOutcome::Fail { missing, extra } => {
                    let _ = writeln!(out, "FAIL {}", id);
                    for finding in missing {
                        let _ = writeln!(out, "  missing {}", finding);
                    }
                    for finding in extra {
                        let _ = writeln!(out, "  extra   {}", finding);
                    }
                }
            }
        }

        let _ = writeln!(
            out,
            "\n{} fixtures: {} passed, {} failed",
            self.total(),
            self.passed(),
            self.failed()
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            summary: Summary {
                total: self.total(),
                passed: self.passed(),
                failed: self.failed(),
            },
            results: &self.results,
        })
    }
}
