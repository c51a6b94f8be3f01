//! Fixture Registry
//!
//! Explicit in-memory registry, built by the caller and borrowed by each run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;

use super::schema::Fixture;
use crate::core::{Diagnostic, Finding};
use crate::linter::Linter;
use crate::report::{FixtureOutcome, RunReport};

/// Errors raised while registering fixtures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("fixture '{id}' is already registered")]
    DuplicateFixture { id: String },

    #[error("fixture '{id}' expects {finding}, but line numbers start at 1")]
    InvalidExpectation { id: String, finding: Finding },
}

/// Fixtures keyed by identifier, iterated in identifier order
#[derive(Debug, Clone)]
pub struct FixtureRegistry {
    fixtures: BTreeMap<String, Fixture>,
}

impl Default for FixtureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self {
            fixtures: BTreeMap::new(),
        }
    }

    /// Register a fixture from its parts
    pub fn register(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        expected: impl IntoIterator<Item = Finding>,
    ) -> Result<(), RegistryError> {
        self.add(Fixture::new(id, source, expected))
    }

    /// Register a prebuilt fixture. On error the registry is unchanged.
    pub fn add(&mut self, fixture: Fixture) -> Result<(), RegistryError> {
        if self.fixtures.contains_key(fixture.id()) {
            return Err(RegistryError::DuplicateFixture {
                id: fixture.id().to_string(),
            });
        }

        if let Some(finding) = fixture.expected().iter().find(|f| f.line == 0) {
            return Err(RegistryError::InvalidExpectation {
                id: fixture.id().to_string(),
                finding: finding.clone(),
            });
        }

        log::debug!(
            "registered fixture '{}' with {} expected diagnostics",
            fixture.id(),
            fixture.expected().len()
        );
        self.fixtures.insert(fixture.id().to_string(), fixture);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Fixture> {
        self.fixtures.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fixtures.contains_key(id)
    }

    /// Fixture identifiers in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fixtures.keys().map(|s| s.as_str())
    }

    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.values()
    }

    /// Files on disk that fixture sources were read from
    pub fn source_files(&self) -> impl Iterator<Item = &Path> {
        self.fixtures.values().filter_map(|f| f.source_path())
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Lint every fixture and compare against its expectations.
    ///
    /// Mismatches are reported, not raised. The first linter error aborts the
    /// run and is returned as is.
    pub fn run<L: Linter>(&self, linter: &L) -> Result<RunReport, L::Error> {
        let mut report = RunReport::new();

        for fixture in self.fixtures.values() {
            let actual: BTreeSet<Finding> = linter
                .lint(fixture.source())?
                .iter()
                .map(Diagnostic::finding)
                .collect();

            let outcome = FixtureOutcome::compare(fixture.expected(), &actual);
            log::debug!(
                "fixture '{}': {}",
                fixture.id(),
                if outcome.is_pass() { "pass" } else { "fail" }
            );
            report.insert(fixture.id(), outcome);
        }

        log::info!(
            "ran {} fixtures: {} passed, {} failed",
            report.total(),
            report.passed(),
            report.failed()
        );

        Ok(report)
    }
}
