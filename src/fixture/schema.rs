//! Fixture Schema Types
//!
//! The TOML shape of fixture files and the runtime [`Fixture`] built from it.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::core::Finding;

/// Root fixture file structure (matches TOML)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FixtureFile {
    #[serde(rename = "fixture", default)]
    pub fixtures: Vec<FixtureDef>,
}

/// One `[[fixture]]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FixtureDef {
    pub id: String,
    pub description: Option<String>,
    /// Inline source text
    pub source: Option<String>,
    /// Source file, relative to the fixture file
    pub source_file: Option<PathBuf>,
    #[serde(default)]
    pub expected: Vec<ExpectedDef>,
}

/// One `[[fixture.expected]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExpectedDef {
    pub rule: String,
    pub line: usize,
    pub column: usize,
}

impl From<ExpectedDef> for Finding {
    fn from(def: ExpectedDef) -> Self {
        Finding::new(def.rule, def.line, def.column)
    }
}

/// A registered fixture. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    id: String,
    description: Option<String>,
    source: String,
    /// File the source was read from, if it came from disk
    source_path: Option<PathBuf>,
    expected: BTreeSet<Finding>,
}

impl Fixture {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        expected: impl IntoIterator<Item = Finding>,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            source: source.into(),
            source_path: None,
            expected: expected.into_iter().collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn expected(&self) -> &BTreeSet<Finding> {
        &self.expected
    }
}
