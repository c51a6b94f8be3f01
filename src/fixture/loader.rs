//! Fixture Loading
//!
//! Fixture files are TOML with one or more `[[fixture]]` tables. A directory
//! is loaded non-recursively, `*.toml` files in path order.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::annotations::parse_expectations;
use super::registry::FixtureRegistry;
use super::schema::{Fixture, FixtureDef, FixtureFile};
use crate::core::Finding;

/// Extension of fixture files inside a fixture directory
pub const FIXTURE_FILE_EXTENSION: &str = "toml";

/// Corpus compiled into the binary
const EMBEDDED_FIXTURES: &str = include_str!("../../resources/fixtures/python.toml");

/// Parse fixture file content
pub fn parse_fixture_file(content: &str) -> Result<FixtureFile, toml::de::Error> {
    toml::from_str(content)
}

/// Whether a path looks like a fixture file
pub fn is_fixture_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(FIXTURE_FILE_EXTENSION)
}

/// Build a runtime fixture, reading `source_file` relative to `base_dir`
fn resolve_fixture(def: FixtureDef, base_dir: Option<&Path>) -> Result<Fixture> {
    let (source, source_path) = match (def.source, &def.source_file, base_dir) {
        (Some(source), None, _) => (source, None),
        (None, Some(file), Some(base)) => {
            let path = base.join(file);
            let source = std::fs::read_to_string(&path).with_context(|| {
                format!(
                    "Failed to read source of fixture '{}': {}",
                    def.id,
                    path.display()
                )
            })?;
            (source, Some(path))
        }
        (None, Some(_), None) => {
            bail!("fixture '{}' uses `source_file` outside of a fixture file", def.id)
        }
        _ => bail!(
            "fixture '{}' must set exactly one of `source` or `source_file`",
            def.id
        ),
    };

    let mut expected: Vec<Finding> = def.expected.into_iter().map(Finding::from).collect();
    expected.extend(parse_expectations(&source));

    let mut fixture = Fixture::new(def.id, source, expected);
    if let Some(description) = def.description {
        fixture = fixture.with_description(description);
    }
    if let Some(path) = source_path {
        fixture = fixture.with_source_path(path);
    }
    Ok(fixture)
}

impl FixtureRegistry {
    /// Register every fixture in TOML content; returns how many were added
    fn load_str(&mut self, content: &str, origin: &str, base_dir: Option<&Path>) -> Result<usize> {
        let file = parse_fixture_file(content)
            .with_context(|| format!("Failed to parse fixture TOML: {}", origin))?;

        let fixtures = file
            .fixtures
            .into_iter()
            .map(|def| resolve_fixture(def, base_dir))
            .collect::<Result<Vec<_>>>()?;

        let count = fixtures.len();
        for fixture in fixtures {
            self.add(fixture)
                .with_context(|| format!("Failed to register fixtures from {}", origin))?;
        }

        log::debug!("loaded {} fixtures from {}", count, origin);
        Ok(count)
    }

    /// Load a single fixture file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;

        self.load_str(&content, &path.display().to_string(), path.parent())
    }

    /// Load every fixture file in a directory. A missing directory loads nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            log::debug!("fixture directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read fixture directory: {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()
            .with_context(|| format!("Failed to read fixture directory: {}", dir.display()))?;
        paths.sort();

        let mut count = 0;
        for path in paths.iter().filter(|p| p.is_file() && is_fixture_file(p)) {
            count += self.load_file(path)?;
        }
        Ok(count)
    }

    /// Load a fixture file or directory given by the user
    pub fn load_path(&mut self, path: &Path) -> Result<usize> {
        if path.is_dir() {
            self.load_dir(path)
        } else if path.is_file() {
            self.load_file(path)
        } else {
            bail!("fixture path does not exist: {}", path.display())
        }
    }

    /// Add the corpus shipped with the crate
    pub fn add_embedded_fixtures(&mut self) -> Result<usize> {
        self.load_str(EMBEDDED_FIXTURES, "embedded fixtures", None)
    }
}
