//! Lint Fixtures
//!
//! Check a linter against a corpus of source fixtures with known diagnostics.
//!
//! This library provides:
//! - A fixture registry with set-based expected/actual comparison
//! - A linter capability trait, with an external-command implementation
//! - A small built-in linter for Python-like sources
//! - Fixture file loading and configuration management

pub mod config;
pub mod core;
pub mod fixture;
pub mod linter;
pub mod parser;
pub mod report;
pub mod validation;
pub mod watch;

// Re-exports for clean public API
pub use config::Config;
pub use crate::core::{Diagnostic, Finding};
pub use fixture::{Fixture, FixtureRegistry, RegistryError};
pub use linter::{CommandLinter, LintError, Linter, LinterFormat};
pub use report::{FixtureOutcome, RunReport};
pub use validation::{lint_document, BuiltinLinter};
