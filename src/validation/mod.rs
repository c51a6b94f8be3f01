//! Built-in Linter
//!
//! Line-oriented rules over the tokenized source, independent of fixtures
//! and reporting.

pub mod engine;
pub mod rules;

pub use engine::{lint_document, BuiltinLinter, DEFAULT_MAX_LINE_LENGTH};
