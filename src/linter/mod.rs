//! Linter Capability
//!
//! The one operation a fixture run needs from a linter under test.

pub mod command;

pub use command::{CommandLinter, LintError, LinterFormat};

use crate::core::Diagnostic;

/// A linter that can be run against fixture sources.
///
/// Errors are the linter's own; a fixture run hands them back untouched.
pub trait Linter {
    type Error;

    fn lint(&self, source: &str) -> Result<Vec<Diagnostic>, Self::Error>;
}

impl<L: Linter + ?Sized> Linter for &L {
    type Error = L::Error;

    fn lint(&self, source: &str) -> Result<Vec<Diagnostic>, Self::Error> {
        (**self).lint(source)
    }
}
