//! Core Types
//!
//! Diagnostics as produced by linters and the findings they are compared by.

pub mod diagnostics;

pub use diagnostics::{Diagnostic, Finding};
