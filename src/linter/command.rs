//! External Command Linter
//!
//! Runs a linter executable with the fixture source on stdin and reads its
//! JSON report from stdout.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;

use super::Linter;
use crate::core::Diagnostic;

/// Errors from invoking an external linter
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to start linter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to talk to linter '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("linter '{program}' exited with {status} and no output: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("could not parse output of linter '{program}': {source}")]
    Parse {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Shape of the JSON a linter prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinterFormat {
    /// Array of `{rule_id, line, column, message}` objects
    #[default]
    Native,
    /// `ruff check --output-format json`
    Ruff,
}

#[derive(Debug, Deserialize)]
struct RuffDiagnostic {
    code: Option<String>,
    message: String,
    location: RuffLocation,
}

#[derive(Debug, Deserialize)]
struct RuffLocation {
    row: usize,
    column: usize,
}

impl From<RuffDiagnostic> for Diagnostic {
    fn from(d: RuffDiagnostic) -> Self {
        Diagnostic {
            rule_id: d.code.unwrap_or_else(|| "syntax-error".to_string()),
            line: d.location.row,
            column: d.location.column,
            message: d.message,
        }
    }
}

/// A linter backed by an external program
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLinter {
    program: PathBuf,
    args: Vec<String>,
    format: LinterFormat,
}

impl CommandLinter {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, format: LinterFormat) -> Self {
        Self {
            program: program.into(),
            args,
            format,
        }
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Parse linter stdout according to the configured format
    pub fn parse_output(&self, stdout: &str) -> Result<Vec<Diagnostic>, serde_json::Error> {
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }

        match self.format {
            LinterFormat::Native => serde_json::from_str(stdout),
            LinterFormat::Ruff => {
                let raw: Vec<RuffDiagnostic> = serde_json::from_str(stdout)?;
                Ok(raw.into_iter().map(Diagnostic::from).collect())
            }
        }
    }
}

impl Linter for CommandLinter {
    type Error = LintError;

    fn lint(&self, source: &str) -> Result<Vec<Diagnostic>, LintError> {
        let program = self.program_name();
        log::debug!("running linter '{}' with args {:?}", program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LintError::Spawn {
                program: program.clone(),
                source,
            })?;

        // stdin is written on its own thread while stdout and stderr drain
        let stdin = child.stdin.take();
        let input = source.to_owned();
        let writer = thread::spawn(move || -> io::Result<()> {
            match stdin {
                Some(mut stdin) => match stdin.write_all(input.as_bytes()) {
                    // The linter may exit without reading all of its input
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    result => result,
                },
                None => Ok(()),
            }
        });

        let output = child.wait_with_output().map_err(|source| LintError::Io {
            program: program.clone(),
            source,
        })?;

        writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer thread panicked")))
            .map_err(|source| LintError::Io {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        // Linters commonly exit non-zero when they report findings
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(LintError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        self.parse_output(&stdout)
            .map_err(|source| LintError::Parse { program, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_output() {
        let linter = CommandLinter::new("unused", vec![], LinterFormat::Native);
        let diagnostics = linter
            .parse_output(
                r#"[{"rule_id": "debug-print", "line": 6, "column": 5, "message": "print call"}]"#,
            )
            .expect("parse native output");

        assert_eq!(diagnostics, vec![Diagnostic::new("debug-print", 6, 5, "print call")]);
    }

    #[test]
    fn test_parse_ruff_output() {
        let linter = CommandLinter::new("ruff", vec![], LinterFormat::Ruff);
        let stdout = r#"[
            {
                "code": "F841",
                "message": "Local variable `unused_variable` is assigned to but never used",
                "filename": "-",
                "location": {"row": 4, "column": 5},
                "end_location": {"row": 4, "column": 20}
            },
            {
                "code": null,
                "message": "SyntaxError: Expected an expression",
                "filename": "-",
                "location": {"row": 9, "column": 1},
                "end_location": {"row": 9, "column": 2}
            }
        ]"#;

        let diagnostics = linter.parse_output(stdout).expect("parse ruff output");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule_id, "F841");
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (4, 5));
        assert_eq!(diagnostics[1].rule_id, "syntax-error");
    }

    #[test]
    fn test_empty_output_is_no_diagnostics() {
        let linter = CommandLinter::new("quiet", vec![], LinterFormat::Native);
        assert!(linter.parse_output("  \n").expect("parse").is_empty());
    }

    #[test]
    fn test_malformed_output_is_an_error() {
        let linter = CommandLinter::new("noisy", vec![], LinterFormat::Native);
        assert!(linter.parse_output("All checks passed!").is_err());
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let linter = CommandLinter::new(
            "/nonexistent/lint-fixtures-missing-linter",
            vec![],
            LinterFormat::Native,
        );
        let err = linter.lint("x = 1\n").expect_err("spawn must fail");
        assert!(matches!(err, LintError::Spawn { .. }));
    }
}
