//! Configuration management for the fixture runner.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`lint-fixtures.toml`)
//! - Fixture directory discovery
//!
//! Command-line values win over the project file, which wins over defaults.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::linter::LinterFormat;
use crate::validation::DEFAULT_MAX_LINE_LENGTH;

/// Name of the project configuration file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "lint-fixtures.toml";

/// Command-line arguments for the fixture runner
#[derive(Debug, Parser)]
#[command(name = "lint-fixtures")]
#[command(about = "Check a linter against fixtures with known diagnostics")]
#[command(version)]
pub struct Args {
    /// Fixture files or directories
    #[arg(value_name = "PATH")]
    pub fixtures: Vec<PathBuf>,

    /// Include the fixtures compiled into the binary
    #[arg(long)]
    pub builtin_fixtures: bool,

    /// External linter executable; the built-in linter is used when unset
    #[arg(long, value_name = "PROGRAM")]
    pub linter_cmd: Option<PathBuf>,

    /// Argument passed to the external linter (repeatable)
    #[arg(long = "linter-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub linter_args: Vec<String>,

    /// Output format of the external linter
    #[arg(long, value_enum)]
    pub linter_format: Option<LinterFormat>,

    /// Line length limit for the built-in linter
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Re-run whenever fixture files or their sources change. The exit
    /// status is that of the last run.
    #[arg(long)]
    pub watch: bool,

    /// Project configuration file
    #[arg(long, value_name = "FILE", help = "Project config (default: ./lint-fixtures.toml)")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// How the run report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Project configuration file structure (matches TOML)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub fixture_dirs: Vec<PathBuf>,
    pub max_line_length: Option<usize>,
    pub linter: Option<ProjectLinter>,
}

/// `[linter]` table of the project configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectLinter {
    pub command: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub format: LinterFormat,
}

/// Which linter a run uses
#[derive(Debug, Clone, PartialEq)]
pub enum LinterChoice {
    Builtin {
        max_line_length: usize,
    },
    Command {
        program: PathBuf,
        args: Vec<String>,
        format: LinterFormat,
    },
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixture files and directories named explicitly
    pub fixture_paths: Vec<PathBuf>,
    /// Directories searched only if they exist
    pub fixture_dirs: Vec<PathBuf>,
    pub builtin_fixtures: bool,
    pub linter: LinterChoice,
    pub output: OutputFormat,
    pub watch: bool,
    pub log_level: String,
    /// Project config that was loaded, if any
    pub project_config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let project_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = std::env::current_dir()?.join(PROJECT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };

        let project = match &project_path {
            Some(path) => load_project_config(path)?,
            None => ProjectConfig::default(),
        };

        Ok(Self::merge(args, project, project_path))
    }

    /// Layer command-line arguments over a project configuration
    pub fn merge(args: Args, project: ProjectConfig, project_path: Option<PathBuf>) -> Self {
        let project_dir = project_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut fixture_paths = args.fixtures;
        fixture_paths.extend(project.fixture_dirs.iter().map(|dir| project_dir.join(dir)));

        // Add default user config directory
        let mut fixture_dirs = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            fixture_dirs.push(config_dir.join("lint-fixtures").join("fixtures"));
        }

        let linter = match (args.linter_cmd, project.linter) {
            (Some(program), project_linter) => LinterChoice::Command {
                program,
                args: args.linter_args,
                format: args
                    .linter_format
                    .or(project_linter.map(|l| l.format))
                    .unwrap_or_default(),
            },
            (None, Some(project_linter)) => LinterChoice::Command {
                program: project_linter.command,
                args: if args.linter_args.is_empty() {
                    project_linter.args
                } else {
                    args.linter_args
                },
                format: args.linter_format.unwrap_or(project_linter.format),
            },
            (None, None) => LinterChoice::Builtin {
                max_line_length: args
                    .max_line_length
                    .or(project.max_line_length)
                    .unwrap_or(DEFAULT_MAX_LINE_LENGTH),
            },
        };

        Config {
            fixture_paths,
            fixture_dirs,
            builtin_fixtures: args.builtin_fixtures,
            linter,
            output: args.format,
            watch: args.watch,
            log_level: args.log_level,
            project_config_path: project_path,
        }
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }
}

/// Read and parse a project configuration file
pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project config: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse project config: {}", path.display()))
}
