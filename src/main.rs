use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use lint_fixtures::config::{Config, LinterChoice, OutputFormat};
use lint_fixtures::watch::{watch_paths, WatchFilter};
use lint_fixtures::{BuiltinLinter, CommandLinter, FixtureRegistry, RunReport};

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and project file
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.project_config_path {
        log::debug!("using project config {}", path.display());
    }

    let first = run_once(&config)?;
    let mut success = first.success;

    if config.watch {
        let filter = WatchFilter::new(tracked_files(&config, &first));
        watch_paths(&watch_targets(&config), filter, |filter| {
            match run_once(&config) {
                Ok(run) => {
                    success = run.success;
                    filter.set_tracked(tracked_files(&config, &run));
                }
                Err(e) => {
                    success = false;
                    log::error!("{:#}", e);
                }
            }
        })?;
    }

    // In watch mode this is the outcome of the last run
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Build a fresh registry from every configured source
fn build_registry(config: &Config) -> Result<FixtureRegistry> {
    let mut registry = FixtureRegistry::new();

    if config.builtin_fixtures {
        registry.add_embedded_fixtures()?;
    }
    for path in &config.fixture_paths {
        registry.load_path(path)?;
    }
    for dir in &config.fixture_dirs {
        registry.load_dir(dir)?;
    }

    if registry.is_empty() {
        log::warn!("no fixtures found; pass fixture paths or --builtin-fixtures");
    }

    Ok(registry)
}

/// Outcome of one load-and-run pass
struct RunSummary {
    /// Every fixture passed
    success: bool,
    /// Source files the fixtures were read from
    source_files: Vec<PathBuf>,
}

/// Load, run and print once
fn run_once(config: &Config) -> Result<RunSummary> {
    let registry = build_registry(config)?;

    let report = match &config.linter {
        LinterChoice::Builtin { max_line_length } => {
            registry.run(&BuiltinLinter::new(*max_line_length))?
        }
        LinterChoice::Command {
            program,
            args,
            format,
        } => {
            let linter = CommandLinter::new(program.clone(), args.clone(), *format);
            registry
                .run(&linter)
                .with_context(|| format!("linter '{}' failed", linter.program_name()))?
        }
    };

    print_report(&report, config.output)?;
    Ok(RunSummary {
        success: report.is_success(),
        source_files: registry.source_files().map(PathBuf::from).collect(),
    })
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn watch_targets(config: &Config) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = config
        .fixture_paths
        .iter()
        .chain(&config.fixture_dirs)
        .cloned()
        .collect();
    targets.extend(config.project_config_path.clone());
    targets
}

/// Non-fixture files whose changes trigger a re-run
fn tracked_files(config: &Config, run: &RunSummary) -> Vec<PathBuf> {
    run.source_files
        .iter()
        .chain(&config.project_config_path)
        .cloned()
        .collect()
}
