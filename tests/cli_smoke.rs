//! End-to-end runs of the `lint-fixtures` binary
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn run_cli(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lint-fixtures"))
        .args(args)
        .current_dir(workdir)
        // Keep the user's fixture directory out of the run
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run lint-fixtures")
}

#[test]
fn builtin_fixtures_pass_with_builtin_linter() {
    let workdir = TempDir::new().expect("temp dir");
    let output = run_cli(workdir.path(), &["--builtin-fixtures", "--format", "json"]);

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["results"]["python-lint-errors"]["status"], "pass");
    assert_eq!(report["results"]["python-view-handler"]["status"], "pass");
}

#[test]
fn failing_fixture_sets_exit_code() {
    let workdir = TempDir::new().expect("temp dir");
    fs::write(
        workdir.path().join("fixtures.toml"),
        r#"
[[fixture]]
id = "unused-var"
source = "x = 1\n"

[[fixture.expected]]
rule = "unused-variable"
line = 1
column = 1
"#,
    )
    .expect("write fixtures");

    let output = run_cli(workdir.path(), &["fixtures.toml"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("FAIL unused-var"));
    assert!(stdout.contains("missing unused-variable at 1:1"));
    assert!(stdout.contains("1 fixtures: 0 passed, 1 failed"));
}

#[test]
fn project_config_supplies_fixture_dirs() {
    let workdir = TempDir::new().expect("temp dir");
    fs::create_dir_all(workdir.path().join("corpus")).expect("create corpus dir");
    fs::write(
        workdir.path().join("corpus").join("long.toml"),
        r#"
[[fixture]]
id = "long-line"
source = "value = 'abcdefghijklmnopqrstuvwxyz'\n"

[[fixture.expected]]
rule = "line-too-long"
line = 1
column = 21
"#,
    )
    .expect("write fixtures");
    fs::write(
        workdir.path().join("lint-fixtures.toml"),
        "fixture_dirs = [\"corpus\"]\nmax_line_length = 20\n",
    )
    .expect("write project config");

    let output = run_cli(workdir.path(), &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("PASS long-line"));
}

#[test]
fn duplicate_fixture_is_fatal() {
    let workdir = TempDir::new().expect("temp dir");
    fs::write(
        workdir.path().join("dupes.toml"),
        "[[fixture]]\nid = \"python-lint-errors\"\nsource = \"x = 1\\n\"\n",
    )
    .expect("write fixtures");

    let output = run_cli(workdir.path(), &["--builtin-fixtures", "dupes.toml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("already registered"), "stderr: {}", stderr);
}
