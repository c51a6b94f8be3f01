//! Fixture runs against in-memory linters and the built-in linter
use lint_fixtures::{
    BuiltinLinter, Diagnostic, Finding, FixtureOutcome, FixtureRegistry, Linter, RegistryError,
};
use std::collections::BTreeSet;

/// Reports nothing
struct NoDiagnostics;

impl Linter for NoDiagnostics {
    type Error = std::convert::Infallible;

    fn lint(&self, _source: &str) -> Result<Vec<Diagnostic>, Self::Error> {
        Ok(Vec::new())
    }
}

/// Reports a fixed list, duplicates included
struct Canned(Vec<Diagnostic>);

impl Linter for Canned {
    type Error = std::convert::Infallible;

    fn lint(&self, _source: &str) -> Result<Vec<Diagnostic>, Self::Error> {
        Ok(self.0.clone())
    }
}

fn unused_var_registry() -> FixtureRegistry {
    let mut registry = FixtureRegistry::new();
    registry
        .register(
            "unused-var",
            "x = 1\n",
            vec![Finding::new("unused-variable", 1, 1)],
        )
        .expect("register unused-var");
    registry
}

#[test]
fn test_missing_diagnostic_is_reported() {
    let report = unused_var_registry().run(&NoDiagnostics).expect("run");

    let expected_missing: BTreeSet<Finding> =
        [Finding::new("unused-variable", 1, 1)].into_iter().collect();
    assert_eq!(
        report.outcome("unused-var"),
        Some(&FixtureOutcome::Fail {
            missing: expected_missing,
            extra: BTreeSet::new(),
        })
    );
    assert!(!report.is_success());
}

#[test]
fn test_exact_match_passes_regardless_of_message_and_duplicates() {
    let linter = Canned(vec![
        Diagnostic::new("unused-variable", 1, 1, "x is unused"),
        Diagnostic::new("unused-variable", 1, 1, "reported twice"),
    ]);

    let report = unused_var_registry().run(&linter).expect("run");
    assert_eq!(report.outcome("unused-var"), Some(&FixtureOutcome::Pass));
    assert!(report.is_success());
}

#[test]
fn test_one_entry_per_fixture() {
    let mut registry = FixtureRegistry::new();
    for id in ["c", "a", "b"] {
        registry
            .register(id, format!("{} = 1\n", id), vec![])
            .expect("register");
    }

    let report = registry.run(&NoDiagnostics).expect("run");
    let ids: Vec<&str> = report.iter().map(|(id, _)| id).collect();

    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(report.total(), registry.len());
}

#[test]
fn test_runs_are_idempotent() {
    let mut registry = FixtureRegistry::new();
    registry
        .add_embedded_fixtures()
        .expect("load embedded fixtures");
    registry
        .register("extra", "print('hi')\n", vec![])
        .expect("register extra");

    let linter = BuiltinLinter::default();
    let first = registry.run(&linter).expect("first run");
    let second = registry.run(&linter).expect("second run");

    assert_eq!(first, second);
    assert_eq!(first.render_text(), second.render_text());
}

#[test]
fn test_duplicate_identifier_is_rejected() {
    let mut registry = unused_var_registry();
    let err = registry
        .register("unused-var", "y = 2\n", vec![])
        .expect_err("duplicate must fail");

    assert_eq!(
        err,
        RegistryError::DuplicateFixture {
            id: "unused-var".to_string()
        }
    );
    assert_eq!(err.to_string(), "fixture 'unused-var' is already registered");
}

#[test]
fn test_embedded_corpus_passes_with_builtin_linter() {
    let mut registry = FixtureRegistry::new();
    registry
        .add_embedded_fixtures()
        .expect("load embedded fixtures");

    let report = registry.run(&BuiltinLinter::default()).expect("run");
    assert!(report.is_success(), "{}", report.render_text());
    assert_eq!(report.passed(), registry.len());
}

#[test]
fn test_builtin_linter_reports_extra_findings() {
    let mut registry = FixtureRegistry::new();
    registry
        .register(
            "debug-only",
            "def f():\n    value=1\n    print(value)\n",
            vec![Finding::new("debug-print", 3, 5)],
        )
        .expect("register");

    let report = registry.run(&BuiltinLinter::default()).expect("run");

    match report.outcome("debug-only") {
        Some(FixtureOutcome::Fail { missing, extra }) => {
            assert!(missing.is_empty());
            assert_eq!(
                extra.iter().collect::<Vec<_>>(),
                vec![&Finding::new("missing-whitespace-around-operator", 2, 10)]
            );
        }
        other => panic!("expected failure, got {:?}", other),
    }
}
