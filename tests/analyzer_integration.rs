//! Integration tests for the tree analyzer over fixture files.
//!
//! These validate the analyzer end-to-end against realistic Python
//! sources in testdata/.

use std::path::PathBuf;

use codecritic::{Analyzer, Issue, IssueSource, Severity};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn analyze_fixture(name: &str) -> Vec<Issue> {
    let source = std::fs::read_to_string(testdata_path().join(name))
        .expect("fixture should be readable");
    Analyzer::new().analyze(&source)
}

#[test]
fn test_clean_fixture_has_no_issues() {
    let issues = analyze_fixture("clean.py");
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[test]
fn test_defects_fixture_finds_all_structural_issues() {
    let issues = analyze_fixture("defects.py");

    // Every AST finding carries ast provenance.
    assert!(issues.iter().all(|i| i.source == IssueSource::Ast));

    // Unused variable, placeholder location 0/0.
    let unused_var = issues
        .iter()
        .find(|i| i.message.contains("'unused_var'"))
        .expect("should flag unused_var");
    assert_eq!((unused_var.line, unused_var.column), (0, 0));
    assert_eq!(unused_var.severity, Severity::Info);
    assert_eq!(unused_var.category, "unused");

    // Unused import, placeholder location line 1.
    let unused_import = issues
        .iter()
        .find(|i| i.message.contains("Imported 'os'"))
        .expect("should flag unused import os");
    assert_eq!((unused_import.line, unused_import.column), (1, 0));

    // if True on line 5.
    let constant = issues
        .iter()
        .find(|i| i.message == "Condition is always True")
        .expect("should flag constant condition");
    assert_eq!(constant.line, 5);
    assert_eq!(constant.severity, Severity::Warning);

    // Statement after return on line 12.
    let unreachable = issues
        .iter()
        .find(|i| i.message.contains("Unreachable code"))
        .expect("should flag unreachable code");
    assert_eq!(unreachable.line, 12);
    assert_eq!(unreachable.severity, Severity::Error);
    assert_eq!(unreachable.category, "logic");

    // Mixed valued/bare returns, reported at the def on line 14.
    let inconsistent = issues
        .iter()
        .find(|i| i.message.contains("inconsistent return"))
        .expect("should flag inconsistent returns");
    assert_eq!(inconsistent.line, 14);
    assert!(inconsistent.message.contains("'inconsistent'"));

    // while True with no break, line 20.
    let infinite = issues
        .iter()
        .find(|i| i.message.contains("Potential infinite loop"))
        .expect("should flag infinite loop");
    assert_eq!(infinite.line, 20);

    // Bare except on line 26.
    let bare = issues
        .iter()
        .find(|i| i.message.contains("Bare except"))
        .expect("should flag bare except");
    assert_eq!(bare.line, 26);
    assert_eq!(bare.category, "best_practice");

    assert_eq!(issues.len(), 7, "full issue list: {:?}", issues);
}

#[test]
fn test_defects_fixture_output_sorted_by_position() {
    let issues = analyze_fixture("defects.py");
    let positions: Vec<(usize, usize)> = issues.iter().map(|i| (i.line, i.column)).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_broken_fixture_yields_single_syntax_issue() {
    let issues = analyze_fixture("broken.py");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Error);
    assert!(
        issues[0].category == "syntax" || issues[0].category == "parsing",
        "unexpected category: {}",
        issues[0].category
    );
    assert!(issues[0].message.starts_with("Syntax error:") || issues[0].message.starts_with("Failed to parse"));
}

#[test]
fn test_analysis_is_idempotent_across_calls() {
    let source = std::fs::read_to_string(testdata_path().join("defects.py")).unwrap();
    let analyzer = Analyzer::new();
    assert_eq!(analyzer.analyze(&source), analyzer.analyze(&source));
}
