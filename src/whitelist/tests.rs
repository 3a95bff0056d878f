//! Tests for whitelist parsing and filtering.

use super::*;
use crate::bundle::{object_count, parse};
use crate::diagnostics::Severity;
use crate::test_support::bundle_text;
use tempfile::TempDir;

fn label_map(labels: &[&str]) -> LabelMap {
    let text = bundle_text(labels);
    let mut diags = Diagnostics::new();
    parse(text.lines(), "test", &mut diags)
}

#[test]
fn test_parse_strips_comments_and_blank_lines() {
    let whitelist = Whitelist::parse(
        "# header comment\n\nGlobalSign *\nDigiCert *   # trailing comment\n   \n  ISRG Root X1  \n",
    )
    .unwrap();

    assert_eq!(
        whitelist.patterns(),
        &["GlobalSign *", "DigiCert *", "ISRG Root X1"]
    );
}

#[test]
fn test_hash_inside_pattern_is_kept() {
    let whitelist = Whitelist::parse("CA#1\n").unwrap();
    assert_eq!(whitelist.patterns(), &["CA#1"]);
}

#[test]
fn test_invalid_pattern_is_config_error() {
    let err = Whitelist::from_patterns(["[z-a] Root CA"]).unwrap_err();
    assert!(matches!(err, TrustError::ConfigError(_)));
}

#[test]
fn test_braces_are_literal() {
    let whitelist = Whitelist::from_patterns(["Foo {Bar}", "Set {a,b}*"]).unwrap();

    assert_eq!(whitelist.first_match("Foo {Bar}"), Some(0));
    assert_eq!(whitelist.first_match("Foo Bar"), None);
    assert_eq!(whitelist.first_match("Set {a,b} Root"), Some(1));
    assert_eq!(whitelist.first_match("Set a Root"), None);
}

#[test]
fn test_backslash_is_literal() {
    let whitelist = Whitelist::from_patterns([r"A\B", r"C\*"]).unwrap();

    assert_eq!(whitelist.first_match(r"A\B"), Some(0));
    assert_eq!(whitelist.first_match("AB"), None);
    assert_eq!(whitelist.first_match(r"C\ Root"), Some(1));
    assert_eq!(whitelist.first_match("C* Root"), None);
}

#[test]
fn test_unclosed_bracket_is_literal() {
    let whitelist = Whitelist::from_patterns(["Foo [x", "Bar ] *"]).unwrap();

    assert_eq!(whitelist.first_match("Foo [x"), Some(0));
    assert_eq!(whitelist.first_match("Foo x"), None);
    assert_eq!(whitelist.first_match("Bar ] CA"), Some(1));
}

#[test]
fn test_bracket_classes_follow_fnmatch() {
    let whitelist = Whitelist::from_patterns(["[!A]* CA", "[]x] Root", "Q[{]"]).unwrap();

    assert_eq!(whitelist.first_match("B Root CA"), Some(0));
    assert_eq!(whitelist.first_match("A Root CA"), None);
    assert_eq!(whitelist.first_match("] Root"), Some(1));
    assert_eq!(whitelist.first_match("x Root"), Some(1));
    assert_eq!(whitelist.first_match("Q{"), Some(2));
}

#[test]
fn test_repeated_stars_match_like_one() {
    let whitelist = Whitelist::from_patterns(["Go**Root"]).unwrap();

    assert_eq!(whitelist.first_match("Go Daddy/Class 2 Root"), Some(0));
    assert_eq!(whitelist.first_match("GoRoot"), Some(0));
}

#[test]
fn test_shell_glob_translation() {
    assert_eq!(shell_glob("Foo {Bar}"), "Foo [{]Bar[}]");
    assert_eq!(shell_glob("Foo [x"), "Foo [[]x");
    assert_eq!(shell_glob("[!]a]**"), "[!]a]*");
    assert_eq!(shell_glob("a]b"), "a[]]b");
}

#[test]
fn test_load_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Whitelist::load(temp_dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, TrustError::ConfigError(_)));
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whitelist");
    std::fs::write(&path, "Example *\n").unwrap();

    let whitelist = Whitelist::load(&path).unwrap();
    assert_eq!(whitelist.patterns(), &["Example *"]);
}

#[test]
fn test_glob_prefix_match_retains_label() {
    let whitelist = Whitelist::from_patterns(["GlobalSign *"]).unwrap();
    let (filtered, used) = whitelist.filter(&label_map(&["GlobalSign Root CA"]));

    assert!(filtered.contains_key("GlobalSign Root CA"));
    assert!(used.contains(0));
}

#[test]
fn test_unmatched_label_is_dropped() {
    let whitelist = Whitelist::from_patterns(["DigiCert *"]).unwrap();
    let (filtered, used) = whitelist.filter(&label_map(&["Go Daddy Root"]));

    assert!(filtered.is_empty());
    assert!(used.is_empty());
}

#[test]
fn test_matching_is_case_sensitive() {
    let whitelist = Whitelist::from_patterns(["globalsign *"]).unwrap();
    let (filtered, _) = whitelist.filter(&label_map(&["GlobalSign Root CA"]));

    assert!(filtered.is_empty());
}

#[test]
fn test_question_mark_and_class_patterns() {
    let whitelist = Whitelist::from_patterns(["ISRG Root X?", "[AB]* CA"]).unwrap();
    let map = label_map(&["ISRG Root X1", "ISRG Root X10", "Alpha CA", "Charlie CA"]);
    let (filtered, _) = whitelist.filter(&map);

    assert_eq!(
        filtered.keys().collect::<Vec<_>>(),
        vec!["ISRG Root X1", "Alpha CA"]
    );
}

#[test]
fn test_star_matches_slashes_in_labels() {
    let whitelist = Whitelist::from_patterns(["Example *"]).unwrap();
    let (filtered, _) = whitelist.filter(&label_map(&["Example CA/Intermediate"]));

    assert_eq!(filtered.len(), 1);
}

#[test]
fn test_first_pattern_in_list_order_is_credited() {
    let whitelist = Whitelist::from_patterns(["Global*", "GlobalSign *"]).unwrap();
    let (_, used) = whitelist.filter(&label_map(&["GlobalSign Root CA"]));

    assert!(used.contains(0));
    assert!(!used.contains(1));
    assert_eq!(whitelist.unused(&used), vec!["GlobalSign *"]);
}

#[test]
fn test_filter_keeps_order_and_all_objects() {
    let whitelist = Whitelist::from_patterns(["*"]).unwrap();
    let map = label_map(&["B", "A", "B"]);
    let (filtered, _) = whitelist.filter(&map);

    assert_eq!(filtered.keys().collect::<Vec<_>>(), vec!["B", "A"]);
    assert_eq!(object_count(&filtered), 3);
    // Input untouched.
    assert_eq!(object_count(&map), 3);
}

#[test]
fn test_unused_pattern_reported_once() {
    let whitelist = Whitelist::from_patterns(["ACME *", "GlobalSign *"]).unwrap();
    let (_, used) = whitelist.filter(&label_map(&["GlobalSign Root CA"]));

    let mut diags = Diagnostics::new();
    whitelist.report_unused(&used, &mut diags);

    assert_eq!(diags.len(), 1);
    assert_eq!(diags.entries()[0].severity, Severity::Warning);
    assert!(diags.entries()[0].message.contains("'ACME *'"));
}

#[test]
fn test_usage_accumulates_across_files() {
    let whitelist = Whitelist::from_patterns(["A*", "B*"]).unwrap();
    let mut total = UsedPatterns::default();

    let (_, first) = whitelist.filter(&label_map(&["Alpha"]));
    total.extend(&first);
    let (_, second) = whitelist.filter(&label_map(&["Bravo"]));
    total.extend(&second);

    assert_eq!(total.len(), 2);
    assert!(whitelist.unused(&total).is_empty());
}
