//! Tests for config functionality.

use crate::config::{Config, DEFAULT_BACKUP_DIR, DEFAULT_SKIP_REGEX, DEFAULT_TRUST_DIR};
use crate::error::TrustError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.trust_dir, PathBuf::from(DEFAULT_TRUST_DIR));
    assert_eq!(config.whitelist, None);
    assert_eq!(config.backup_dir, DEFAULT_BACKUP_DIR);
    assert_eq!(config.skip_regex, DEFAULT_SKIP_REGEX);
    assert!(!config.quiet);
    assert!(config.backups_enabled());
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
trust_dir: /srv/trust
quiet: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.trust_dir, PathBuf::from("/srv/trust"));
    assert!(config.quiet);

    // Unspecified values use defaults
    assert_eq!(config.backup_dir, DEFAULT_BACKUP_DIR);
    assert_eq!(config.skip_regex, DEFAULT_SKIP_REGEX);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
trust_dir: /srv/trust
whitelist: /etc/trustfilter/whitelist
backup_dir: ""
skip_regex: '^NOTES$'
quiet: false
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(
        config.whitelist,
        Some(PathBuf::from("/etc/trustfilter/whitelist"))
    );
    assert!(!config.backups_enabled());
    assert_eq!(config.skip_regex, "^NOTES$");
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
trust_dir: /srv/trust
future_option: 42
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.trust_dir, PathBuf::from("/srv/trust"));
}

#[test]
fn test_invalid_skip_regex_rejected() {
    let err = Config::from_yaml("skip_regex: '(unclosed'\n").unwrap_err();
    assert!(matches!(err, TrustError::ConfigError(_)));
}

#[test]
fn test_empty_trust_dir_rejected() {
    let err = Config::from_yaml("trust_dir: ''\n").unwrap_err();
    assert!(matches!(err, TrustError::ConfigError(_)));
}

#[test]
fn test_invalid_yaml_rejected() {
    let err = Config::from_yaml("trust_dir: [unterminated\n").unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_default_skip_matcher() {
    let matcher = Config::default().skip_matcher().unwrap().unwrap();

    assert!(matcher.is_match("README"));
    assert!(matcher.is_match("readme.rst"));
    assert!(matcher.is_match("notes.txt"));
    assert!(matcher.is_match("CHANGES.MD"));
    assert!(!matcher.is_match("ca-bundle.p11-kit"));
    assert!(!matcher.is_match("mozilla.trust"));
}

#[test]
fn test_empty_skip_regex_disables_matcher() {
    let config = Config {
        skip_regex: String::new(),
        ..Config::default()
    };
    assert!(config.skip_matcher().unwrap().is_none());
}

#[test]
fn test_yaml_round_trip() {
    let config = Config {
        whitelist: Some(PathBuf::from("list")),
        quiet: true,
        ..Config::default()
    };

    let yaml = config.to_yaml().unwrap();
    assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("trustfilter.yaml");
    std::fs::write(&path, "backup_dir: saved\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.backup_dir, "saved");
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, TrustError::ConfigError(_)));
}
