//! Integration tests for loading config files from disk.
//!
//! Each test uses a unique env var name to avoid parallel test interference.

use std::fs;

use docbench::config::{Config, ConfigError, KeySource};
use docbench::models::{ModelId, Provider};

#[test]
fn test_file_with_env_expansion() {
    let var_name = "DOCBENCH_TEST_CFG_ANTHROPIC_KEY";
    unsafe { std::env::set_var(var_name, "sk-ant-from-env") };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docbench.toml");
    fs::write(
        &path,
        format!(
            r#"
[documents]
dir = "papers"

[providers.anthropic]
api_key = "${{{}}}"

[endpoints]
"claude-sonnet-4-5-20250929" = "http://127.0.0.1:4010"
"#,
            var_name
        ),
    )
    .unwrap();

    let (config, key_sources) = Config::from_file_with_env(&path).unwrap();

    assert_eq!(config.documents.dir, "papers");
    assert_eq!(
        config.api_key(Provider::Anthropic).unwrap().expose_secret(),
        "sk-ant-from-env"
    );
    assert_eq!(config.base_url(ModelId::ClaudeSonnet45), "http://127.0.0.1:4010");
    let source = key_sources
        .iter()
        .find(|(p, _)| *p == Provider::Anthropic)
        .map(|(_, s)| s)
        .unwrap();
    assert_eq!(*source, KeySource::EnvExpanded);

    unsafe { std::env::remove_var(var_name) };
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let (config, key_sources) = Config::load_or_default(&path).unwrap();

    assert_eq!(config.documents.dir, "documents");
    assert_eq!(config.balance.timeout_secs, 10);
    assert_eq!(key_sources.len(), 3);
}

#[test]
fn test_from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::from_file_with_env(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[documents\ndir = ").unwrap();

    let err = Config::from_file_with_env(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_zero_balance_timeout_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docbench.toml");
    fs::write(&path, "[balance]\ntimeout_secs = 0\n").unwrap();

    let err = Config::from_file_with_env(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}
