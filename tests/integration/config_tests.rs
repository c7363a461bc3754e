use figment::providers::Serialized;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use testpick::cli::Cli;
use testpick::config::{Config, ConfigError, ConfigOverrides};

use clap::Parser;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config = Config::extract(&figment).unwrap();

    assert_eq!(config.patterns, vec!["test_*.py", "*_test.py"]);
    assert_eq!(config.poll_timeout(), Duration::from_millis(50));
}

#[test]
fn test_config_load_from_pyproject() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        r#"
[project]
name = "demo"

[tool.testpick]
patterns = ["check_*.py"]
ignore_patterns = [".venv"]
poll_timeout_ms = 20
"#,
    )
    .unwrap();

    let config = Config::load(dir.path(), &ConfigOverrides::default()).unwrap();

    assert_eq!(config.patterns, vec!["check_*.py"]);
    assert_eq!(config.ignore_patterns, vec![".venv"]);
    assert_eq!(config.poll_timeout_ms, 20);
}

#[test]
fn test_config_found_from_subdirectory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("tests/unit");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.testpick]\nignore_patterns = [\"fixtures\"]\n",
    )
    .unwrap();

    let config = Config::load(&nested, &ConfigOverrides::default()).unwrap();
    assert_eq!(config.ignore_patterns, vec!["fixtures"]);
}

#[test]
fn test_config_cli_overrides_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.testpick]\npatterns = [\"check_*.py\"]\npoll_timeout_ms = 20\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "testpick",
        dir.path().to_str().unwrap(),
        "--pattern",
        "spec_*.py",
        "--poll-timeout-ms",
        "5000",
    ])
    .unwrap();
    let config = Config::load(&cli.path, &cli.config_overrides()).unwrap();

    assert_eq!(config.patterns, vec!["spec_*.py"]);
    // clamped to the maximum
    assert_eq!(config.poll_timeout_ms, 1000);
}

#[test]
fn test_config_load_from_env() {
    // Only `color` is set here; no other test in this binary asserts on it
    std::env::set_var("TESTPICK_COLOR", "false");

    let dir = tempdir().unwrap();
    let result = Config::load(dir.path(), &ConfigOverrides::default());

    std::env::remove_var("TESTPICK_COLOR");

    assert!(!result.unwrap().color);
}

#[test]
fn test_config_unknown_key_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.testpick]\nignore_pattern = [\"x\"]\n",
    )
    .unwrap();

    let err = Config::load(dir.path(), &ConfigOverrides::default()).unwrap_err();
    match err {
        ConfigError::UnknownOption {
            key, suggestion, ..
        } => {
            assert_eq!(key, "ignore_pattern");
            assert_eq!(suggestion.as_deref(), Some("ignore_patterns"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_wrong_type_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.testpick]\npoll_timeout_ms = \"fast\"\n",
    )
    .unwrap();

    let err = Config::load(dir.path(), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Extract(_)));
}

#[test]
fn test_config_malformed_pyproject() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("pyproject.toml"), "[tool.testpick\n").unwrap();

    let err = Config::load(dir.path(), &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("pyproject.toml"));
}
