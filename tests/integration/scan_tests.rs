use std::fs::{self, File};
use std::path::Path;
use testpick::scanner::{discover, ScanConfig, ScanError};
use tempfile::tempdir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap();
}

#[test]
fn test_discover_empty_directory() {
    let dir = tempdir().unwrap();
    let files = discover(dir.path(), &ScanConfig::default()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_discover_python_project() {
    let dir = tempdir().unwrap();
    for path in [
        "src/app/__init__.py",
        "src/app/views.py",
        "tests/__init__.py",
        "tests/test_views.py",
        "tests/api/test_auth.py",
        "tests/api/auth_test.py",
        "tests/api/helpers.py",
        "README.md",
    ] {
        touch(dir.path(), path);
    }

    let files = discover(dir.path(), &ScanConfig::default()).unwrap();
    assert_eq!(
        files,
        vec![
            "tests/api/auth_test.py",
            "tests/api/test_auth.py",
            "tests/test_views.py",
        ]
    );
}

#[test]
fn test_discover_sorts_lexicographically() {
    let dir = tempdir().unwrap();
    for path in ["z/test_a.py", "a/test_z.py", "test_m.py", "B/test_b.py"] {
        touch(dir.path(), path);
    }

    let files = discover(dir.path(), &ScanConfig::default()).unwrap();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
    assert_eq!(files.len(), 4);
}

#[test]
fn test_discover_skips_virtualenv_when_ignored() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "tests/test_core.py");
    touch(dir.path(), ".venv/lib/site-packages/pkg/test_vendored.py");
    touch(dir.path(), "build/lib/tests/test_core.py");

    let config = ScanConfig {
        ignore_patterns: vec![".venv".to_string(), "build/".to_string()],
        ..Default::default()
    };
    let files = discover(dir.path(), &config).unwrap();
    assert_eq!(files, vec!["tests/test_core.py"]);
}

#[test]
fn test_discover_anchored_ignore_pattern() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "tests/legacy/test_old.py");
    touch(dir.path(), "other/tests/legacy/test_kept.py");

    let config = ScanConfig {
        ignore_patterns: vec!["/tests/legacy".to_string()],
        ..Default::default()
    };
    let files = discover(dir.path(), &config).unwrap();
    assert_eq!(files, vec!["other/tests/legacy/test_kept.py"]);
}

#[test]
fn test_discover_missing_root() {
    let dir = tempdir().unwrap();
    let result = discover(&dir.path().join("missing"), &ScanConfig::default());
    assert!(matches!(result, Err(ScanError::RootNotFound(_))));
}

#[test]
fn test_discover_invalid_ignore_pattern() {
    let dir = tempdir().unwrap();
    let config = ScanConfig {
        ignore_patterns: vec!["[z-a]".to_string()],
        ..Default::default()
    };

    let err = discover(dir.path(), &config).unwrap_err();
    assert!(matches!(err, ScanError::InvalidPattern { .. }));
    assert!(err.to_string().contains("[z-a]"));
}

#[cfg(unix)]
#[test]
fn test_discover_skips_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    touch(dir.path(), "tests/test_ok.py");
    touch(dir.path(), "locked/test_hidden.py");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = discover(dir.path(), &ScanConfig::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let files = result.unwrap();
    assert!(files.contains(&"tests/test_ok.py".to_string()));
}
