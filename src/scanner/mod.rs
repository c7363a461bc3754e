//! Scanner module for test file discovery.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Gitignore-style glob matching via the `ignore` crate
//! - Rendering matches as root-relative, `/`-separated paths
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and pattern matching
//!
//! The result of a scan is the candidate snapshot handed to the picker: a
//! sorted list of unique relative paths that never changes during a session.
//!
//! # Example
//!
//! ```no_run
//! use testpick::scanner::{discover, ScanConfig};
//! use std::path::Path;
//!
//! let config = ScanConfig {
//!     ignore_patterns: vec![".venv".to_string()],
//!     ..Default::default()
//! };
//!
//! for path in discover(Path::new("."), &config)? {
//!     println!("{path}");
//! }
//! # Ok::<(), testpick::scanner::ScanError>(())
//! ```

pub mod walker;

use std::path::{Path, PathBuf};

pub use walker::Walker;

/// Default file name patterns for test files.
pub const DEFAULT_TEST_PATTERNS: [&str; 2] = ["test_*.py", "*_test.py"];

/// Configuration for test file discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Glob patterns matched against each file name.
    /// A file is a candidate if any pattern matches.
    pub patterns: Vec<String>,

    /// Glob patterns matched against root-relative paths (gitignore-style).
    /// Matching files, and everything under matching directories, are dropped.
    pub ignore_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_TEST_PATTERNS.iter().map(ToString::to_string).collect(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `patterns` - File name patterns that select test files
    /// * `ignore_patterns` - Relative path patterns to skip
    #[must_use]
    pub fn new(patterns: Vec<String>, ignore_patterns: Vec<String>) -> Self {
        Self {
            patterns,
            ignore_patterns,
        }
    }
}

/// Errors that can occur during test file discovery.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root was not found.
    #[error("Path not found: {0}")]
    RootNotFound(PathBuf),

    /// The specified root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A glob pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why the pattern was rejected
        message: String,
    },

    /// The root directory itself could not be read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Discover test files under `root`.
///
/// Returns root-relative paths with `/` separators, deduplicated and sorted
/// lexicographically. Entries that cannot be read below the root are logged
/// and skipped.
///
/// # Errors
///
/// Returns `ScanError::RootNotFound` if `root` does not exist,
/// `ScanError::NotADirectory` if it is not a directory,
/// `ScanError::InvalidPattern` if any glob fails to compile, and
/// `ScanError::Io` if the root itself cannot be read.
pub fn discover(root: &Path, config: &ScanConfig) -> Result<Vec<String>, ScanError> {
    Walker::new(root, config)?.candidates()
}
