//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting the files that look like tests.
//!
//! # Features
//!
//! - Sequential traversal using walkdir, without following symlinks
//! - File name matching with gitignore-style globs from the `ignore` crate
//! - Ignore patterns on root-relative paths; ignored directories are pruned
//! - Unreadable entries are logged and skipped
//!
//! # Example
//!
//! ```no_run
//! use testpick::scanner::{ScanConfig, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), &ScanConfig::default())?;
//! for path in walker.candidates()? {
//!     println!("{path}");
//! }
//! # Ok::<(), testpick::scanner::ScanError>(())
//! ```

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{ScanConfig, ScanError};

/// Directory walker for test file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Matcher for file names that select candidates
    include: Gitignore,
    /// Matcher for root-relative paths that are skipped
    exclude: Gitignore,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory to scan
    /// * `config` - Include and ignore patterns
    ///
    /// # Errors
    ///
    /// Returns `ScanError::RootNotFound` or `ScanError::NotADirectory` for a
    /// bad root, and `ScanError::InvalidPattern` if a glob fails to compile.
    pub fn new(root: &Path, config: &ScanConfig) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let include = build_matcher(root, &config.patterns)?;
        let exclude = build_matcher(root, &config.ignore_patterns)?;
        log::debug!(
            "Walker for {} with {} include and {} ignore patterns",
            root.display(),
            include.num_ignores(),
            exclude.num_ignores()
        );

        Ok(Self {
            root: root.to_path_buf(),
            include,
            exclude,
        })
    }

    /// The directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and return every matching file.
    ///
    /// Paths are relative to the root, use `/` separators, and come back
    /// deduplicated in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Io` if the root directory itself cannot be read.
    /// Failures below the root are logged at warn level and skipped.
    pub fn candidates(&self) -> Result<Vec<String>, ScanError> {
        let mut found = BTreeSet::new();

        let walk = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored_dir(entry));

        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let message = e.to_string();
                    return Err(ScanError::Io {
                        path: self.root.clone(),
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other(message)),
                    });
                }
                Err(e) => {
                    let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.matches_name(entry.file_name()) {
                continue;
            }

            let Some(relative) = self.relative(entry.path()) else {
                continue;
            };
            if self.exclude.matched(relative, false).is_ignore() {
                log::trace!("Ignoring file: {}", relative.display());
                continue;
            }

            found.insert(to_slash(relative));
        }

        log::debug!("Discovered {} test files under {}", found.len(), self.root.display());
        Ok(found.into_iter().collect())
    }

    /// Check if a file name matches any include pattern.
    fn matches_name(&self, name: &OsStr) -> bool {
        self.include.matched(Path::new(name), false).is_ignore()
    }

    /// Check if a directory below the root should be pruned.
    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let ignored = self
            .relative(entry.path())
            .is_some_and(|relative| self.exclude.matched(relative, true).is_ignore());
        if ignored {
            log::trace!("Ignoring directory: {}", entry.path().display());
        }
        ignored
    }

    fn relative<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.strip_prefix(&self.root).ok()
    }
}

/// Compile a list of gitignore-style globs into one matcher.
fn build_matcher(root: &Path, patterns: &[String]) -> Result<Gitignore, ScanError> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| ScanError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Join the normal components of a relative path with `/`.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
