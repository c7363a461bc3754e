//! Application configuration management.
//!
//! Configuration is layered with figment, lowest precedence first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. The `[tool.testpick]` table of the nearest `pyproject.toml`, searched
//!    from the scanned directory upward
//! 3. `TESTPICK_`-prefixed environment variables
//! 4. Command-line overrides ([`ConfigOverrides`])
//!
//! # Example
//!
//! ```toml
//! [tool.testpick]
//! patterns = ["test_*.py", "check_*.py"]
//! ignore_patterns = [".venv", "build/"]
//! poll_timeout_ms = 30
//! color = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scanner::{ScanConfig, DEFAULT_TEST_PATTERNS};

/// Name of the project file searched for configuration.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "TESTPICK_";

/// Keys accepted in the `[tool.testpick]` table.
pub const KNOWN_KEYS: [&str; 4] = ["patterns", "ignore_patterns", "poll_timeout_ms", "color"];

/// Allowed range for the input poll timeout, in milliseconds.
pub const POLL_TIMEOUT_RANGE_MS: (u64, u64) = (1, 1000);

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The project file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the project file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The project file is not valid TOML.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path of the project file
        path: PathBuf,
        /// The TOML error
        #[source]
        source: toml::de::Error,
    },

    /// The `[tool.testpick]` table contains a key we do not recognise.
    #[error(
        "unknown option '{key}' in [tool.testpick] of {}{}",
        .path.display(),
        suggestion_hint(.suggestion)
    )]
    UnknownOption {
        /// The unrecognised key
        key: String,
        /// Closest known key, if any is similar enough
        suggestion: Option<String>,
        /// Path of the project file
        path: PathBuf,
    },

    /// A layer holds a value of the wrong type.
    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File name globs that select test files.
    pub patterns: Vec<String>,
    /// Root-relative globs for paths to skip.
    pub ignore_patterns: Vec<String>,
    /// How long each input poll waits, in milliseconds.
    pub poll_timeout_ms: u64,
    /// Whether the picker uses colors.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_TEST_PATTERNS.iter().map(ToString::to_string).collect(),
            ignore_patterns: Vec::new(),
            poll_timeout_ms: 50,
            color: true,
        }
    }
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    /// Replaces the configured file name globs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    /// Replaces the configured ignore globs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_patterns: Option<Vec<String>>,
    /// Poll timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_timeout_ms: Option<u64>,
    /// `Some(false)` turns colors off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Config {
    /// Load the configuration for a scan of `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the project file is unreadable, malformed or
    /// holds unknown keys, or if any layer has a value of the wrong type.
    pub fn load(root: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let figment = Self::figment(root)?.merge(Serialized::defaults(overrides));
        Self::extract(&figment)
    }

    /// Build the figment for the defaults, project file and environment layers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the project file cannot be used.
    pub fn figment(root: &Path) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = find_pyproject(root) {
            if let Some(table) = read_tool_table(&path)? {
                log::debug!("Loaded [tool.testpick] from {}", path.display());
                figment = figment.merge(Serialized::defaults(table));
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract a configuration from a figment and normalise it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Extract` if a value has the wrong type.
    pub fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        Ok(config.normalized())
    }

    /// Clamp the poll timeout into its allowed range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let (min, max) = POLL_TIMEOUT_RANGE_MS;
        let clamped = self.poll_timeout_ms.clamp(min, max);
        if clamped != self.poll_timeout_ms {
            log::warn!(
                "poll_timeout_ms {} is outside {}..={}, using {}",
                self.poll_timeout_ms,
                min,
                max,
                clamped
            );
            self.poll_timeout_ms = clamped;
        }
        self
    }

    /// The input poll timeout.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// The discovery settings.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(self.patterns.clone(), self.ignore_patterns.clone())
    }
}

/// Find the nearest `pyproject.toml` at or above `start`.
#[must_use]
pub fn find_pyproject(start: &Path) -> Option<PathBuf> {
    let start = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .map(|dir| dir.join(PYPROJECT_FILE))
        .find(|candidate| candidate.is_file())
}

/// Read and validate the `[tool.testpick]` table of a project file.
///
/// Returns `Ok(None)` if the file has no such table.
///
/// # Errors
///
/// Returns `ConfigError::Read`, `ConfigError::Parse` or
/// `ConfigError::UnknownOption`.
pub fn read_tool_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: toml::Table = content.parse().map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(table) = document
        .get("tool")
        .and_then(|tool| tool.get("testpick"))
        .and_then(toml::Value::as_table)
    else {
        return Ok(None);
    };

    if let Some(key) = table.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
        return Err(ConfigError::UnknownOption {
            key: key.clone(),
            suggestion: suggest_key(key).map(str::to_string),
            path: path.to_path_buf(),
        });
    }

    Ok(Some(table.clone()))
}

/// Find the known key most similar to `key`.
#[must_use]
pub fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
