//! Command-line interface definitions for testpick.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! The CLI follows standard conventions for verbosity and color. Options that
//! mirror configuration keys override the `[tool.testpick]` table and the
//! `TESTPICK_` environment variables.
//!
//! # Example
//!
//! ```bash
//! # Pick a test file under the current directory
//! testpick
//!
//! # Pick from another project, skipping its virtualenv
//! testpick ~/src/project --ignore .venv
//!
//! # Use custom patterns and feed the result to pytest
//! pytest "$(testpick -p 'check_*.py')"
//!
//! # Verbose mode for debugging
//! testpick -vv
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Interactive fuzzy picker for test files.
///
/// testpick finds test files under PATH, lets you narrow them down by typing,
/// and prints the one you choose on stdout.
#[derive(Debug, Parser)]
#[command(name = "testpick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for test files
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// File name glob that selects test files (can be specified multiple times)
    ///
    /// Replaces the configured patterns. Defaults to `test_*.py` and `*_test.py`.
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Glob for paths to skip, relative to PATH (can be specified multiple times)
    ///
    /// Replaces the configured ignore patterns.
    #[arg(short, long = "ignore", value_name = "GLOB")]
    pub ignore_patterns: Vec<String>,

    /// How long each keyboard poll waits, in milliseconds (1-1000)
    #[arg(long, value_name = "MS")]
    pub poll_timeout_ms: Option<u64>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// The configuration values given on the command line.
    #[must_use]
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            patterns: non_empty(&self.patterns),
            ignore_patterns: non_empty(&self.ignore_patterns),
            poll_timeout_ms: self.poll_timeout_ms,
            color: self.no_color.then_some(false),
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}
