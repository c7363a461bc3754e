//! testpick - Interactive fuzzy picker for test files
//!
//! Discovers test files under a directory, lets the user narrow them down
//! with a fuzzy query in an inline terminal picker, and prints the chosen
//! path on stdout.

pub mod cli;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod logging;
pub mod scanner;
pub mod signal;
pub mod tui;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::tui::{SessionOptions, TuiError};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if configuration, discovery, signal setup or the picker
/// session fails. An interrupted session surfaces as
/// [`TuiError::Interrupted`](crate::tui::TuiError::Interrupted).
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(&cli.path, &cli.config_overrides())
        .context("failed to load configuration")?;
    if !config.color {
        yansi::disable();
    }
    log::debug!("Configuration: {:?}", config);

    let handler = signal::install_handler()?;

    let candidates = scanner::discover(&cli.path, &config.scan_config())
        .with_context(|| format!("failed to discover test files in {}", cli.path.display()))?;
    if handler.is_shutdown_requested() {
        log::info!("Shutdown signal received during discovery");
        return Err(TuiError::Interrupted.into());
    }
    if candidates.is_empty() {
        log::warn!(
            "No files matching {} found under {}",
            config.patterns.join(", "),
            cli.path.display()
        );
        return Ok(ExitCode::NoCandidates);
    }
    log::debug!("Found {} candidate test files", candidates.len());

    let options = SessionOptions::default()
        .with_poll_timeout(config.poll_timeout())
        .with_shutdown_flag(handler.get_flag());

    match tui::run_picker(&candidates, fuzzy::fuzzy_filter, options)? {
        Some(path) => {
            println!("{path}");
            Ok(ExitCode::Success)
        }
        None => {
            log::debug!("Picker cancelled");
            Ok(ExitCode::NoSelection)
        }
    }
}
