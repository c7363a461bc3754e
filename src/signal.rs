//! Signal handling for graceful shutdown.
//!
//! This module provides centralized termination handling for testpick. A
//! handler registered with `ctrlc` (with its `termination` feature, so SIGINT,
//! SIGTERM and SIGHUP all count) sets a shared `AtomicBool`; the picker loop
//! checks that flag once per iteration, restores the terminal, and stops.
//!
//! While the picker holds the terminal in raw mode, pressing Ctrl+C does not
//! raise SIGINT at all: it arrives as byte `0x03`, which the key decoder
//! drops. The flag therefore mostly matters for signals sent by other
//! processes, or for Ctrl+C pressed during discovery, which is checked once
//! the walk returns.
//!
//! # Usage
//!
//! ```rust,no_run
//! use testpick::signal::install_handler;
//! use testpick::tui::SessionOptions;
//!
//! let handler = install_handler()?;
//! let options = SessionOptions::default().with_shutdown_flag(handler.get_flag());
//! # Ok::<(), testpick::signal::SignalError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
///
/// Cloning the handler shares the flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially set to `false`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag for the picker loop.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the termination handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide termination handler.
///
/// The first call registers the handler; later calls return the same
/// handler with its flag reset, so repeated sessions in one process (and
/// tests) can each install it.
///
/// # Errors
///
/// Returns `SignalError::InstallFailed` if the platform refuses to register
/// the handler.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        log::debug!("Shutdown signal received");
    }) {
        Ok(()) => log::debug!("Termination handler installed"),
        // Another thread won the race; it registered a handler for the same flag
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Termination handler already registered");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(handler)
}
