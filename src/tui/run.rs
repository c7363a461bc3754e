//! Picker main loop.
//!
//! This module provides the entry points for running an interactive picker
//! session. It handles terminal setup, the event loop, and cleanup on exit.
//!
//! # Terminal Management
//!
//! The picker draws inline, below the current prompt, and takes over the
//! terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Hiding the cursor
//!
//! Both changes are reverted on every exit path: normal completion,
//! cancellation, I/O errors, shutdown signals, and panics.
//!
//! # Event Loop
//!
//! Each iteration:
//! 1. Erase the previously written frame (cursor up by its line count, clear)
//! 2. Render the current state and write the new frame
//! 3. Poll the input source once (bounded timeout) and decode a key
//! 4. Apply the key to the state, if one was decoded
//!
//! The loop stops once the state is done.
//!
//! # Example
//!
//! ```no_run
//! use testpick::fuzzy::fuzzy_filter;
//! use testpick::tui::{run_picker, SessionOptions};
//!
//! let candidates = vec!["tests/test_auth.py".to_string()];
//! match run_picker(&candidates, fuzzy_filter, SessionOptions::default()) {
//!     Ok(Some(path)) => println!("{path}"),
//!     Ok(None) => eprintln!("cancelled"),
//!     Err(e) => eprintln!("picker error: {e}"),
//! }
//! ```

use std::io::{self, IsTerminal, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, execute, queue,
    terminal::{self, Clear, ClearType},
};
use thiserror::Error;

use super::app::PickerState;
use super::events::KeyDecoder;
use super::input::{InputSource, TerminalInput};
use super::ui::render;

/// Default readiness timeout for each input poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Error type for picker sessions.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The picker was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,

    /// Standard input is not connected to a terminal.
    #[error("standard input is not a terminal")]
    NotATerminal,
}

/// Result type for picker sessions.
pub type TuiResult<T> = Result<T, TuiError>;

/// Options for a picker session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long each input poll waits for a byte
    pub poll_timeout: Duration,
    /// Optional flag for external shutdown signaling (e.g., a signal handler)
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            shutdown_flag: None,
        }
    }
}

impl SessionOptions {
    /// Set the input poll timeout.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the shutdown flag checked once per loop iteration.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Run an interactive picker on the real terminal.
///
/// Reads raw bytes from stdin and draws frames on stderr until the user
/// accepts a candidate (Enter) or cancels (Escape). Stdout stays free for
/// whatever the caller prints with the selection.
///
/// # Returns
///
/// `Ok(Some(candidate))` when a candidate was accepted, `Ok(None)` when the
/// session was cancelled.
///
/// # Terminal Restoration
///
/// Raw mode and cursor visibility are always restored, even on error or panic.
///
/// # Errors
///
/// Returns `TuiError::NotATerminal` if stdin is not a terminal.
/// Returns `TuiError::Io` for terminal I/O errors.
/// Returns `TuiError::Interrupted` if shutdown was requested.
pub fn run_picker<F>(candidates: &[String], filter: F, options: SessionOptions) -> TuiResult<Option<String>>
where
    F: Fn(&str, &[String]) -> Vec<String>,
{
    if !io::stdin().is_terminal() {
        return Err(TuiError::NotATerminal);
    }

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_picker_inner(candidates, filter, &options);

    let _ = panic::take_hook();

    result
}

/// Inner function that owns the raw-mode guard for the whole session.
fn run_picker_inner<F>(
    candidates: &[String],
    filter: F,
    options: &SessionOptions,
) -> TuiResult<Option<String>>
where
    F: Fn(&str, &[String]) -> Vec<String>,
{
    let _raw = RawModeGuard::enable()?;
    let mut input = TerminalInput::stdin(options.poll_timeout);
    let mut stderr = io::stderr().lock();

    run_picker_with(candidates, filter, &mut input, &mut stderr, options)
}

/// Run a picker session over an arbitrary input source and output sink.
///
/// This is the whole session loop without any terminal mode changes, so it
/// can be driven by [`ScriptedInput`](super::input::ScriptedInput) and an
/// in-memory writer. The cursor is hidden on entry and shown again, followed
/// by a line break, on every exit path.
///
/// # Errors
///
/// Returns `TuiError::Io` if reading input or writing output fails.
/// Returns `TuiError::Interrupted` if the shutdown flag is set.
pub fn run_picker_with<I, W, F>(
    candidates: &[String],
    filter: F,
    input: &mut I,
    out: &mut W,
    options: &SessionOptions,
) -> TuiResult<Option<String>>
where
    I: InputSource + ?Sized,
    W: Write,
    F: Fn(&str, &[String]) -> Vec<String>,
{
    log::debug!("Starting picker with {} candidates", candidates.len());

    let screen = HiddenCursor::hide(out)?;
    let mut decoder = KeyDecoder::new();
    let mut state = PickerState::new(candidates);
    let mut printed_lines = 0;

    while !state.is_done() {
        if options.is_shutdown_requested() {
            log::info!("Shutdown signal received, closing picker");
            return Err(TuiError::Interrupted);
        }

        erase_frame(&mut *screen.out, printed_lines)?;
        let frame = render(&state);
        write!(screen.out, "{frame}")?;
        screen.out.flush()?;
        printed_lines = frame.line_count();

        if let Some(event) = decoder.decode(input)? {
            log::trace!("Key event: {:?}", event);
            state = state.apply(event, &filter, candidates);
        }
    }

    log::debug!("Picker exited normally");
    Ok(state.into_selected())
}

/// Move back to the first line of the previous frame and clear it and
/// everything below it.
///
/// The cursor sits on the last line of a written frame, so it moves up one
/// line less than the frame's height.
fn erase_frame<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    if lines == 0 {
        return Ok(());
    }
    if lines > 1 {
        let up = u16::try_from(lines - 1).unwrap_or(u16::MAX);
        queue!(out, cursor::MoveUp(up))?;
    }
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))
}

/// Hides the cursor for its lifetime; shows it again and ends the line on drop.
struct HiddenCursor<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> HiddenCursor<'a, W> {
    fn hide(out: &'a mut W) -> io::Result<Self> {
        queue!(out, cursor::Hide)?;
        out.flush()?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for HiddenCursor<'_, W> {
    fn drop(&mut self) {
        // Move below the frame so later output does not overwrite it
        let _ = queue!(self.out, cursor::Show);
        let _ = self.out.write_all(b"\r\n");
        let _ = self.out.flush();
    }
}

/// Keeps the terminal in raw mode for its lifetime.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        log::debug!("Enabling raw mode");
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        log::debug!("Disabling raw mode");
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Restore the terminal to a usable state from a panic hook.
fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let mut stderr = io::stderr();
    let _ = execute!(stderr, cursor::Show);
    let _ = stderr.write_all(b"\r\n");
}
