//! Terminal User Interface module.
//!
//! This module provides the interactive picker that narrows a list of
//! candidate paths with a fuzzy query and returns the one the user accepts.
//!
//! # Overview
//!
//! The TUI module consists of:
//! - [`input`]: Raw byte sources (the real terminal and a scripted double)
//! - [`events`]: Decoding of raw bytes into key events
//! - [`app`]: Picker state and its transitions
//! - [`ui`]: Frame rendering
//! - [`run`]: The session loop and terminal setup/restore
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Bytes are read from an [`InputSource`]
//! 2. Bytes are decoded into a [`KeyEvent`]
//! 3. Events produce a new [`PickerState`]
//! 4. The UI renders a [`Frame`] from the current state
//!
//! # Example
//!
//! ```
//! use testpick::fuzzy::fuzzy_filter;
//! use testpick::tui::{KeyEvent, PickerState};
//!
//! let snapshot = vec![
//!     "tests/test_auth.py".to_string(),
//!     "tests/test_cache.py".to_string(),
//! ];
//! let state = PickerState::new(&snapshot)
//!     .apply(KeyEvent::Char('c'), fuzzy_filter, &snapshot)
//!     .apply(KeyEvent::Enter, fuzzy_filter, &snapshot);
//!
//! assert_eq!(state.into_selected().as_deref(), Some("tests/test_cache.py"));
//! ```

pub mod app;
pub mod events;
pub mod input;
pub mod run;
pub mod ui;

// Re-export commonly used types
pub use app::{Outcome, PickerState, Status, MAX_VISIBLE_RESULTS};
pub use events::{read_key_event, KeyDecoder, KeyEvent};
pub use input::{InputSource, ScriptedInput, TerminalInput};
pub use run::{run_picker, run_picker_with, SessionOptions, TuiError, TuiResult};
pub use ui::{render, Frame};
