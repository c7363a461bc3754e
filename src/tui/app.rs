//! Picker state and its transition function.
//!
//! # Overview
//!
//! [`PickerState`] holds everything one picker session needs:
//! - the current query and cursor position
//! - the ranked results for that query and the size of the full snapshot
//! - whether the session is still active, accepted, or cancelled
//!
//! # Architecture
//!
//! The state is a plain value owned by the session loop. [`PickerState::apply`]
//! consumes the state together with one [`KeyEvent`] and returns the next
//! state; nothing else mutates it. Results are recomputed from the immutable
//! candidate snapshot whenever the query changes, so `results` always equals
//! `filter(query, snapshot)`.
//!
//! # Example
//!
//! ```
//! use testpick::fuzzy::fuzzy_filter;
//! use testpick::tui::app::PickerState;
//! use testpick::tui::events::KeyEvent;
//!
//! let snapshot = vec![
//!     "tests/test_auth.py".to_string(),
//!     "tests/test_cache.py".to_string(),
//! ];
//!
//! let mut state = PickerState::new(&snapshot);
//! for event in [KeyEvent::Char('a'), KeyEvent::Char('u'), KeyEvent::Enter] {
//!     state = state.apply(event, fuzzy_filter, &snapshot);
//! }
//!
//! assert!(state.is_done());
//! assert_eq!(state.selected(), Some("tests/test_auth.py"));
//! ```

use super::events::KeyEvent;

/// Maximum number of result rows shown, and reachable by the cursor.
pub const MAX_VISIBLE_RESULTS: usize = 15;

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user accepted this candidate
    Accepted(String),
    /// The user cancelled, or accepted with nothing to accept
    Cancelled,
}

/// Session status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Waiting for input
    #[default]
    Active,
    /// Finished; later events are ignored
    Done(Outcome),
}

impl Status {
    /// Check if the session has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// State of one picker session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    /// Current filter text
    query: String,
    /// Index into `results` of the highlighted row
    cursor: usize,
    /// Candidates matching `query`, best first
    results: Vec<String>,
    /// Size of the full candidate snapshot
    total: usize,
    /// Active or finished
    status: Status,
}

impl PickerState {
    /// Create the initial state for a candidate snapshot.
    ///
    /// The query is empty, every candidate is a result in snapshot order,
    /// and the cursor is on the first row.
    #[must_use]
    pub fn new(snapshot: &[String]) -> Self {
        Self {
            query: String::new(),
            cursor: 0,
            results: snapshot.to_vec(),
            total: snapshot.len(),
            status: Status::Active,
        }
    }

    // ==================== Accessors ====================

    /// The current query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index of the highlighted row.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ranked results for the current query.
    #[must_use]
    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// The results that fit on screen.
    #[must_use]
    pub fn visible_results(&self) -> &[String] {
        &self.results[..self.visible_limit()]
    }

    /// Number of rows the cursor can reach.
    #[must_use]
    pub fn visible_limit(&self) -> usize {
        self.results.len().min(MAX_VISIBLE_RESULTS)
    }

    /// Number of candidates in the snapshot.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Current session status.
    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Check if the session has finished.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// The accepted candidate, if the session finished with one.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.status {
            Status::Done(Outcome::Accepted(candidate)) => Some(candidate.as_str()),
            _ => None,
        }
    }

    /// Consume the state and return the accepted candidate, if any.
    #[must_use]
    pub fn into_selected(self) -> Option<String> {
        match self.status {
            Status::Done(Outcome::Accepted(candidate)) => Some(candidate),
            _ => None,
        }
    }

    // ==================== Transitions ====================

    /// Apply one key event and return the next state.
    ///
    /// `filter` is called with the new query and the full `snapshot` whenever
    /// the query changes. Events arriving after the session finished are
    /// ignored.
    #[must_use]
    pub fn apply<F>(mut self, event: KeyEvent, filter: F, snapshot: &[String]) -> Self
    where
        F: Fn(&str, &[String]) -> Vec<String>,
    {
        if self.is_done() {
            log::trace!("Ignoring {:?} after session finished", event);
            return self;
        }

        match event {
            KeyEvent::Escape => self.finish(Outcome::Cancelled),
            KeyEvent::Enter => {
                let outcome = match self.results.get(self.cursor) {
                    Some(candidate) => Outcome::Accepted(candidate.clone()),
                    None => Outcome::Cancelled,
                };
                self.finish(outcome);
            }
            KeyEvent::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter(&filter, snapshot);
                }
            }
            KeyEvent::ArrowUp => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyEvent::ArrowDown => {
                let last = self.visible_limit().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            KeyEvent::Char(c) => {
                self.query.push(c);
                self.refilter(&filter, snapshot);
            }
        }

        self
    }

    fn refilter<F>(&mut self, filter: &F, snapshot: &[String])
    where
        F: Fn(&str, &[String]) -> Vec<String>,
    {
        self.results = filter(&self.query, snapshot);
        self.cursor = 0;
        log::trace!(
            "Query {:?} -> {}/{} matches",
            self.query,
            self.results.len(),
            self.total
        );
    }

    fn finish(&mut self, outcome: Outcome) {
        log::debug!("Picker finished: {:?}", outcome);
        self.status = Status::Done(outcome);
    }
}
