//! Frame rendering for the picker.
//!
//! # Layout
//!
//! ```text
//! Filter > qu
//!   3/5 matches
//!   ❯ tests/test_query.py
//!     tests/test_request.py
//!     tests/unit/test_sql_query.py
//! ```
//!
//! - a header with the prompt label and the current query
//! - a summary line with the match count and the snapshot size
//! - up to [`MAX_VISIBLE_RESULTS`](super::app::MAX_VISIBLE_RESULTS) result
//!   rows, the cursor row inverted and marked with [`CURSOR_GLYPH`]
//! - a single [`NO_MATCHES`] row instead when there are no results
//!
//! Rendering is pure: [`render`] only reads the state and returns a [`Frame`].
//! Colors come from `yansi` and disappear when styling is disabled globally.

use std::fmt;

use yansi::Paint;

use super::app::PickerState;

/// Label shown before the query.
pub const PROMPT_LABEL: &str = "Filter >";

/// Marker shown on the highlighted row.
pub const CURSOR_GLYPH: &str = "❯";

/// Placeholder row shown when nothing matches.
pub const NO_MATCHES: &str = "(no matches)";

/// A rendered frame: one string per terminal line, without line breaks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// The lines of the frame.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of terminal lines the frame occupies once written.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Lines are joined with `\r\n` so the frame lays out correctly in raw mode,
/// where the terminal no longer translates `\n`. No trailing line break is
/// written, leaving the cursor on the last line.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\r\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// Render the picker state as a frame.
#[must_use]
pub fn render(state: &PickerState) -> Frame {
    let visible = state.visible_results();
    let mut lines = Vec::with_capacity(visible.len().max(1) + 2);

    lines.push(format!("{} {}", PROMPT_LABEL.bold().cyan(), state.query()));
    lines.push(format!(
        "  {}",
        format!("{}/{} matches", state.results().len(), state.total()).cyan()
    ));

    if visible.is_empty() {
        lines.push(format!("  {}", NO_MATCHES.cyan()));
    }

    for (i, item) in visible.iter().enumerate() {
        if i == state.cursor() {
            lines.push(format!(
                "  {}",
                format!("{CURSOR_GLYPH} {item}").invert().bold()
            ));
        } else {
            lines.push(format!("    {item}"));
        }
    }

    Frame { lines }
}
