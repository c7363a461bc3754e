//! Key decoding from raw input bytes.
//!
//! # Overview
//!
//! [`KeyDecoder`] turns the byte stream of an [`InputSource`] into logical
//! [`KeyEvent`]s:
//!
//! - `ESC [ A` / `ESC O A` -> ArrowUp, `ESC [ B` / `ESC O B` -> ArrowDown
//! - a bare or unrecognised `ESC` sequence -> Escape
//! - `CR` / `LF` -> Enter, `DEL` / `BS` -> Backspace
//! - printable ASCII and complete printable UTF-8 scalars -> Char
//! - everything else is ignored
//!
//! # Gap tolerance
//!
//! Once a sequence has started, the decoder tolerates fewer than
//! [`GAP_TOLERANCE`] consecutive "no data" answers between two of its bytes.
//! The readiness poll can report nothing ready even though the rest of an
//! arrow-key sequence is already in flight; without the retry an arrow key
//! would degrade to a bare Escape and cancel the picker.
//!
//! The parser is resumable: [`KeyDecoder::feed`] takes one read result at a
//! time and reports whether an event is complete, so it can be driven by
//! scripted input one step at a time.

use std::io;

use super::input::InputSource;

/// Maximum number of consecutive reads inside a sequence that may report no
/// data before the sequence is abandoned.
pub const GAP_TOLERANCE: usize = 4;

const ESC: u8 = 0x1b;
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const DEL: u8 = 0x7f;
const BS: u8 = 0x08;

/// A logical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// A printable character
    Char(char),
    /// Accept the highlighted result
    Enter,
    /// Cancel the picker
    Escape,
    /// Remove the last query character
    Backspace,
    /// Move the cursor up
    ArrowUp,
    /// Move the cursor down
    ArrowDown,
}

/// Outcome of feeding one read result to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// A sequence is in progress; more input is needed.
    Pending,
    /// Decoding finished, with or without an event.
    Done(Option<KeyEvent>),
}

/// Where the decoder is within a multi-byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// Between key presses.
    #[default]
    Idle,
    /// Saw `ESC`.
    Escape,
    /// Saw `ESC [` or `ESC O`.
    Sequence { introducer: u8 },
    /// Collecting the continuation bytes of a UTF-8 scalar.
    Utf8 { buf: [u8; 4], len: usize, need: usize },
}

/// Resumable decoder from raw bytes to [`KeyEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    state: State,
    /// Consecutive "no data" answers since the last byte of the current sequence
    gaps: usize,
}

impl KeyDecoder {
    /// Create a decoder in its idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a multi-byte sequence is partially consumed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state != State::Idle
    }

    /// Read from `input` until one key press has been decoded.
    ///
    /// Returns `Ok(None)` when nothing was available at the top level, or
    /// when the bytes read do not form a key this decoder reports.
    ///
    /// # Errors
    ///
    /// Propagates errors from the input source.
    pub fn decode<I: InputSource + ?Sized>(
        &mut self,
        input: &mut I,
    ) -> io::Result<Option<KeyEvent>> {
        loop {
            let unit = input.read_one()?;
            if let Feed::Done(event) = self.feed(unit) {
                return Ok(event);
            }
        }
    }

    /// Advance the decoder by one read result.
    ///
    /// `None` means the read reported no data.
    pub fn feed(&mut self, unit: Option<u8>) -> Feed {
        match (self.state, unit) {
            (State::Idle, None) => Feed::Done(None),
            (State::Idle, Some(byte)) => self.start(byte),
            (_, None) => self.gap(),
            (State::Escape, Some(byte)) => {
                self.gaps = 0;
                if byte == b'[' || byte == b'O' {
                    self.state = State::Sequence { introducer: byte };
                    Feed::Pending
                } else {
                    log::trace!("Unrecognised escape follow-up {byte:#04x}, treating as Escape");
                    self.finish(Some(KeyEvent::Escape))
                }
            }
            (State::Sequence { introducer }, Some(byte)) => {
                let event = match byte {
                    b'A' => KeyEvent::ArrowUp,
                    b'B' => KeyEvent::ArrowDown,
                    _ => {
                        log::trace!(
                            "Unrecognised sequence ESC {} {:?}, treating as Escape",
                            char::from(introducer),
                            char::from(byte)
                        );
                        KeyEvent::Escape
                    }
                };
                self.finish(Some(event))
            }
            (State::Utf8 { mut buf, len, need }, Some(byte)) => {
                self.gaps = 0;
                if byte & 0xC0 != 0x80 {
                    log::trace!("Malformed UTF-8 input, dropping {} byte(s)", len + 1);
                    return self.finish(None);
                }
                buf[len] = byte;
                if len + 1 < need {
                    self.state = State::Utf8 {
                        buf,
                        len: len + 1,
                        need,
                    };
                    return Feed::Pending;
                }
                let event = std::str::from_utf8(&buf[..need])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .filter(|c| !c.is_control())
                    .map(KeyEvent::Char);
                self.finish(event)
            }
        }
    }

    /// Handle the first byte of a key press.
    fn start(&mut self, byte: u8) -> Feed {
        self.gaps = 0;
        match byte {
            ESC => {
                self.state = State::Escape;
                Feed::Pending
            }
            CR | LF => Feed::Done(Some(KeyEvent::Enter)),
            DEL | BS => Feed::Done(Some(KeyEvent::Backspace)),
            0x20..=0x7e => Feed::Done(Some(KeyEvent::Char(char::from(byte)))),
            _ => match utf8_width(byte) {
                Some(need) => {
                    let mut buf = [0u8; 4];
                    buf[0] = byte;
                    self.state = State::Utf8 { buf, len: 1, need };
                    Feed::Pending
                }
                None => Feed::Done(None),
            },
        }
    }

    /// Handle a "no data" answer in the middle of a sequence.
    fn gap(&mut self) -> Feed {
        self.gaps += 1;
        if self.gaps < GAP_TOLERANCE {
            return Feed::Pending;
        }

        let event = match self.state {
            State::Escape | State::Sequence { .. } => Some(KeyEvent::Escape),
            State::Utf8 { .. } | State::Idle => None,
        };
        log::trace!("Gave up on incomplete sequence after {} empty reads", self.gaps);
        self.finish(event)
    }

    fn finish(&mut self, event: Option<KeyEvent>) -> Feed {
        self.state = State::Idle;
        self.gaps = 0;
        Feed::Done(event)
    }
}

/// Total byte length of a UTF-8 scalar given its leading byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decode a single key press from `input` with a fresh decoder.
///
/// # Errors
///
/// Propagates errors from the input source.
pub fn read_key_event<I: InputSource + ?Sized>(input: &mut I) -> io::Result<Option<KeyEvent>> {
    KeyDecoder::new().decode(input)
}
