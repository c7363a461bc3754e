//! Raw, non-blocking terminal input.
//!
//! # Overview
//!
//! An [`InputSource`] hands out one byte at a time. `Ok(None)` means "nothing
//! ready right now" and is an ordinary, expected answer; it is not end of input.
//!
//! - [`TerminalInput`] waits a bounded time for stdin to become readable and then
//!   performs a single one-byte `read(2)` directly on the descriptor. Reading below
//!   any userspace buffer keeps the readiness check and the read looking at the
//!   same kernel queue.
//! - [`ScriptedInput`] replays a fixed script of bytes and gaps for tests.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// A source of raw input bytes.
pub trait InputSource {
    /// Read a single byte if one becomes available within the source's timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying descriptor fails or reaches end of file.
    fn read_one(&mut self) -> io::Result<Option<u8>>;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn read_one(&mut self) -> io::Result<Option<u8>> {
        (**self).read_one()
    }
}

/// Stdin, read byte by byte with `poll(2)` readiness checks.
#[derive(Debug, Clone)]
pub struct TerminalInput {
    #[cfg_attr(not(unix), allow(dead_code))]
    fd: i32,
    #[cfg_attr(not(unix), allow(dead_code))]
    timeout: Duration,
}

impl TerminalInput {
    /// Create an input source over stdin that waits at most `timeout` per read.
    #[must_use]
    pub fn stdin(timeout: Duration) -> Self {
        Self {
            fd: 0,
            timeout,
        }
    }

    /// The readiness timeout used by [`InputSource::read_one`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[cfg(unix)]
    fn timeout_millis(&self) -> libc::c_int {
        libc::c_int::try_from(self.timeout.as_millis()).unwrap_or(libc::c_int::MAX)
    }
}

#[cfg(unix)]
impl InputSource for TerminalInput {
    fn read_one(&mut self) -> io::Result<Option<u8>> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };

        // SAFETY: `pfd` is a single valid pollfd and nfds is 1.
        let ready = unsafe { libc::poll(&mut pfd, 1, self.timeout_millis()) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 || pfd.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) == 0 {
            return Ok(None);
        }

        let mut byte: u8 = 0;
        // SAFETY: the buffer is one valid, writable byte.
        let n = unsafe { libc::read(self.fd, std::ptr::addr_of_mut!(byte).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal input closed",
            )),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl InputSource for TerminalInput {
    fn read_one(&mut self) -> io::Result<Option<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw terminal input is only available on unix",
        ))
    }
}

/// Deterministic input that replays a script of bytes and gaps.
///
/// Each `None` in the script is returned as one "no data" answer. Once the
/// script runs out every read reports no data.
///
/// # Example
///
/// ```
/// use testpick::tui::input::{InputSource, ScriptedInput};
///
/// let mut input = ScriptedInput::from_bytes(b"a").gap(2);
/// assert_eq!(input.read_one().unwrap(), Some(b'a'));
/// assert_eq!(input.read_one().unwrap(), None);
/// assert_eq!(input.read_one().unwrap(), None);
/// assert!(input.is_exhausted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<Option<u8>>,
}

impl ScriptedInput {
    /// Create a scripted input from an explicit sequence of bytes and gaps.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Create a scripted input that delivers `bytes` with no gaps.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().copied().map(Some))
    }

    /// Append `bytes` to the script.
    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append `count` "no data" answers to the script.
    #[must_use]
    pub fn gap(mut self, count: usize) -> Self {
        self.script.extend(std::iter::repeat(None).take(count));
        self
    }

    /// Whether every scripted entry has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }

    /// Number of scripted entries not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_one(&mut self) -> io::Result<Option<u8>> {
        Ok(self.script.pop_front().flatten())
    }
}
