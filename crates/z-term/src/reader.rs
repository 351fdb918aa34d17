// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin byte source — blocking reads with a timeout.
//
// The editor is single-threaded: the frame loop calls `read_chunk()` and
// blocks until bytes arrive or the timeout elapses. A timeout is reported
// as `Ok(0)` ("no input yet"), so the loop can resolve a pending lone ESC,
// notice a resize, or expire the status message, and then simply read
// again.
//
// We `poll()` before `read()` so the timeout works whether or not stdin is
// in raw mode, and so "readable but zero bytes" can be told apart from a
// timeout: that combination is end-of-file.

use std::io;

/// Byte chunk read from stdin.
///
/// A single keypress is 1-4 bytes, a paste can be kilobytes.
pub const READ_BUF_SIZE: usize = 4096;

/// How long one read waits for input (milliseconds).
const POLL_TIMEOUT_MS: i32 = 100;

/// A byte-oriented input source with short-read/timeout tolerance.
pub trait ByteSource {
    /// Read available bytes into `buf`.
    ///
    /// Returns `Ok(0)` when no input arrived before the timeout (or the
    /// read was interrupted). That is not an error; call again.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when the source is closed,
    /// or the underlying I/O error for anything other than "would block".
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// The process's stdin.
#[derive(Debug, Default)]
pub struct StdinReader;

impl StdinReader {
    /// Create a reader over stdin.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinReader {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: stdin_fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };

        if ready == 0 {
            return Ok(0);
        }
        if ready < 0 {
            return retry_or_fail(io::Error::last_os_error());
        }

        let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };

        if n < 0 {
            return retry_or_fail(io::Error::last_os_error());
        }
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
        Ok(n as usize)
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinReader {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;

        match io::stdin().lock().read(buf) {
            Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            Ok(n) => Ok(n),
            Err(e) => retry_or_fail(e),
        }
    }
}

/// Interrupted and would-block reads are "no input yet".
fn retry_or_fail(err: io::Error) -> io::Result<usize> {
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(0),
        _ => Err(err),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
