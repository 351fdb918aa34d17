// SPDX-License-Identifier: MIT
//
// Output buffering — the append buffer.
//
// Every frame is composed into one `OutputBuffer` and handed to the terminal
// in a single `write()` call. Emitting escape sequences piecemeal lets the
// terminal repaint between them, which shows up as a flicker of half-drawn
// rows and a cursor jumping around the screen. One write, one repaint.

use std::io::{self, Write};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates a whole frame for a single `write()`.
///
/// Implements [`Write`], so the [`ansi`](crate::ansi) helpers and `write!`
/// append to it directly. Writes into the buffer never fail.
///
/// Default capacity: 16 KB — enough for most frames without reallocation.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append `n` copies of `byte` (padding).
    pub fn push_repeated(&mut self, byte: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to `w` in one call and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi;
    use pretty_assertions::assert_eq;

    /// A sink that counts how many `write` calls it receives.
    #[derive(Default)]
    struct CountingSink {
        bytes: Vec<u8>,
        writes: usize,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn new_buffer_is_empty() {
        let out = OutputBuffer::new();
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn push_variants_append_in_order() {
        let mut out = OutputBuffer::new();
        out.push(b'~');
        out.push_repeated(b' ', 3);
        out.push_bytes(b"hi");
        assert_eq!(out.as_bytes(), b"~   hi");
    }

    #[test]
    fn ansi_helpers_write_into_buffer() {
        let mut out = OutputBuffer::new();
        ansi::cursor_hide(&mut out).unwrap();
        ansi::cursor_home(&mut out).unwrap();
        assert_eq!(out.as_bytes(), b"\x1b[?25l\x1b[H");
    }

    #[test]
    fn flush_to_is_a_single_write() {
        let mut out = OutputBuffer::new();
        for _ in 0..100 {
            out.push_bytes(b"row\x1b[K\r\n");
        }
        let mut sink = CountingSink::default();
        out.flush_to(&mut sink).unwrap();

        assert_eq!(sink.writes, 1);
        assert_eq!(sink.bytes.len(), 100 * 8);
        assert!(out.is_empty());
    }

    #[test]
    fn flush_empty_writes_nothing() {
        let mut out = OutputBuffer::new();
        let mut sink = CountingSink::default();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink.writes, 0);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut out = OutputBuffer::new();
        out.push_bytes(&[b'x'; 1000]);
        let cap = out.buf.capacity();
        out.clear();
        assert!(out.is_empty());
        assert_eq!(out.buf.capacity(), cap);
    }
}
