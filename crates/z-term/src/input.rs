// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw stdin bytes into logical key events. The terminal sends plain
// bytes for ordinary and control keys, and short escape sequences for the
// navigation keys:
//
// - `ESC [ A|B|C|D`      arrows
// - `ESC [ H|F`          Home / End
// - `ESC O H|F`          Home / End (SS3 form, some terminals)
// - `ESC [ <digit> ~`    1/7 Home, 4/8 End, 3 Delete, 5 PageUp, 6 PageDown
// - `ESC <other>`        Escape; both bytes are consumed
//
// # Design
//
// The decoder keeps a small byte buffer because an escape sequence can be
// split across two `read()` calls. Feed bytes with [`Decoder::advance`];
// complete keys come back immediately and an unfinished sequence stays
// pending. When a read times out with bytes still pending, call
// [`Decoder::flush`]: the lone ESC was the Escape key after all.
//
// Nothing here can fail. Unknown or malformed sequences degrade to an
// `Escape` key instead of an error.

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte: printable ASCII, a control byte (`0x00..=0x1f`),
    /// DEL (`0x7f`, the Backspace key) or a high byte.
    Byte(u8),
    /// A lone ESC, or an escape sequence we don't recognize.
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
}

/// Control-key code for a letter: `ctrl(b'q')` is the byte Ctrl-Q sends.
#[inline]
#[must_use]
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1f
}

/// The byte the terminal sends for the Backspace key.
pub const BACKSPACE: u8 = 0x7f;

/// The byte the terminal sends for Enter in raw mode (ICRNL disabled).
pub const ENTER: u8 = b'\r';

const ESC: u8 = 0x1b;

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Result of decoding one key from the front of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A key, and how many bytes it consumed.
    Key(Key, usize),
    /// The bytes are a prefix of an escape sequence; wait for more.
    Incomplete,
}

/// Byte-stream key decoder.
///
/// The only state carried between calls is the tail of an escape sequence
/// that hasn't fully arrived yet.
#[derive(Debug, Default)]
pub struct Decoder {
    pending: Vec<u8>,
}

impl Decoder {
    /// Create a decoder with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(8),
        }
    }

    /// Feed raw bytes and return every key that can be decoded.
    ///
    /// An incomplete escape sequence at the end of the input is kept and
    /// combined with the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Key> {
        self.pending.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.pending.len() {
            match decode(&self.pending[pos..]) {
                Decoded::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Decoded::Incomplete => break,
            }
        }

        self.pending.drain(..pos);
        keys
    }

    /// Are there bytes waiting for the rest of an escape sequence?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Resolve pending bytes after a read timeout.
    ///
    /// Pending bytes always start with ESC and never form a complete
    /// sequence, so the result is a single `Escape`; the partial tail is
    /// discarded.
    pub fn flush(&mut self) -> Option<Key> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.clear();
        Some(Key::Escape)
    }
}

/// Decode one key from the front of `buf`.
///
/// `buf` must be non-empty.
#[must_use]
pub fn decode(buf: &[u8]) -> Decoded {
    debug_assert!(!buf.is_empty());

    if buf[0] != ESC {
        return Decoded::Key(Key::Byte(buf[0]), 1);
    }

    let Some(&intro) = buf.get(1) else {
        return Decoded::Incomplete;
    };

    match intro {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        // ESC followed by anything else (Alt chords): a plain Escape that
        // swallows the follow-up byte.
        _ => Decoded::Key(Key::Escape, 2),
    }
}

fn decode_csi(buf: &[u8]) -> Decoded {
    let Some(&b) = buf.get(2) else {
        return Decoded::Incomplete;
    };

    if b.is_ascii_digit() {
        let Some(&last) = buf.get(3) else {
            return Decoded::Incomplete;
        };
        let key = if last == b'~' {
            match b {
                b'1' | b'7' => Key::Home,
                b'4' | b'8' => Key::End,
                b'3' => Key::Delete,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            }
        } else {
            Key::Escape
        };
        return Decoded::Key(key, 4);
    }

    let key = match b {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    };
    Decoded::Key(key, 3)
}

fn decode_ss3(buf: &[u8]) -> Decoded {
    let Some(&b) = buf.get(2) else {
        return Decoded::Incomplete;
    };

    let key = match b {
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    };
    Decoded::Key(key, 3)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
