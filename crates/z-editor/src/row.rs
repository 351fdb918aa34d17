//! Row — one line of text plus its tab-expanded render cache.
//!
//! A row stores its logical content (`chars`, raw bytes, no newline) and a
//! derived `render` copy in which every tab is expanded to spaces up to the
//! next tab stop. The render copy is what the compositor draws and what
//! horizontal scrolling is measured in.
//!
//! # Invariant
//!
//! `render` is a pure function of `chars` and the tab stop. Every method that
//! touches `chars` rebuilds it before returning, which is why the mutators
//! are crate-private and go through [`Document`](crate::document::Document).
//!
//! # Columns
//!
//! - **cx** — logical column, a byte offset into `chars`.
//! - **rx** — rendered column, the matching offset into `render`.
//!
//! They differ only when tabs precede the cursor. [`cx_to_rx`] converts.

use std::fmt;

/// Widest tab stop a row will render with.
pub const MAX_TAB_STOP: usize = 16;

/// `tab_stop` forced into `1..=MAX_TAB_STOP`.
#[inline]
#[must_use]
pub fn clamp_tab_stop(tab_stop: usize) -> usize {
    tab_stop.clamp(1, MAX_TAB_STOP)
}

/// Convert a logical column to a rendered column.
///
/// Walks `chars[..cx]`: a tab advances to the next multiple of `tab_stop`,
/// every other byte advances by one. `cx` past the end of `chars` counts
/// only the bytes that exist. Non-decreasing in `cx`; equal to `cx` for a
/// row without tabs.
#[must_use]
pub fn cx_to_rx(chars: &[u8], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = clamp_tab_stop(tab_stop);
    let mut rx = 0;

    for &byte in chars.iter().take(cx) {
        if byte == b'\t' {
            rx += (tab_stop - 1) - (rx % tab_stop);
        }
        rx += 1;
    }

    rx
}

/// Expand tabs in `chars` to spaces, stopping each tab at the next multiple
/// of `tab_stop` (clamped like [`clamp_tab_stop`]).
#[must_use]
pub fn expand_tabs(chars: &[u8], tab_stop: usize) -> Vec<u8> {
    let tab_stop = clamp_tab_stop(tab_stop);
    let tabs = chars.iter().filter(|&&b| b == b'\t').count();
    let mut render =
        Vec::with_capacity(chars.len().saturating_add(tabs.saturating_mul(tab_stop - 1)));

    for &byte in chars {
        if byte == b'\t' {
            render.push(b' ');
            while render.len() % tab_stop != 0 {
                render.push(b' ');
            }
        } else {
            render.push(byte);
        }
    }

    render
}

/// One line of the document.
#[derive(Clone, PartialEq, Eq)]
pub struct Row {
    chars: Vec<u8>,
    render: Vec<u8>,
}

impl Row {
    /// Create a row from its logical content.
    #[must_use]
    pub fn new(chars: impl Into<Vec<u8>>, tab_stop: usize) -> Self {
        let chars = chars.into();
        let render = expand_tabs(&chars, tab_stop);
        Self { chars, render }
    }

    // -- Access -------------------------------------------------------------

    /// Logical content.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// Tab-expanded content.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Logical length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Rendered column for logical column `cx` in this row.
    #[inline]
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        cx_to_rx(&self.chars, cx, tab_stop)
    }

    // -- Mutation -----------------------------------------------------------

    /// Insert `byte` at `at`, clamped to the end of the row.
    pub(crate) fn insert(&mut self, at: usize, byte: u8, tab_stop: usize) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, byte);
        self.update_render(tab_stop);
    }

    /// Remove the byte at `at`. Returns `false` if `at` is out of range.
    pub(crate) fn remove(&mut self, at: usize, tab_stop: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        self.update_render(tab_stop);
        true
    }

    /// Append `content` to the end of the row.
    pub(crate) fn append(&mut self, content: &[u8], tab_stop: usize) {
        self.chars.extend_from_slice(content);
        self.update_render(tab_stop);
    }

    /// Cut the row at `at` (clamped) and return the tail.
    pub(crate) fn split_off(&mut self, at: usize, tab_stop: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update_render(tab_stop);
        tail
    }

    fn update_render(&mut self, tab_stop: usize) {
        self.render = expand_tabs(&self.chars, tab_stop);
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Row")
            .field(&String::from_utf8_lossy(&self.chars))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- cx_to_rx -----------------------------------------------------------

    #[test]
    fn rx_equals_cx_without_tabs() {
        let chars = b"hello world";
        for cx in 0..=chars.len() {
            assert_eq!(cx_to_rx(chars, cx, 8), cx);
        }
    }

    #[test]
    fn leading_tab_jumps_to_stop() {
        assert_eq!(cx_to_rx(b"\tx", 0, 8), 0);
        assert_eq!(cx_to_rx(b"\tx", 1, 8), 8);
        assert_eq!(cx_to_rx(b"\tx", 2, 8), 9);
    }

    #[test]
    fn tab_mid_stop_fills_remainder() {
        // "ab" occupies 0..2, the tab fills 2..4 with tab stop 4.
        assert_eq!(cx_to_rx(b"ab\tc", 3, 4), 4);
        assert_eq!(cx_to_rx(b"ab\tc", 4, 4), 5);
    }

    #[test]
    fn tab_at_exact_stop_takes_full_width() {
        assert_eq!(cx_to_rx(b"abcd\t", 5, 4), 8);
    }

    #[test]
    fn rx_is_monotonic() {
        let chars = b"\ta\t\tbc\td";
        let mut last = 0;
        for cx in 0..=chars.len() {
            let rx = cx_to_rx(chars, cx, 4);
            assert!(rx >= last, "rx decreased at cx={cx}");
            last = rx;
        }
    }

    #[test]
    fn cx_past_end_counts_existing_bytes() {
        assert_eq!(cx_to_rx(b"ab", 10, 8), 2);
    }

    #[test]
    fn rx_matches_render_prefix() {
        let chars = b"x\ty\t\tz";
        let render = expand_tabs(chars, 4);
        // The byte at cx lands at render[rx].
        for (cx, &byte) in chars.iter().enumerate() {
            let rx = cx_to_rx(chars, cx, 4);
            if byte != b'\t' {
                assert_eq!(render[rx], byte);
            }
        }
    }

    // -- expand_tabs --------------------------------------------------------

    #[test]
    fn expand_tabs_to_stop() {
        assert_eq!(expand_tabs(b"\tx", 4), b"    x".to_vec());
        assert_eq!(expand_tabs(b"ab\tx", 4), b"ab  x".to_vec());
        assert_eq!(expand_tabs(b"abcd\tx", 4), b"abcd    x".to_vec());
    }

    #[test]
    fn expand_without_tabs_is_identity() {
        assert_eq!(expand_tabs(b"plain", 8), b"plain".to_vec());
    }

    #[test]
    fn zero_tab_stop_treated_as_one() {
        assert_eq!(expand_tabs(b"a\tb", 0), b"a b".to_vec());
        assert_eq!(cx_to_rx(b"a\tb", 3, 0), 3);
    }

    #[test]
    fn huge_tab_stop_capped() {
        let render = expand_tabs(b"\t\tx", usize::MAX);
        assert_eq!(render.len(), 2 * MAX_TAB_STOP + 1);
        assert_eq!(cx_to_rx(b"\t\tx", 2, usize::MAX), 2 * MAX_TAB_STOP);
    }

    // -- Row mutation keeps render fresh -----------------------------------

    #[test]
    fn insert_updates_render() {
        let mut row = Row::new(b"ab".to_vec(), 4);
        row.insert(1, b'\t', 4);
        assert_eq!(row.chars(), b"a\tb");
        assert_eq!(row.render(), b"a   b");
    }

    #[test]
    fn insert_clamps_to_end() {
        let mut row = Row::new(b"ab".to_vec(), 4);
        row.insert(99, b'c', 4);
        assert_eq!(row.chars(), b"abc");
    }

    #[test]
    fn remove_updates_render() {
        let mut row = Row::new(b"a\tb".to_vec(), 4);
        assert!(row.remove(1, 4));
        assert_eq!(row.render(), b"ab");
    }

    #[test]
    fn remove_out_of_range_is_ignored() {
        let mut row = Row::new(b"ab".to_vec(), 4);
        assert!(!row.remove(2, 4));
        assert_eq!(row.chars(), b"ab");
    }

    #[test]
    fn append_and_split_update_render() {
        let mut row = Row::new(b"a".to_vec(), 4);
        row.append(b"\tb", 4);
        assert_eq!(row.render(), b"a   b");

        let tail = row.split_off(1, 4);
        assert_eq!(tail, b"\tb".to_vec());
        assert_eq!(row.chars(), b"a");
        assert_eq!(row.render(), b"a");
    }

    #[test]
    fn debug_shows_text() {
        let row = Row::new(b"hi".to_vec(), 8);
        assert_eq!(format!("{row:?}"), "Row(\"hi\")");
    }
}
