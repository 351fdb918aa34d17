//! Document — the row-based text buffer.
//!
//! An ordered `Vec` of [`Row`]s plus a dirty flag. Row indices are always
//! contiguous `0..len()`; an empty document (zero rows) is the valid "new
//! file" state.
//!
//! Every mutation is a single step that either applies completely or is
//! rejected up front by a bounds check. Rejected calls return `false` and
//! leave the document untouched (including the dirty flag); there is never
//! anything to roll back.
//!
//! The persisted format is fixed: each row's bytes followed by `\n`, in
//! order. See [`serialize`](Document::serialize).

use tracing::trace;

use crate::row::{Row, clamp_tab_stop};

/// Default tab stop when no configuration overrides it.
pub const DEFAULT_TAB_STOP: usize = 8;

/// The text being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
    tab_stop: usize,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty, clean document.
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            tab_stop: clamp_tab_stop(tab_stop),
        }
    }

    /// Create a clean document from newline-free lines.
    #[must_use]
    pub fn from_lines<I>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vec<u8>>,
    {
        let tab_stop = clamp_tab_stop(tab_stop);
        Self {
            rows: lines.into_iter().map(|l| Row::new(l, tab_stop)).collect(),
            dirty: false,
            tab_stop,
        }
    }

    // -- Access -------------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `at`, if it exists.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Length of row `at`, or 0 for the virtual row past the end.
    #[inline]
    #[must_use]
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    /// The tab stop used for every row's render cache.
    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// True if the document changed since it was loaded or last saved.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a successful save.
    #[inline]
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    // -- Row operations -----------------------------------------------------

    /// Insert a new row with `content` at `at` (`0..=len()`), shifting later
    /// rows down. Ignored if `at` is out of range.
    pub fn insert_row(&mut self, at: usize, content: &[u8]) -> bool {
        if at > self.rows.len() {
            return false;
        }
        self.rows.insert(at, Row::new(content, self.tab_stop));
        self.dirty = true;
        trace!(target: "document", at, len = content.len(), "insert_row");
        true
    }

    /// Remove row `at` (`0..len()`), shifting later rows up. Ignored if `at`
    /// is out of range.
    pub fn delete_row(&mut self, at: usize) -> bool {
        if at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        self.dirty = true;
        trace!(target: "document", at, "delete_row");
        true
    }

    /// Append `content` to the end of row `row`. Used to merge a line into
    /// the previous one.
    pub fn append_to_row(&mut self, row: usize, content: &[u8]) -> bool {
        let tab_stop = self.tab_stop;
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        r.append(content, tab_stop);
        self.dirty = true;
        trace!(target: "document", row, len = content.len(), "append_to_row");
        true
    }

    /// Split row `row` at `at`: the bytes from `at` on move to a new row
    /// inserted right after it. `at` is clamped to the row length.
    pub fn split_row(&mut self, row: usize, at: usize) -> bool {
        let tab_stop = self.tab_stop;
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        let tail = r.split_off(at, tab_stop);
        self.rows.insert(row + 1, Row::new(tail, tab_stop));
        self.dirty = true;
        trace!(target: "document", row, at, "split_row");
        true
    }

    // -- Character operations -----------------------------------------------

    /// Insert `byte` into row `row` at `at`, clamped to the row length.
    pub fn insert_char(&mut self, row: usize, at: usize, byte: u8) -> bool {
        let tab_stop = self.tab_stop;
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        r.insert(at, byte, tab_stop);
        self.dirty = true;
        trace!(target: "document", row, at, byte, "insert_char");
        true
    }

    /// Delete the byte at `at` (`0..len`) in row `row`. Ignored if either
    /// index is out of range.
    pub fn delete_char(&mut self, row: usize, at: usize) -> bool {
        let tab_stop = self.tab_stop;
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        if !r.remove(at, tab_stop) {
            return false;
        }
        self.dirty = true;
        trace!(target: "document", row, at, "delete_char");
        true
    }

    // -- Persistence format -------------------------------------------------

    /// Every row followed by `\n`, in order. Total length is
    /// `Σ(row.len() + 1)`. A file saved from here always ends with a newline.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(row.chars());
            out.push(b'\n');
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes().to_vec()), 4)
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.rows()
            .iter()
            .map(|r| String::from_utf8_lossy(r.chars()).into_owned())
            .collect()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_document_is_empty_and_clean() {
        let d = Document::new(8);
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
        assert!(!d.is_dirty());
        assert_eq!(d.serialize(), Vec::<u8>::new());
    }

    #[test]
    fn from_lines_is_clean() {
        let d = doc(&["a", "b"]);
        assert_eq!(d.len(), 2);
        assert!(!d.is_dirty());
    }

    #[test]
    fn tab_stop_at_least_one() {
        assert_eq!(Document::new(0).tab_stop(), 1);
    }

    #[test]
    fn oversized_tab_stop_is_capped() {
        let d = Document::from_lines([b"\t\tx".to_vec()], usize::MAX);
        assert_eq!(d.tab_stop(), crate::row::MAX_TAB_STOP);
        assert_eq!(d.row(0).map(|r| r.render().len()), Some(33));
    }

    #[test]
    fn row_len_of_virtual_row_is_zero() {
        let d = doc(&["abc"]);
        assert_eq!(d.row_len(0), 3);
        assert_eq!(d.row_len(1), 0);
    }

    // -- insert_row / delete_row --------------------------------------------

    #[test]
    fn insert_row_shifts_down() {
        let mut d = doc(&["a", "c"]);
        assert!(d.insert_row(1, b"b"));
        assert_eq!(texts(&d), vec!["a", "b", "c"]);
        assert!(d.is_dirty());
    }

    #[test]
    fn insert_row_at_end() {
        let mut d = doc(&["a"]);
        assert!(d.insert_row(1, b"z"));
        assert_eq!(texts(&d), vec!["a", "z"]);
    }

    #[test]
    fn insert_row_out_of_range_ignored() {
        let mut d = doc(&["a"]);
        assert!(!d.insert_row(5, b"z"));
        assert_eq!(texts(&d), vec!["a"]);
        assert!(!d.is_dirty());
    }

    #[test]
    fn insert_row_builds_render() {
        let mut d = Document::new(4);
        d.insert_row(0, b"\tx");
        assert_eq!(d.row(0).unwrap().render(), b"    x");
    }

    #[test]
    fn delete_row_shifts_up() {
        let mut d = doc(&["a", "b", "c"]);
        assert!(d.delete_row(1));
        assert_eq!(texts(&d), vec!["a", "c"]);
        assert!(d.is_dirty());
    }

    #[test]
    fn delete_row_out_of_range_ignored() {
        let mut d = doc(&["a"]);
        assert!(!d.delete_row(1));
        assert!(!d.is_dirty());
    }

    #[test]
    fn insert_then_delete_round_trips() {
        let original = doc(&["one", "two", "three"]);
        for at in 0..=original.len() {
            let mut d = original.clone();
            d.insert_row(at, b"new");
            d.delete_row(at);
            assert_eq!(texts(&d), texts(&original), "at = {at}");
        }
    }

    // -- Character operations -----------------------------------------------

    #[test]
    fn insert_char_in_middle() {
        let mut d = doc(&["ac"]);
        assert!(d.insert_char(0, 1, b'b'));
        assert_eq!(texts(&d), vec!["abc"]);
        assert!(d.is_dirty());
    }

    #[test]
    fn insert_char_clamps_column() {
        let mut d = doc(&["ab"]);
        assert!(d.insert_char(0, 10, b'c'));
        assert_eq!(texts(&d), vec!["abc"]);
    }

    #[test]
    fn insert_char_missing_row_ignored() {
        let mut d = doc(&["ab"]);
        assert!(!d.insert_char(1, 0, b'c'));
        assert!(!d.is_dirty());
    }

    #[test]
    fn delete_char_valid() {
        let mut d = doc(&["abc"]);
        assert!(d.delete_char(0, 1));
        assert_eq!(texts(&d), vec!["ac"]);
    }

    #[test]
    fn delete_char_at_row_end_ignored() {
        let mut d = doc(&["abc"]);
        assert!(!d.delete_char(0, 3));
        assert_eq!(texts(&d), vec!["abc"]);
        assert!(!d.is_dirty());
    }

    #[test]
    fn delete_char_updates_render() {
        let mut d = doc(&["a\tb"]);
        d.delete_char(0, 1);
        assert_eq!(d.row(0).unwrap().render(), b"ab");
    }

    // -- append / split -----------------------------------------------------

    #[test]
    fn append_to_row_merges() {
        let mut d = doc(&["ab", "cd"]);
        assert!(d.append_to_row(0, b"cd"));
        assert_eq!(texts(&d), vec!["abcd", "cd"]);
    }

    #[test]
    fn split_row_middle() {
        let mut d = doc(&["ab"]);
        assert!(d.split_row(0, 1));
        assert_eq!(texts(&d), vec!["a", "b"]);
        assert!(d.is_dirty());
    }

    #[test]
    fn split_row_at_end_makes_empty_row() {
        let mut d = doc(&["ab", "x"]);
        assert!(d.split_row(0, 2));
        assert_eq!(texts(&d), vec!["ab", "", "x"]);
    }

    #[test]
    fn split_missing_row_ignored() {
        let mut d = doc(&["ab"]);
        assert!(!d.split_row(3, 0));
        assert_eq!(d.len(), 1);
    }

    // -- Dirty flag ---------------------------------------------------------

    #[test]
    fn mark_clean_resets_dirty() {
        let mut d = doc(&["a"]);
        d.insert_char(0, 0, b'x');
        assert!(d.is_dirty());
        d.mark_clean();
        assert!(!d.is_dirty());
    }

    // -- serialize ----------------------------------------------------------

    #[test]
    fn serialize_appends_newline_per_row() {
        let d = doc(&["ab", "", "c"]);
        assert_eq!(d.serialize(), b"ab\n\nc\n".to_vec());
    }

    #[test]
    fn serialize_length_is_sum_of_rows_plus_newlines() {
        let d = doc(&["hello", "\tworld", ""]);
        let expected: usize = d.rows().iter().map(|r| r.len() + 1).sum();
        assert_eq!(d.serialize().len(), expected);
    }

    #[test]
    fn serialize_keeps_raw_tabs() {
        let d = doc(&["\tx"]);
        assert_eq!(d.serialize(), b"\tx\n".to_vec());
    }
}
