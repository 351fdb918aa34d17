//! Cursor — the logical caret position.
//!
//! `cx` is a byte offset into the current row's `chars`, `cy` a row index.
//! `cy` may equal `Document::len()`: that is the virtual empty row after the
//! last line, where typing appends a new row.
//!
//! # Invariant
//!
//! After every movement `0 <= cy <= doc.len()` and `0 <= cx <= row_len(cy)`
//! (with `row_len` of the virtual row being 0). Methods that move the cursor
//! take the document as a parameter and clamp before returning; the cursor
//! does not own or reference it.
//!
//! # Wrapping
//!
//! Left at column 0 wraps to the end of the previous row, and right at the
//! end of a row wraps to column 0 of the next one. Up/Down keep `cx` and
//! clamp it to the target row; there is no sticky column.

use crate::document::Document;

/// A caret in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    cx: usize,
    cy: usize,
}

impl Cursor {
    /// Cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0 }
    }

    // -- Accessors ----------------------------------------------------------

    /// Logical column (byte offset).
    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    /// Row index.
    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    /// Rendered column for the current position.
    #[must_use]
    pub fn rx(&self, doc: &Document) -> usize {
        doc.row(self.cy)
            .map_or(0, |row| row.cx_to_rx(self.cx, doc.tab_stop()))
    }

    // -- Direct positioning -------------------------------------------------

    /// Move to `(cx, cy)`, clamped to the document.
    pub fn set(&mut self, cx: usize, cy: usize, doc: &Document) {
        self.cy = cy.min(doc.len());
        self.cx = cx.min(doc.row_len(self.cy));
    }

    /// Move to row `cy` keeping the column, clamped to the document.
    pub fn goto_row(&mut self, cy: usize, doc: &Document) {
        self.set(self.cx, cy, doc);
    }

    // -- Movement -----------------------------------------------------------

    /// One byte left, wrapping to the end of the previous row.
    pub fn move_left(&mut self, doc: &Document) {
        if self.cx > 0 {
            self.cx -= 1;
        } else if self.cy > 0 {
            self.cy -= 1;
            self.cx = doc.row_len(self.cy);
        }
    }

    /// One byte right, wrapping to column 0 of the next row. Does nothing on
    /// the virtual row.
    pub fn move_right(&mut self, doc: &Document) {
        let Some(row) = doc.row(self.cy) else {
            return;
        };
        if self.cx < row.len() {
            self.cx += 1;
        } else {
            self.cy += 1;
            self.cx = 0;
        }
    }

    /// One row up, clamping the column.
    pub fn move_up(&mut self, doc: &Document) {
        self.cy = self.cy.saturating_sub(1);
        self.clamp_col(doc);
    }

    /// One row down (at most onto the virtual row), clamping the column.
    pub fn move_down(&mut self, doc: &Document) {
        if self.cy < doc.len() {
            self.cy += 1;
        }
        self.clamp_col(doc);
    }

    /// Column 0.
    pub const fn move_to_line_start(&mut self) {
        self.cx = 0;
    }

    /// End of the current row (0 on the virtual row).
    pub fn move_to_line_end(&mut self, doc: &Document) {
        self.cx = doc.row_len(self.cy);
    }

    fn clamp_col(&mut self, doc: &Document) {
        self.cx = self.cx.min(doc.row_len(self.cy));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
