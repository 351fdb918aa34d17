//! Viewport — which slice of the document is on screen.
//!
//! The window is `rows` text lines tall (the terminal height minus the
//! status and message bars) and `cols` rendered columns wide, starting at
//! `(row_offset, col_offset)`. Horizontal offsets are in render columns, so
//! a tab-heavy line scrolls by what the user sees, not by bytes.
//!
//! [`Viewport::scroll`] is the only place the offsets move, and it moves
//! them the least amount needed to bring the cursor into view.

use z_term::terminal::Size;

/// Rows at the bottom of the screen reserved for the status and message
/// bars.
pub const RESERVED_ROWS: u16 = 2;

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    row_offset: usize,
    col_offset: usize,
    rows: usize,
    cols: usize,
}

impl Viewport {
    /// A viewport for a terminal of `size`, scrolled to the top-left.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let mut vp = Self::default();
        vp.resize(size);
        vp
    }

    // -- Accessors ----------------------------------------------------------

    /// First document row on screen.
    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First render column on screen.
    #[inline]
    #[must_use]
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Text rows (terminal height minus the two bars).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Text columns (terminal width).
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    // -- Updates ------------------------------------------------------------

    /// Adopt a new terminal size. Offsets are left alone; the next
    /// [`scroll`](Self::scroll) pulls the cursor back into view.
    pub fn resize(&mut self, size: Size) {
        self.rows = usize::from(size.rows.saturating_sub(RESERVED_ROWS));
        self.cols = usize::from(size.cols);
    }

    /// Move the offsets just enough that row `cy` and render column `rx`
    /// are inside the window:
    ///
    /// - `row_offset <= cy < row_offset + rows`
    /// - `col_offset <= rx < col_offset + cols`
    ///
    /// A zero-sized dimension has no valid window and is left alone.
    pub const fn scroll(&mut self, cy: usize, rx: usize) {
        if self.rows > 0 {
            if cy < self.row_offset {
                self.row_offset = cy;
            }
            if cy >= self.row_offset + self.rows {
                self.row_offset = cy - self.rows + 1;
            }
        }

        if self.cols > 0 {
            if rx < self.col_offset {
                self.col_offset = rx;
            }
            if rx >= self.col_offset + self.cols {
                self.col_offset = rx - self.cols + 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vp(rows: u16, cols: u16) -> Viewport {
        Viewport::new(Size::new(rows, cols))
    }

    fn in_view(v: &Viewport, cy: usize, rx: usize) -> bool {
        v.row_offset() <= cy
            && cy < v.row_offset() + v.rows()
            && v.col_offset() <= rx
            && rx < v.col_offset() + v.cols()
    }

    #[test]
    fn reserves_two_rows_for_bars() {
        let v = vp(24, 80);
        assert_eq!(v.rows(), 22);
        assert_eq!(v.cols(), 80);
    }

    #[test]
    fn tiny_terminal_has_no_text_rows() {
        assert_eq!(vp(1, 80).rows(), 0);
    }

    #[test]
    fn no_scroll_when_cursor_visible() {
        let mut v = vp(12, 20);
        v.scroll(5, 10);
        assert_eq!((v.row_offset(), v.col_offset()), (0, 0));
    }

    #[test]
    fn scroll_down_minimally() {
        let mut v = vp(12, 20); // 10 text rows
        v.scroll(10, 0);
        assert_eq!(v.row_offset(), 1);
        v.scroll(25, 0);
        assert_eq!(v.row_offset(), 16);
    }

    #[test]
    fn scroll_up_to_cursor() {
        let mut v = vp(12, 20);
        v.scroll(30, 0);
        v.scroll(4, 0);
        assert_eq!(v.row_offset(), 4);
    }

    #[test]
    fn scroll_right_and_back() {
        let mut v = vp(12, 20);
        v.scroll(0, 20);
        assert_eq!(v.col_offset(), 1);
        v.scroll(0, 3);
        assert_eq!(v.col_offset(), 3);
    }

    #[test]
    fn cursor_always_in_view_after_scroll() {
        let mut v = vp(7, 9);
        let path = [(0, 0), (40, 3), (2, 50), (17, 8), (0, 0), (99, 99), (50, 1)];
        for (cy, rx) in path {
            v.scroll(cy, rx);
            assert!(in_view(&v, cy, rx), "cursor ({cy}, {rx}) out of view: {v:?}");
        }
    }

    #[test]
    fn resize_keeps_offsets_until_next_scroll() {
        let mut v = vp(12, 20);
        v.scroll(15, 0);
        let before = v.row_offset();
        v.resize(Size::new(40, 20));
        assert_eq!(v.row_offset(), before);
        assert_eq!(v.rows(), 38);
        v.scroll(15, 0);
        assert!(in_view(&v, 15, 0));
    }

    #[test]
    fn zero_rows_leaves_offsets() {
        let mut v = vp(2, 20);
        v.scroll(10, 0);
        assert_eq!(v.row_offset(), 0);
    }
}
