//! Compositor — builds one complete frame of terminal output.
//!
//! Every frame is drawn from scratch into an [`OutputBuffer`] in a fixed
//! order:
//!
//! 1. hide the cursor, move home
//! 2. one line per text row: the visible slice of the row's render, `~` past
//!    the end of the document, or the welcome banner (empty document only,
//!    a third of the way down), each followed by clear-to-end-of-line
//! 3. the inverse-video status bar
//! 4. the message bar
//! 5. place the cursor, show it
//!
//! The caller writes the buffer in one call, so the terminal never shows a
//! half-drawn frame.

use std::io;
use std::path::Path;

use z_term::ansi;
use z_term::output::OutputBuffer;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::viewport::Viewport;

/// Shown in the status bar for a buffer without a filename.
pub const NO_NAME: &str = "[No Name]";

/// Filenames longer than this are cut in the status bar.
const MAX_NAME_WIDTH: usize = 20;

/// Centered on an empty document.
#[must_use]
pub fn welcome_banner() -> String {
    format!("ZText editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Everything a frame is drawn from. Borrowed; the compositor never mutates
/// editor state.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub document: &'a Document,
    pub cursor: Cursor,
    pub viewport: &'a Viewport,
    pub filename: Option<&'a Path>,
    /// Message bar text, already filtered for expiry.
    pub message: &'a str,
}

/// Append a full frame to `out`.
///
/// # Errors
///
/// Only if writing to `out` fails, which an in-memory buffer never does.
pub fn compose(frame: &Frame<'_>, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(frame, out)?;
    draw_status_bar(frame, out)?;
    draw_message_bar(frame, out)?;

    let vp = frame.viewport;
    let rx = frame.cursor.rx(frame.document);
    ansi::cursor_to(
        out,
        rx.saturating_sub(vp.col_offset()),
        frame.cursor.cy().saturating_sub(vp.row_offset()),
    )?;
    ansi::cursor_show(out)
}

fn draw_rows(frame: &Frame<'_>, out: &mut OutputBuffer) -> io::Result<()> {
    let doc = frame.document;
    let vp = frame.viewport;

    for y in 0..vp.rows() {
        if let Some(row) = doc.row(y + vp.row_offset()) {
            let render = row.render();
            let start = vp.col_offset().min(render.len());
            let end = (vp.col_offset() + vp.cols()).min(render.len());
            out.push_bytes(&render[start..end]);
        } else if doc.is_empty() && y == vp.rows() / 3 {
            draw_welcome(out, vp.cols());
        } else {
            out.push(b'~');
        }

        ansi::clear_line(out)?;
        out.push_bytes(b"\r\n");
    }

    Ok(())
}

fn draw_welcome(out: &mut OutputBuffer, cols: usize) {
    let banner = welcome_banner();
    let len = banner.len().min(cols);
    let mut padding = (cols - len) / 2;

    if padding > 0 {
        out.push(b'~');
        padding -= 1;
    }
    out.push_repeated(b' ', padding);
    out.push_bytes(&banner.as_bytes()[..len]);
}

fn draw_status_bar(frame: &Frame<'_>, out: &mut OutputBuffer) -> io::Result<()> {
    let doc = frame.document;
    let cols = frame.viewport.cols();

    let name: String = frame.filename.map_or_else(
        || NO_NAME.to_owned(),
        |p| p.display().to_string().chars().take(MAX_NAME_WIDTH).collect(),
    );
    let modified = if doc.is_dirty() { " (modified)" } else { "" };
    let left = format!("{name} - {} lines{modified}", doc.len());
    let right = format!("{}/{}", frame.cursor.cy() + 1, doc.len());

    ansi::inverse(out)?;

    let left_len = left.len().min(cols);
    out.push_bytes(&left.as_bytes()[..left_len]);

    // Right-align the position if it fits in what's left.
    let gap = cols - left_len;
    if gap >= right.len() {
        out.push_repeated(b' ', gap - right.len());
        out.push_bytes(right.as_bytes());
    } else {
        out.push_repeated(b' ', gap);
    }

    ansi::reset(out)?;
    out.push_bytes(b"\r\n");
    Ok(())
}

fn draw_message_bar(frame: &Frame<'_>, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::clear_line(out)?;
    let msg = frame.message.as_bytes();
    out.push_bytes(&msg[..msg.len().min(frame.viewport.cols())]);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
