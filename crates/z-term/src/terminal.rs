// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, size queries, restore.
//
// termios, TIOCGWINSZ, isatty and the emergency write in the panic hook are
// libc calls, hence the module-wide allow below. Unsafe blocks stay as
// small as the calls allow.
#![allow(unsafe_code)]
//
// `Terminal` is the only owner of the saved termios. Restoring it happens on
// `leave()`, on `Drop`, and from the panic hook (through a global copy), so
// the user's shell comes back usable however ZText exits.
//
// Raw mode here means: no echo, no canonical line buffering, no signal keys
// (Ctrl-C / Ctrl-Z arrive as bytes), no CR→NL translation on input, no
// output post-processing, 8-bit chars. Reads return after at most 100ms
// (VMIN=0, VTIME=1) so the frame loop never blocks forever.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::{ByteSource, StdinReader};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Create a size from `(rows, cols)`.
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { cols, rows }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// terminal reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Parse a cursor position report: `ESC [ <row> ; <col> R`.
///
/// The trailing `R` is optional (the reader stops on it). Returns `None` for
/// anything malformed or for a zero coordinate.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;

    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

/// Longest cursor report we accept, in bytes.
const MAX_REPORT_LEN: usize = 32;

/// How many empty reads we tolerate while waiting for the report.
const MAX_REPORT_WAITS: usize = 10;

/// Fallback size query: park the cursor in the bottom-right corner and ask
/// the terminal where it ended up.
fn query_size_via_cursor() -> Result<Size> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    ansi::cursor_to_far_corner(&mut lock)?;
    ansi::request_cursor_position(&mut lock)?;
    lock.flush()?;
    drop(lock);

    let mut reader = StdinReader::new();
    let mut reply = Vec::with_capacity(MAX_REPORT_LEN);
    let mut byte = [0u8; 1];
    let mut waits = 0;

    while reply.len() < MAX_REPORT_LEN && waits < MAX_REPORT_WAITS {
        if reader.read_chunk(&mut byte)? == 0 {
            waits += 1;
            continue;
        }
        if byte[0] == b'R' {
            break;
        }
        reply.push(byte[0]);
    }

    parse_cursor_report(&reply).ok_or(Error::SizeUnavailable)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Copy of the saved termios for the panic hook, which has no access to the
/// `Terminal` that owns the original.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Complete terminal restore sequence for emergency use: reset SGR
/// attributes, show cursor, exit alternate screen (last, so the shell
/// content reappears without editor artifacts).
const EMERGENCY_RESTORE: &[u8] = b"\x1b[m\x1b[?25h\x1b[?1049l";

/// The hook is process-wide; install it once.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Restore the terminal, log the panic, then hand over to the previous hook
/// so the message prints on a sane screen.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            tracing::error!(target: "term", %info, "panic");
            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor,
/// bypassing Rust's stdout lock (the panic may have happened while it was
/// held mid-frame).
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owns raw mode for the life of the editor.
///
/// Call [`enter`](Self::enter) to switch to editor mode (raw mode +
/// alternate screen). The terminal is restored when the handle is dropped,
/// and by the panic hook if the process panics.
///
/// # Example
///
/// ```no_run
/// use z_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// let size = term.query_size()?;
/// // ... render frames, handle input ...
/// // Terminal is restored automatically on drop.
/// # Ok::<(), z_term::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Last known size, refreshed by [`query_size`](Self::query_size) and
    /// [`refresh_size`](Self::refresh_size).
    size: Option<Size>,

    /// Whether we're in editor mode (raw + alt screen).
    active: bool,
}

impl Terminal {
    /// Create a terminal handle. Does **not** touch the terminal yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            size: None,
            active: false,
        }
    }

    /// Last known terminal size, if one has been queried.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Option<Size> {
        self.size
    }

    /// Whether we're currently in editor mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Determine the terminal size.
    ///
    /// Tries `ioctl(TIOCGWINSZ)` first. If that fails and stdin is a
    /// terminal, falls back to the cursor-position report. Call after
    /// [`enter`](Self::enter): the fallback needs raw mode to read the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeUnavailable`] if neither method yields a size.
    pub fn query_size(&mut self) -> Result<Size> {
        let size = match get_size() {
            Some(size) => size,
            None if is_tty() => {
                debug!(target: "term", "TIOCGWINSZ failed, asking for cursor report");
                query_size_via_cursor()?
            }
            None => return Err(Error::SizeUnavailable),
        };
        self.size = Some(size);
        Ok(size)
    }

    /// Re-query the terminal size after a resize.
    ///
    /// Only uses `ioctl`; keeps the previous size if that fails.
    pub fn refresh_size(&mut self) -> Option<Size> {
        match get_size() {
            Some(size) => self.size = Some(size),
            None => warn!(target: "term", "size refresh failed, keeping {:?}", self.size),
        }
        self.size
    }

    /// Enter editor mode: raw mode, then the alternate screen.
    ///
    /// Idempotent: calling `enter()` while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        lock.flush()?;

        self.active = true;
        debug!(target: "term", "entered raw mode");
        Ok(())
    }

    /// Leave editor mode and restore the terminal.
    ///
    /// Idempotent: calling `leave()` while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        ansi::cursor_home(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        ansi::exit_alt_screen(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        debug!(target: "term", "restored terminal");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error().into());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=1: read() returns after 100ms even with no input.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error().into());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error().into());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Cursor report parsing ─────────────────────────────────────────

    #[test]
    fn parse_report_with_terminator() {
        assert_eq!(parse_cursor_report(b"\x1b[24;80R"), Some(Size::new(24, 80)));
    }

    #[test]
    fn parse_report_without_terminator() {
        assert_eq!(parse_cursor_report(b"\x1b[50;132"), Some(Size::new(50, 132)));
    }

    #[test]
    fn parse_report_rejects_missing_prefix() {
        assert_eq!(parse_cursor_report(b"24;80R"), None);
        assert_eq!(parse_cursor_report(b"\x1b24;80R"), None);
    }

    #[test]
    fn parse_report_rejects_garbage() {
        assert_eq!(parse_cursor_report(b"\x1b[24R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[a;bR"), None);
        assert_eq!(parse_cursor_report(b""), None);
    }

    #[test]
    fn parse_report_rejects_zero() {
        assert_eq!(parse_cursor_report(b"\x1b[0;80R"), None);
        assert_eq!(parse_cursor_report(b"\x1b[24;0R"), None);
    }

    // ── Terminal queries ─────────────────────────────────────────────

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_exits_alt_screen_last() {
        assert!(EMERGENCY_RESTORE.ends_with(b"\x1b[?1049l"));
    }

    #[test]
    fn emergency_restore_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[?25h"));
        assert!(s.contains("\x1b[m"));
    }

    // ── Terminal struct ─────────────────────────────────────────────

    #[test]
    fn terminal_new_is_inactive() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert_eq!(term.size(), None);
    }

    #[test]
    fn terminal_enter_leave_cycle() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        assert!(term.is_active());
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_double_enter_is_idempotent() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.is_active());
        term.leave().unwrap();
    }

    #[test]
    fn terminal_leave_without_enter() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_drop_after_enter() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        drop(term);
    }
}
