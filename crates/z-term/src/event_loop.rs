// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — the heartbeat of the editor.
//
// One thread, one loop. Each turn:
//
//   1. compose the frame into the append buffer and write it in one call
//   2. block on stdin until bytes arrive or the read times out (100ms)
//   3. decode the bytes into keys
//   4. hand each key to the application, which mutates its state
//
// A timed-out read is not an error, it's a tick: the decoder resolves a
// pending lone ESC, the application gets a chance to expire its status
// message, and the loop reads again.
//
// # Signals
//
// SIGWINCH (resize) and SIGTERM/SIGHUP (termination) only set an
// `AtomicBool` — about the only thing a signal handler may safely do. The
// loop checks both flags each turn. Termination ends the loop normally, so
// the terminal is restored on that path too.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::input::{Decoder, Key};
use crate::output::OutputBuffer;
use crate::reader::{ByteSource, READ_BUF_SIZE, StdinReader};
use crate::terminal::{Size, Terminal};

// ─── Signals ─────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler. Checked each loop iteration.
static RESIZED: AtomicBool = AtomicBool::new(false);

/// Set by the SIGTERM / SIGHUP handler. Checked each loop iteration.
static TERMINATE: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_signal_handlers() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());

        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = terminate_handler as *const () as usize;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGTERM, &raw const sa, std::ptr::null_mut());
        libc::sigaction(libc::SIGHUP, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
extern "C" fn terminate_handler(_sig: libc::c_int) {
    TERMINATE.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Only [`on_key`](App::on_key) and [`compose`](App::compose) are required.
pub trait App {
    /// Handle one decoded key. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Handle a terminal resize.
    fn on_resize(&mut self, _size: Size) {}

    /// Called once per loop turn, including turns where the read timed out.
    ///
    /// Return `true` if time-based state changed and the frame needs
    /// redrawing (e.g. a status message just expired).
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Compose the complete frame into `out`. The buffer is empty on entry
    /// and is written to the terminal in one call afterwards.
    fn compose(&mut self, out: &mut OutputBuffer);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal frame loop.
///
/// Owns the terminal, the key decoder and the append buffer.
///
/// # Example
///
/// ```no_run
/// use z_term::event_loop::{Action, App, EventLoop};
/// use z_term::input::{Key, ctrl};
/// use z_term::output::OutputBuffer;
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_key(&mut self, key: Key) -> Action {
///         if key == Key::Byte(ctrl(b'q')) {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn compose(&mut self, out: &mut OutputBuffer) {
///         out.push_bytes(b"\x1b[Hhello");
///     }
/// }
///
/// let mut event_loop = EventLoop::new();
/// let _size = event_loop.start()?;
/// event_loop.run(&mut MyApp)?;
/// # Ok::<(), z_term::Error>(())
/// ```
#[derive(Default)]
pub struct EventLoop {
    terminal: Terminal,
    decoder: Decoder,
    out: OutputBuffer,
}

impl EventLoop {
    /// Create an event loop. The terminal is untouched until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminal: Terminal::new(),
            decoder: Decoder::new(),
            out: OutputBuffer::new(),
        }
    }

    /// Enter raw mode and determine the terminal size.
    ///
    /// On error the terminal is still restored: either by
    /// [`stop`](Self::stop) or when the loop is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered or the size is
    /// unavailable (fatal for the editor).
    pub fn start(&mut self) -> Result<Size> {
        self.terminal.enter()?;
        self.terminal.query_size()
    }

    /// Restore the terminal. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be restored.
    pub fn stop(&mut self) -> Result<()> {
        self.terminal.leave()
    }

    /// Run the loop on stdin/stdout until the application quits, then
    /// restore the terminal (even if the loop errored).
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails, or stdin
    /// is closed.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        install_signal_handlers();
        info!(target: "term", "event loop started");

        let mut source = StdinReader::new();
        let result = self.run_with(app, &mut source, &mut io::stdout());

        self.terminal.leave()?;
        info!(target: "term", "event loop stopped");
        result
    }

    /// The loop itself, over an arbitrary input source and output sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the source or sink fails.
    pub fn run_with(
        &mut self,
        app: &mut impl App,
        source: &mut impl ByteSource,
        sink: &mut impl Write,
    ) -> Result<()> {
        let mut buf = [0u8; READ_BUF_SIZE];
        let mut dirty = true; // First frame always renders.

        loop {
            if TERMINATE.swap(false, Ordering::Relaxed) {
                info!(target: "term", "termination signal received");
                return Ok(());
            }

            if RESIZED.swap(false, Ordering::Relaxed) {
                if let Some(size) = self.terminal.refresh_size() {
                    debug!(target: "term", rows = size.rows, cols = size.cols, "resized");
                    app.on_resize(size);
                    dirty = true;
                }
            }

            if app.on_tick() {
                dirty = true;
            }

            // ── Compose and write the frame ──────────────────────
            if dirty {
                self.out.clear();
                app.compose(&mut self.out);
                self.out.flush_to(sink)?;
                dirty = false;
            }

            // ── Read the next chunk ──────────────────────────────
            let n = match source.read_chunk(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Error::InputClosed);
                }
                Err(e) => return Err(e.into()),
            };

            let keys = if n == 0 {
                // Timeout: a pending lone ESC was the Escape key.
                self.decoder.flush().into_iter().collect()
            } else {
                self.decoder.advance(&buf[..n])
            };

            // ── Dispatch ─────────────────────────────────────────
            for key in keys {
                dirty = true;
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
