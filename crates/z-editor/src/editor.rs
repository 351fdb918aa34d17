//! Editor — the command dispatcher.
//!
//! Owns the whole editing state (document, cursor, viewport, filename,
//! status message, open prompt, quit confirmation) and turns each decoded
//! key into a state transition. It is the [`App`] the frame loop drives:
//! keys come in through [`on_key`](App::on_key), frames go out through
//! [`compose`](App::compose).
//!
//! # Key bindings
//!
//! | Key                       | Action                                   |
//! |---------------------------|------------------------------------------|
//! | Enter                     | split the row at the cursor              |
//! | Ctrl-Q                    | quit (repeated when there are changes)   |
//! | Ctrl-S                    | save, prompting for a name if needed     |
//! | Backspace / Ctrl-H        | delete before the cursor, merging rows   |
//! | Delete                    | delete under the cursor                  |
//! | Arrows / Home / End       | move                                     |
//! | PageUp / PageDown         | move a screen                            |
//! | Ctrl-L / Escape           | nothing                                  |
//! | any other byte            | insert                                   |
//!
//! # Quit confirmation
//!
//! Quitting a clean document is immediate. With unsaved changes Ctrl-Q has
//! to be pressed `quit_times` times in a row; each press but the last shows
//! how many remain, and any other key starts the count over.
//!
//! Edits never fail: out-of-range operations are rejected by the document
//! and the cursor is always clamped. The only fallible operation, saving,
//! reports through the message bar.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};
use z_term::event_loop::{Action, App};
use z_term::input::{BACKSPACE, ENTER, Key, ctrl};
use z_term::output::OutputBuffer;
use z_term::terminal::Size;

use crate::compositor::{self, Frame};
use crate::config::Config;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::prompt::{Prompt, PromptEvent};
use crate::status::StatusMessage;
use crate::store::{FileStore, Store, StoreError};
use crate::viewport::Viewport;

/// Shown once at startup.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit";

const QUIT: u8 = ctrl(b'q');
const SAVE: u8 = ctrl(b's');
const CTRL_H: u8 = ctrl(b'h');
const REFRESH: u8 = ctrl(b'l');

/// Where the quit confirmation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitState {
    Normal,
    /// Ctrl-Q was pressed on a dirty document; this many more presses quit.
    Confirming(u32),
}

/// The editing session.
#[derive(Debug)]
pub struct Editor<S: Store = FileStore> {
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    filename: Option<PathBuf>,
    message: StatusMessage,
    /// Whether the last composed frame showed the message. Lets the idle
    /// tick notice the moment it expires.
    message_shown: bool,
    prompt: Option<Prompt>,
    quit: QuitState,
    quit_times: u32,
    message_timeout: Duration,
    store: S,
}

impl<S: Store> Editor<S> {
    /// An empty, unnamed document on a terminal of `size`.
    #[must_use]
    pub fn new(config: &Config, size: Size, store: S) -> Self {
        let mut message = StatusMessage::new();
        message.set(HELP_MESSAGE, Instant::now());

        Self {
            document: Document::new(config.tab_stop()),
            cursor: Cursor::new(),
            viewport: Viewport::new(size),
            filename: None,
            message,
            message_shown: false,
            prompt: None,
            quit: QuitState::Normal,
            quit_times: config.quit_times(),
            message_timeout: config.message_timeout(),
            store,
        }
    }

    /// Load `path` into a fresh document bound to that name. A path that
    /// doesn't exist yet opens as an empty document and is created on the
    /// first save.
    ///
    /// # Errors
    ///
    /// Any load failure other than the file not existing.
    pub fn open(&mut self, path: &Path) -> Result<(), StoreError> {
        let tab_stop = self.document.tab_stop();
        self.document = match self.store.load(path) {
            Ok(lines) => Document::from_lines(lines, tab_stop),
            Err(StoreError::NotFound { .. }) => {
                info!(target: "io", path = %path.display(), "new file");
                Document::new(tab_stop)
            }
            Err(err) => return Err(err),
        };
        self.cursor = Cursor::new();
        self.filename = Some(path.to_path_buf());
        self.scroll();
        Ok(())
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// The current status message, expired or not.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.text()
    }

    #[inline]
    #[must_use]
    pub const fn quit_state(&self) -> QuitState {
        self.quit
    }

    /// True while the save-as prompt has the keyboard.
    #[inline]
    #[must_use]
    pub const fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replace the status message.
    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message.set(text, Instant::now());
    }

    // -- Dispatch -----------------------------------------------------------

    /// Apply one key.
    pub fn handle_key(&mut self, key: Key) -> Action {
        if self.prompt.is_some() {
            self.prompt_key(key);
            self.scroll();
            return Action::Continue;
        }

        if key == Key::Byte(QUIT) {
            return self.request_quit();
        }
        self.quit = QuitState::Normal;

        match key {
            Key::Byte(ENTER) => self.insert_newline(),
            Key::Byte(SAVE) => self.save(),
            Key::Byte(BACKSPACE | CTRL_H) => self.delete_back(),
            Key::Delete => {
                self.cursor.move_right(&self.document);
                self.delete_back();
            }
            Key::Byte(REFRESH) | Key::Escape => {}
            Key::Byte(byte) => self.insert_char(byte),

            Key::Left => self.cursor.move_left(&self.document),
            Key::Right => self.cursor.move_right(&self.document),
            Key::Up => self.cursor.move_up(&self.document),
            Key::Down => self.cursor.move_down(&self.document),
            Key::Home => self.cursor.move_to_line_start(),
            Key::End => self.cursor.move_to_line_end(&self.document),
            Key::PageUp => self.page_up(),
            Key::PageDown => self.page_down(),
        }

        self.scroll();
        Action::Continue
    }

    /// The message bar text at `now`. An open prompt is always shown; other
    /// messages disappear after the timeout.
    #[must_use]
    pub fn visible_message(&self, now: Instant) -> Cow<'_, str> {
        match &self.prompt {
            Some(prompt) => Cow::Owned(prompt.display()),
            None => Cow::Borrowed(self.message.visible_text(now, self.message_timeout)),
        }
    }

    /// True if the message was on screen last frame and has since expired,
    /// so the frame needs redrawing.
    pub fn message_expired(&mut self, now: Instant) -> bool {
        let expired = self.message_shown && self.visible_message(now).is_empty();
        if expired {
            self.message_shown = false;
        }
        expired
    }

    fn scroll(&mut self) {
        let rx = self.cursor.rx(&self.document);
        self.viewport.scroll(self.cursor.cy(), rx);
    }

    // -- Editing ------------------------------------------------------------

    fn insert_char(&mut self, byte: u8) {
        let (cx, cy) = (self.cursor.cx(), self.cursor.cy());
        if cy == self.document.len() {
            self.document.insert_row(cy, b"");
        }
        self.document.insert_char(cy, cx, byte);
        self.cursor.set(cx + 1, cy, &self.document);
    }

    fn insert_newline(&mut self) {
        let (cx, cy) = (self.cursor.cx(), self.cursor.cy());
        if cx == 0 {
            self.document.insert_row(cy, b"");
        } else {
            self.document.split_row(cy, cx);
        }
        self.cursor.set(0, cy + 1, &self.document);
    }

    fn delete_back(&mut self) {
        let (cx, cy) = (self.cursor.cx(), self.cursor.cy());
        if cy == self.document.len() || (cx == 0 && cy == 0) {
            return;
        }

        if cx > 0 {
            self.document.delete_char(cy, cx - 1);
            self.cursor.set(cx - 1, cy, &self.document);
        } else {
            let prev_len = self.document.row_len(cy - 1);
            let moved = self
                .document
                .row(cy)
                .map(|row| row.chars().to_vec())
                .unwrap_or_default();
            self.document.append_to_row(cy - 1, &moved);
            self.document.delete_row(cy);
            self.cursor.set(prev_len, cy - 1, &self.document);
        }
    }

    // -- Paging -------------------------------------------------------------

    fn page_up(&mut self) {
        self.cursor.goto_row(self.viewport.row_offset(), &self.document);
        for _ in 0..self.viewport.rows() {
            self.cursor.move_up(&self.document);
        }
    }

    fn page_down(&mut self) {
        let bottom = (self.viewport.row_offset() + self.viewport.rows())
            .saturating_sub(1)
            .min(self.document.len());
        self.cursor.goto_row(bottom, &self.document);
        for _ in 0..self.viewport.rows() {
            self.cursor.move_down(&self.document);
        }
    }

    // -- Quit ---------------------------------------------------------------

    fn request_quit(&mut self) -> Action {
        if !self.document.is_dirty() {
            info!(target: "dispatch", "quit");
            return Action::Quit;
        }

        let remaining = match self.quit {
            QuitState::Normal => self.quit_times.saturating_sub(1),
            QuitState::Confirming(k) => k.saturating_sub(1),
        };
        if remaining == 0 {
            info!(target: "dispatch", "quit discarding changes");
            return Action::Quit;
        }

        self.quit = QuitState::Confirming(remaining);
        self.set_message(format!(
            "WARNING!!! File has unsaved changes. Press Ctrl-Q {remaining} more times to quit."
        ));
        Action::Continue
    }

    // -- Save ---------------------------------------------------------------

    fn save(&mut self) {
        if let Some(path) = self.filename.clone() {
            self.write_to(&path);
        } else {
            let prompt = Prompt::save_as();
            self.set_message(prompt.display());
            self.prompt = Some(prompt);
        }
    }

    fn prompt_key(&mut self, key: Key) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        match prompt.handle_key(key) {
            PromptEvent::Pending => {
                let text = prompt.display();
                self.set_message(text);
            }
            PromptEvent::Cancelled => {
                self.prompt = None;
                self.set_message("Save aborted");
            }
            PromptEvent::Submitted(name) => {
                self.prompt = None;
                let path = PathBuf::from(name);
                self.filename = Some(path.clone());
                self.write_to(&path);
            }
        }
    }

    fn write_to(&mut self, path: &Path) {
        let content = self.document.serialize();
        match self.store.save(path, &content) {
            Ok(n) => {
                self.document.mark_clean();
                debug!(target: "dispatch", path = %path.display(), bytes = n, "saved");
                self.set_message(format!("{n} bytes written to disk"));
            }
            Err(err) => {
                warn!(target: "dispatch", %err, "save failed");
                let reason = err
                    .io_error()
                    .map_or_else(|| err.to_string(), ToString::to_string);
                self.set_message(format!("Can't save! I/O error: {reason}"));
            }
        }
    }
}

impl<S: Store> App for Editor<S> {
    fn on_key(&mut self, key: Key) -> Action {
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        self.viewport.resize(size);
        self.scroll();
    }

    fn on_tick(&mut self) -> bool {
        self.message_expired(Instant::now())
    }

    fn compose(&mut self, out: &mut OutputBuffer) {
        self.scroll();

        let message = self.visible_message(Instant::now());
        let shown = !message.is_empty();

        let frame = Frame {
            document: &self.document,
            cursor: self.cursor,
            viewport: &self.viewport,
            filename: self.filename.as_deref(),
            message: &message,
        };
        if let Err(err) = compositor::compose(&frame, out) {
            error!(target: "dispatch", %err, "compose failed");
        }
        self.message_shown = shown;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
