//! Prompt — a one-line text input shown in the message bar.
//!
//! Used to ask for a filename when saving a buffer that has none. While a
//! prompt is open it captures every key: printable ASCII is appended,
//! Backspace/Ctrl-H/Delete remove the last byte, Escape cancels, and Enter
//! submits if something was typed. Everything else is ignored.
//!
//! The prompt only edits at the end of the input; there is no cursor inside
//! it.

use z_term::input::{BACKSPACE, ENTER, Key, ctrl};

/// What a key did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Still collecting input.
    Pending,
    /// Enter on non-empty input. Carries the input.
    Submitted(String),
    /// Escape.
    Cancelled,
}

/// A message-bar prompt: `"{label}{input}{hint}"`.
#[derive(Debug, Clone)]
pub struct Prompt {
    label: &'static str,
    hint: &'static str,
    input: String,
}

impl Prompt {
    #[must_use]
    pub const fn new(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            input: String::new(),
        }
    }

    /// The filename prompt used by save.
    #[must_use]
    pub const fn save_as() -> Self {
        Self::new("Save as: ", " (ESC to cancel)")
    }

    /// What has been typed so far.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The full line to show in the message bar.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}{}", self.label, self.input, self.hint)
    }

    /// Feed one key.
    pub fn handle_key(&mut self, key: Key) -> PromptEvent {
        match key {
            Key::Escape => PromptEvent::Cancelled,
            Key::Delete => {
                self.input.pop();
                PromptEvent::Pending
            }
            Key::Byte(b) if b == BACKSPACE || b == ctrl(b'h') => {
                self.input.pop();
                PromptEvent::Pending
            }
            Key::Byte(ENTER) => {
                if self.input.is_empty() {
                    PromptEvent::Pending
                } else {
                    PromptEvent::Submitted(std::mem::take(&mut self.input))
                }
            }
            Key::Byte(b @ 0x20..=0x7e) => {
                self.input.push(char::from(b));
                PromptEvent::Pending
            }
            _ => PromptEvent::Pending,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
