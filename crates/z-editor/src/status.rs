//! Status message — the transient line under the status bar.
//!
//! A message is a string plus the instant it was set. It is shown until a
//! fixed timeout has elapsed and then disappears on its own. Setting a new
//! message replaces the old one and restarts the clock.
//!
//! Time is passed in rather than read here so tests can step it.

use std::time::{Duration, Instant};

/// How long a message stays on screen unless configured otherwise.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// The message bar's content.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            set_at: None,
        }
    }

    /// Replace the message and stamp it with `now`.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.set_at = Some(now);
    }

    /// The raw text, whether or not it has expired.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True if a non-empty message was set less than `timeout` before `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant, timeout: Duration) -> bool {
        !self.text.is_empty()
            && self
                .set_at
                .is_some_and(|at| now.saturating_duration_since(at) < timeout)
    }

    /// The text to draw at `now`: the message while visible, else empty.
    #[must_use]
    pub fn visible_text(&self, now: Instant, timeout: Duration) -> &str {
        if self.is_visible(now, timeout) {
            &self.text
        } else {
            ""
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

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn empty_message_is_never_visible() {
        let msg = StatusMessage::new();
        assert!(!msg.is_visible(Instant::now(), TIMEOUT));
        assert_eq!(msg.visible_text(Instant::now(), TIMEOUT), "");
    }

    #[test]
    fn visible_within_timeout() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("hello", t0);
        assert!(msg.is_visible(t0, TIMEOUT));
        assert_eq!(msg.visible_text(t0 + Duration::from_secs(4), TIMEOUT), "hello");
    }

    #[test]
    fn hidden_after_timeout() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("hello", t0);
        assert!(!msg.is_visible(t0 + TIMEOUT, TIMEOUT));
        assert_eq!(msg.visible_text(t0 + Duration::from_secs(6), TIMEOUT), "");
        assert_eq!(msg.text(), "hello");
    }

    #[test]
    fn setting_again_restarts_clock() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("first", t0);
        let t1 = t0 + Duration::from_secs(4);
        msg.set("second", t1);
        assert_eq!(msg.visible_text(t0 + Duration::from_secs(8), TIMEOUT), "second");
    }

    #[test]
    fn empty_text_hides_immediately() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new();
        msg.set("", t0);
        assert!(!msg.is_visible(t0, TIMEOUT));
    }
}
