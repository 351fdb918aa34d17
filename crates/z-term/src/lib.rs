// SPDX-License-Identifier: MIT
//
// z-term — Terminal layer for ZText.
//
// Everything that touches the terminal lives here: raw mode and its
// guaranteed restore, the size query (ioctl with a cursor-report fallback),
// the ANSI sequences the compositor emits, the append buffer that carries a
// whole frame to the terminal in one write, the key decoder that turns
// stdin bytes into keys, and the single-threaded frame loop tying them
// together.
//
// No TUI framework underneath: the editor speaks plain VT100 and termios.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
