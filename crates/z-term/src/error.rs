// SPDX-License-Identifier: MIT
//
// Terminal-layer errors. Everything here is fatal to the editor: the frame
// loop cannot continue without a working terminal.

use std::io;

use thiserror::Error;

/// Errors raised by the terminal layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A termios call, a write to stdout or a read from stdin failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Neither `TIOCGWINSZ` nor the cursor-position report produced a size.
    #[error("unable to determine the terminal size")]
    SizeUnavailable,

    /// Stdin reached end-of-file.
    #[error("input stream closed")]
    InputClosed,
}

/// Result alias for the terminal layer.
pub type Result<T, E = Error> = std::result::Result<T, E>;
