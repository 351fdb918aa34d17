// SPDX-License-Identifier: MIT
//
// ztext — a small screen-oriented terminal text editor.
//
// This is the main binary that wires the two crates together:
//
//   z-term   → raw mode, key decoding, append buffer, frame loop
//   z-editor → document, cursor, viewport, dispatch, compositor
//
// The editor's `Editor` implements z-term's `App`, so each key flows:
//
//   stdin → decoder → on_key → dispatch → document/cursor mutation
//   compose → compositor → append buffer → one write to stdout
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use z_editor::config::{self, Config};
use z_editor::{Editor, FileStore};
use z_term::event_loop::EventLoop;

/// Log file, written to the working directory when `RUST_LOG` is set.
const LOG_FILE: &str = "ztext.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ztext", version, about = "A small terminal text editor")]
struct Args {
    /// File to edit. Created on first save if it doesn't exist.
    path: Option<PathBuf>,
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// Install a file subscriber if `RUST_LOG` is set. The terminal is in raw
/// mode while we run, so nothing may be logged to stdout or stderr.
///
/// The returned guard flushes the writer on drop and must live until exit.
fn configure_logging() -> Option<WorkerGuard> {
    env::var_os("RUST_LOG")?;

    let appender = tracing_appender::rolling::never(Path::new("."), LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

/// The discovered config, or defaults if there is none or it is unusable.
fn load_config() -> Config {
    match config::load() {
        Ok(config) => config,
        Err(err) => {
            warn!(target: "runtime", %err, "config ignored, using defaults");
            Config::default()
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config();

    // Dropping the loop on any early return restores the terminal.
    let mut event_loop = EventLoop::new();
    let size = event_loop.start()?;
    info!(target: "runtime", rows = size.rows, cols = size.cols, "terminal ready");

    let mut editor = Editor::new(&config, size, FileStore);
    if let Some(path) = &args.path {
        editor.open(path)?;
    }

    event_loop.run(&mut editor)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    let _log_guard = configure_logging();
    info!(target: "runtime", path = ?args.path, "starting");

    if let Err(err) = run(&args) {
        error!(target: "runtime", %err, "fatal");
        eprintln!("ztext: {err}");
        process::exit(1);
    }

    info!(target: "runtime", "exit");
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_arguments() {
        let args = Args::try_parse_from(["ztext"]).unwrap();
        assert_eq!(args.path, None);
    }

    #[test]
    fn path_argument() {
        let args = Args::try_parse_from(["ztext", "notes.txt"]).unwrap();
        assert_eq!(args.path, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn extra_arguments_rejected() {
        assert!(Args::try_parse_from(["ztext", "a", "b"]).is_err());
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(Args::try_parse_from(["ztext", "--tab-stop", "4"]).is_err());
    }
}
