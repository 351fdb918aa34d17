//! Configuration — `ztext.toml`.
//!
//! Looked up in the working directory first, then in the platform config
//! directory (`$XDG_CONFIG_HOME/ztext/ztext.toml` on Linux). A missing file
//! means defaults. Unknown keys are ignored so older binaries tolerate newer
//! files.
//!
//! ```toml
//! [editor]
//! tab_stop = 8
//! quit_times = 3
//! message_timeout_secs = 5
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::document::DEFAULT_TAB_STOP;
use crate::row;
use crate::status::DEFAULT_MESSAGE_TIMEOUT;

/// Config filename, both locally and under the config directory.
pub const CONFIG_FILE: &str = "ztext.toml";

/// A config file that exists but could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The `[editor]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditorConfig {
    /// Render width of a tab.
    #[serde(default = "EditorConfig::default_tab_stop")]
    pub tab_stop: usize,

    /// Ctrl-Q presses needed to quit with unsaved changes.
    #[serde(default = "EditorConfig::default_quit_times")]
    pub quit_times: u32,

    /// Seconds a status message stays visible.
    #[serde(default = "EditorConfig::default_message_timeout_secs")]
    pub message_timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
            quit_times: Self::default_quit_times(),
            message_timeout_secs: Self::default_message_timeout_secs(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_stop() -> usize {
        DEFAULT_TAB_STOP
    }
    const fn default_quit_times() -> u32 {
        3
    }
    const fn default_message_timeout_secs() -> u64 {
        DEFAULT_MESSAGE_TIMEOUT.as_secs()
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    /// Parse TOML text. `path` is only used for the error.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the text is not valid TOML or a value has
    /// the wrong type.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Tab stop, clamped to `1..=MAX_TAB_STOP`.
    #[must_use]
    pub fn tab_stop(&self) -> usize {
        row::clamp_tab_stop(self.editor.tab_stop)
    }

    /// Quit presses, never below 1.
    #[must_use]
    pub fn quit_times(&self) -> u32 {
        self.editor.quit_times.max(1)
    }

    #[must_use]
    pub const fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.editor.message_timeout_secs)
    }
}

/// The first config file that exists: `./ztext.toml`, then the one under the
/// platform config directory.
#[must_use]
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("ztext").join(CONFIG_FILE))
        .filter(|p| p.is_file())
}

/// Read and parse the config at `path`.
///
/// # Errors
///
/// [`ConfigError::Read`] if the file can't be read, [`ConfigError::Parse`]
/// if it isn't valid.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = Config::parse(&text, path)?;
    info!(target: "config", path = %path.display(), ?config, "loaded");
    Ok(config)
}

/// Load the discovered config, or defaults if there is none.
///
/// # Errors
///
/// See [`load_from`].
pub fn load() -> Result<Config, ConfigError> {
    discover().map_or_else(|| Ok(Config::default()), |path| load_from(&path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
