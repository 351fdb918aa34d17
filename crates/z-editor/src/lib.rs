//! # z-editor — Editor core for ZText
//!
//! Everything between the decoded key and the composed frame:
//!
//! - **[`row`]** — `Row` (logical bytes + tab-expanded render) and the
//!   `cx → rx` mapping
//! - **[`document`]** — `Document`, the row buffer with its dirty flag and
//!   persisted format
//! - **[`cursor`]** — logical caret with wrapping and clamping movement
//! - **[`viewport`]** — the visible window and minimal scrolling
//! - **[`status`]** — the timed message bar text
//! - **[`prompt`]** — the save-as filename prompt
//! - **[`store`]** — `Store` trait for loading/saving, and `FileStore`
//! - **[`config`]** — `ztext.toml` discovery and parsing
//! - **[`editor`]** — `Editor`, the key dispatcher and z-term `App`
//! - **[`compositor`]** — one frame of terminal output

pub mod compositor;
pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod prompt;
pub mod row;
pub mod status;
pub mod store;
pub mod viewport;

pub use config::{Config, ConfigError};
pub use editor::Editor;
pub use store::{FileStore, Store, StoreError};
