//! Store — loading and saving document bytes.
//!
//! The editor never touches the filesystem directly; it goes through a
//! [`Store`] so the save and load paths can be exercised without disk I/O.
//! [`FileStore`] is the real implementation.
//!
//! # On-disk format
//!
//! Plain bytes. Loading splits on `\n` and strips any trailing `\r` from
//! each line, so CRLF files open cleanly (and are saved back as LF). A final
//! newline does not produce an extra empty row. Saving writes exactly what
//! [`Document::serialize`](crate::document::Document::serialize) produced.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// A failed load or save.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file does not exist. The editor treats this as a new file.
    #[error("{}: no such file", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// The underlying I/O error, if any.
    #[must_use]
    pub const fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::NotFound { .. } => None,
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Where documents come from and go to.
pub trait Store {
    /// Read `path` and split it into lines without terminators.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the file does not exist,
    /// [`StoreError::Read`] for any other failure.
    fn load(&self, path: &Path) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Replace the contents of `path` with `content`, creating the file if
    /// needed. Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`StoreError::Write`] if the file cannot be opened or written.
    fn save(&self, path: &Path, content: &[u8]) -> Result<usize, StoreError>;
}

/// The filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl Store for FileStore {
    fn load(&self, path: &Path) -> Result<Vec<Vec<u8>>, StoreError> {
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let lines = split_lines(&bytes);
        info!(target: "io", path = %path.display(), bytes = bytes.len(), lines = lines.len(), "loaded");
        Ok(lines)
    }

    fn save(&self, path: &Path, content: &[u8]) -> Result<usize, StoreError> {
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            file.write_all(content)?;
            file.flush()
        };

        write().map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(target: "io", path = %path.display(), bytes = content.len(), "saved");
        Ok(content.len())
    }
}

/// Split file bytes into rows. Each line loses its `\n` and any `\r`s
/// directly before it; a trailing newline ends the last row rather than
/// starting a new one.
#[must_use]
pub fn split_lines(bytes: &[u8]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return Vec::new();
    }

    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&b| b == b'\n')
        .map(|line| {
            let end = line.iter().rposition(|&b| b != b'\r').map_or(0, |i| i + 1);
            line[..end].to_vec()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn lines(v: &[&str]) -> Vec<Vec<u8>> {
        v.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    // -- split_lines --------------------------------------------------------

    #[test]
    fn split_empty_is_no_rows() {
        assert_eq!(split_lines(b""), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn split_trailing_newline_is_not_a_row() {
        assert_eq!(split_lines(b"a\nb\n"), lines(&["a", "b"]));
    }

    #[test]
    fn split_without_trailing_newline() {
        assert_eq!(split_lines(b"a\nb"), lines(&["a", "b"]));
    }

    #[test]
    fn split_keeps_blank_lines() {
        assert_eq!(split_lines(b"a\n\n\nb\n"), lines(&["a", "", "", "b"]));
        assert_eq!(split_lines(b"\n"), lines(&[""]));
    }

    #[test]
    fn split_strips_carriage_returns() {
        assert_eq!(split_lines(b"a\r\nb\r\n"), lines(&["a", "b"]));
        assert_eq!(split_lines(b"x\r\r\n"), lines(&["x"]));
    }

    #[test]
    fn split_keeps_tabs_and_high_bytes() {
        assert_eq!(split_lines(b"\t\xff\n"), vec![b"\t\xff".to_vec()]);
    }

    // -- FileStore ----------------------------------------------------------

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = FileStore.load(&path).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(err.io_error().is_none());
    }

    #[test]
    fn load_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileStore.load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let n = FileStore.save(&path, b"one\ntwo\n").unwrap();
        assert_eq!(n, 8);
        assert_eq!(fs::read(&path).unwrap(), b"one\ntwo\n".to_vec());
        assert_eq!(FileStore.load(&path).unwrap(), lines(&["one", "two"]));
    }

    #[test]
    fn save_truncates_longer_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"a much longer previous content\n").unwrap();
        FileStore.save(&path, b"x\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"x\n".to_vec());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = FileStore.save(&path, b"x\n").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(err.to_string().starts_with("cannot write"));
    }

    #[test]
    fn serialize_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let doc = Document::from_lines(lines(&["alpha", "", "\tbeta", "gamma"]), 8);
        FileStore.save(&path, &doc.serialize()).unwrap();

        let reloaded = Document::from_lines(FileStore.load(&path).unwrap(), 8);
        assert_eq!(reloaded.serialize(), doc.serialize());
    }
}
