//! Expansion of a path into the flat set of files it denotes

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Expand `path` with default settings.
///
/// See [`Enumerator::expand`].
pub fn expand(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    Enumerator::new().expand(path)
}

/// Turns a path into a list of files.
///
/// A file yields itself, a directory yields every regular file below it at
/// any depth. Directories are never yielded. Symlinks to regular files are
/// yielded as files; symlinked directories are only descended into when
/// `follow_links` is set.
#[derive(Debug, Clone, Default)]
pub struct Enumerator {
    follow_links: bool,
    excluded: Vec<PathBuf>,
}

impl Enumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into symlinked directories.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Never yield anything at or below `path`.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.iter().any(|ex| path.starts_with(ex))
    }

    /// Expand `path` into absolute file paths.
    ///
    /// Order follows directory listing order. Unreadable entries below the
    /// starting point are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `path` does not exist, and
    /// [`Error::Io`] if it cannot be stat'ed or, for a directory, read.
    pub fn expand(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;

        if self.is_excluded(path) {
            debug!(path = %path.display(), "Path is excluded");
            return Ok(Vec::new());
        }

        if meta.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !meta.is_dir() {
            debug!(path = %path.display(), "Skipping special file");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut walker = WalkDir::new(path).follow_links(self.follow_links).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Err(Error::io(path, source));
                }
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if self.is_excluded(entry.path()) {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_file() {
                files.push(entry.into_path());
            } else if file_type.is_symlink() && entry.path().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}
