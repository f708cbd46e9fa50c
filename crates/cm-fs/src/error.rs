//! Error types for cm-fs

use std::path::PathBuf;

/// Result type for cm-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cm-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No such file or directory: {path}")]
    NotFound { path: PathBuf },

    #[error("Path {path} is not under root {root}")]
    NotUnderRoot { path: PathBuf, root: PathBuf },

    #[error("Source path {path} must be a file")]
    NotAFile { path: PathBuf },

    #[error("Root path {path} must be absolute")]
    RelativeRoot { path: PathBuf },
}

impl Error {
    /// Wrap an I/O error, promoting `NotFound` to [`Error::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// True when the error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
