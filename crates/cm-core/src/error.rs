//! Error types for cm-core

use std::path::PathBuf;

/// Result type for cm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cm-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No executable found for a required external tool
    #[error("Could not find suitable {tool} executable in your PATH")]
    ToolNotFound { tool: String },

    /// An external tool was found but could not be run
    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The overlay root is missing and cannot be created, or is unusable
    #[error("Overlay root {path} is unusable: {message}")]
    Setup { path: PathBuf, message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from cm-fs
    #[error(transparent)]
    Fs(#[from] cm_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the underlying cause is a missing path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fs(e) if e.is_not_found())
    }
}
