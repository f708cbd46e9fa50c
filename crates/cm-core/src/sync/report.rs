//! Outcome records for sync operations

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which side of a differing pair is the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// Real tree to overlay (push)
    ToOverlay,
    /// Overlay to real tree (pull)
    ToReal,
}

impl SyncDirection {
    /// Order an (overlay, real) pair as (source, destination).
    pub fn orient<'a>(self, overlay: &'a Path, real: &'a Path) -> (&'a Path, &'a Path) {
        match self {
            Self::ToOverlay => (real, overlay),
            Self::ToReal => (overlay, real),
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Self::ToOverlay => "push",
            Self::ToReal => "pull",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// One file written from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Copy of the previous destination, when one was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    /// Destination was made a symlink to `from` rather than a copy
    #[serde(default)]
    pub linked: bool,
}

impl Transfer {
    pub fn copied(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            backup: None,
            linked: false,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.linked { "=>" } else { "->" };
        write!(f, "{} {} {}", self.from.display(), arrow, self.to.display())
    }
}

/// A per-file failure that did not stop the rest of the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// File that was being read
    pub source: PathBuf,
    /// File that could not be written
    pub path: PathBuf,
    pub message: String,
}

impl FileFailure {
    pub fn new(
        source: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        error: &dyn std::error::Error,
    ) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.source.display(),
            self.path.display(),
            self.message
        )
    }
}

/// Report from an add, pull or push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub direction: SyncDirection,
    /// Files written
    pub transfers: Vec<Transfer>,
    /// Paths left alone because there was nothing to copy from
    pub skipped: Vec<PathBuf>,
    /// Files that could not be written
    pub errors: Vec<FileFailure>,
}

impl SyncReport {
    pub fn new(direction: SyncDirection) -> Self {
        Self {
            direction,
            transfers: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no file failed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when nothing was written, skipped or failed.
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.skipped.is_empty() && self.errors.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: SyncReport) {
        self.transfers.extend(other.transfers);
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }
}
