//! Size and mtime comparison of file pairs

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Size and modification time of a file at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSnapshot {
    pub size: u64,
    pub modified: SystemTime,
}

impl FileSnapshot {
    /// Stat `path`, following symlinks.
    pub fn take(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            size: meta.len(),
            modified: meta.modified()?,
        })
    }
}

/// How a pair is classified when stat fails on one or both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatFailurePolicy {
    /// Any stat failure means the pair differs.
    #[default]
    AlwaysDiffer,
    /// Two failures of the same kind (for example both sides missing)
    /// compare identical. Any other failure means the pair differs.
    SameKindIsIdentical,
}

/// Classifies a file pair as identical or differing without reading content.
///
/// Two different files with matching size and mtime are indistinguishable
/// to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    policy: StatFailurePolicy,
}

impl ChangeDetector {
    pub fn new(policy: StatFailurePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StatFailurePolicy {
        self.policy
    }

    /// True when the pair should be treated as identical and skipped.
    pub fn quick_diff(&self, a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
        match (FileSnapshot::take(a), FileSnapshot::take(b)) {
            (Ok(a), Ok(b)) => a == b,
            (Err(a), Err(b)) => {
                self.policy == StatFailurePolicy::SameKindIsIdentical && a.kind() == b.kind()
            }
            _ => false,
        }
    }
}

/// Quick diff with the default policy: any stat failure means "differs".
pub fn quick_diff(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    ChangeDetector::default().quick_diff(a, b)
}
