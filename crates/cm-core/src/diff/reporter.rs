//! Diff and status reporting over pending pairs

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::tool::{DiffRunner, Summarizer};
use crate::sync::{SyncDirection, SyncEngine};
use crate::Result;

/// What a diff or status call looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Overlay path the argument mapped to
    pub target: PathBuf,
    /// The overlay path does not exist
    pub missing: bool,
    /// Overlay files examined
    pub compared: usize,
    /// Pairs handed to the diff tool
    pub differing: usize,
    /// Pairs the diff tool could not be run on
    pub failed: usize,
}

/// Output of a status call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub summary: DiffSummary,
    /// Raw summarizer output
    pub output: Vec<u8>,
}

/// Runs a diff tool over overlay files that fail quick diff.
///
/// Pairs are passed as `(overlay, real)`, showing what a pull would do,
/// or `(real, overlay)` when reversed.
pub struct DiffReporter<'a> {
    engine: &'a SyncEngine,
    runner: &'a dyn DiffRunner,
}

impl<'a> DiffReporter<'a> {
    pub fn new(engine: &'a SyncEngine, runner: &'a dyn DiffRunner) -> Self {
        Self { engine, runner }
    }

    fn direction(reverse: bool) -> SyncDirection {
        if reverse {
            SyncDirection::ToOverlay
        } else {
            SyncDirection::ToReal
        }
    }

    /// Run the diff tool per differing pair, calling `sink` with each raw
    /// output in turn.
    ///
    /// A pair the tool fails on is logged and counted in
    /// [`DiffSummary::failed`]; the remaining pairs are still diffed.
    fn each_diff(
        &self,
        arg: &std::path::Path,
        reverse: bool,
        mut sink: impl FnMut(Vec<u8>) -> Result<()>,
    ) -> Result<DiffSummary> {
        let pending = self.engine.pending(arg)?;
        let direction = Self::direction(reverse);
        let mut failed = 0;

        for pair in &pending.pairs {
            let (left, right) = pair.oriented(direction);
            debug!(left = %left.display(), right = %right.display(), "Diffing");
            match self.runner.run(left, right) {
                Ok(bytes) => sink(bytes)?,
                Err(e) => {
                    warn!(left = %left.display(), right = %right.display(), error = %e, "Diff failed");
                    failed += 1;
                }
            }
        }

        Ok(DiffSummary {
            target: pending.target,
            missing: pending.missing,
            compared: pending.compared,
            differing: pending.pairs.len(),
            failed,
        })
    }

    /// Write the diff of every differing pair under `arg` to `out`.
    pub fn diff(
        &self,
        arg: impl AsRef<std::path::Path>,
        reverse: bool,
        out: &mut dyn Write,
    ) -> Result<DiffSummary> {
        self.each_diff(arg.as_ref(), reverse, |bytes| {
            out.write_all(&bytes)?;
            Ok(())
        })
    }

    /// Concatenate every pair's diff and return the summarizer's output.
    ///
    /// The summarizer runs even when nothing differs.
    pub fn status(
        &self,
        arg: impl AsRef<std::path::Path>,
        reverse: bool,
        summarizer: &dyn Summarizer,
    ) -> Result<StatusReport> {
        let mut accumulated = Vec::new();
        let summary = self.each_diff(arg.as_ref(), reverse, |bytes| {
            accumulated.extend_from_slice(&bytes);
            Ok(())
        })?;

        let output = summarizer.summarize(&accumulated)?;
        Ok(StatusReport { summary, output })
    }
}
