//! Diff and status reporting through external tools
//!
//! - **tool**: the [`DiffRunner`]/[`Summarizer`] seam and the process-backed
//!   implementations with their `PATH` resolution
//! - **reporter**: [`DiffReporter`], which feeds pending pairs to a runner

mod reporter;
mod tool;

pub use reporter::{DiffReporter, DiffSummary, StatusReport};
pub use tool::{
    BASELINE_DIFF, DIFFSTAT, DiffRunner, ExternalDiff, ExternalDiffstat, PREFERRED_DIFF,
    Summarizer,
};
