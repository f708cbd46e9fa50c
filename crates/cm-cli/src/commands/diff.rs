//! Diff and status command implementations

use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;

use cm_core::diff::{DiffSummary, ExternalDiff, ExternalDiffstat};
use cm_core::{DiffReporter, DiffRunner, Summarizer};

use super::for_each_path;
use crate::context::Context;
use crate::error::Result;

fn report_missing(summary: &DiffSummary) {
    if summary.missing {
        eprintln!(
            "{} {}",
            "Requested file not found:".yellow(),
            summary.target.display()
        );
    }
}

/// Run the diff command
///
/// Prints a unified diff for every tracked file whose size or mtime differs
/// from the real file.
pub fn run_diff(context: &Context, paths: &[PathBuf], reverse: bool) -> Result<()> {
    let runner = ExternalDiff::resolve(context.config().diff_tool.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_diffs(context, &runner, paths, reverse, &mut out)
}

/// Diff every path through `runner` into `out`.
pub fn write_diffs(
    context: &Context,
    runner: &dyn DiffRunner,
    paths: &[PathBuf],
    reverse: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let reporter = DiffReporter::new(&context.engine, runner);
    for_each_path("Diff", paths, |path| {
        let summary = reporter.diff(path, reverse, &mut *out)?;
        report_missing(&summary);
        Ok(summary.failed)
    })?;
    out.flush()?;
    Ok(())
}

/// Run the status command
///
/// Feeds the plain diff of every changed file to diffstat and prints its
/// summary.
pub fn run_status(context: &Context, paths: &[PathBuf], reverse: bool) -> Result<()> {
    let runner = ExternalDiff::resolve_plain()?;
    let summarizer = ExternalDiffstat::resolve()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_status(context, &runner, &summarizer, paths, reverse, &mut out)
}

/// Summarize every path through `runner` and `summarizer` into `out`.
pub fn write_status(
    context: &Context,
    runner: &dyn DiffRunner,
    summarizer: &dyn Summarizer,
    paths: &[PathBuf],
    reverse: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let reporter = DiffReporter::new(&context.engine, runner);
    for_each_path("Status", paths, |path| {
        let status = reporter.status(path, reverse, summarizer)?;
        report_missing(&status.summary);
        out.write_all(&status.output)?;
        Ok(status.summary.failed)
    })?;
    out.flush()?;
    Ok(())
}
