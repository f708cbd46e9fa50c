//! Pull and push command implementations
//!
//! Both walk the overlay and copy files whose size or mtime differ; only the
//! direction changes.

use std::path::{Path, PathBuf};

use colored::Colorize;

use cm_core::{SyncDirection, SyncReport};

use super::{for_each_path, print_json, print_report};
use crate::context::Context;
use crate::error::Result;

/// Argument meaning "the whole real root" when given alone.
pub const ALL: &str = "all";

/// Expand a lone `all` to the real root.
pub fn sync_targets(context: &Context, paths: &[PathBuf]) -> Vec<PathBuf> {
    match paths {
        [only] if only == Path::new(ALL) => vec![context.config().real_root.clone()],
        _ => paths.to_vec(),
    }
}

/// Run the pull command
pub fn run_pull(context: &Context, paths: &[PathBuf], json: bool) -> Result<()> {
    run_sync(context, paths, SyncDirection::ToReal, json)
}

/// Run the push command
pub fn run_push(context: &Context, paths: &[PathBuf], json: bool) -> Result<()> {
    run_sync(context, paths, SyncDirection::ToOverlay, json)
}

fn run_sync(
    context: &Context,
    paths: &[PathBuf],
    direction: SyncDirection,
    json: bool,
) -> Result<()> {
    let targets = sync_targets(context, paths);
    let op = match direction {
        SyncDirection::ToReal => "Pull",
        SyncDirection::ToOverlay => "Push",
    };
    let done = match direction {
        SyncDirection::ToReal => "pulled",
        SyncDirection::ToOverlay => "pushed",
    };
    let mut combined = SyncReport::new(direction);

    let result = for_each_path(op, &targets, |path| {
        let report = context.engine.sync(path, direction)?;
        if !json {
            print_report(&report, done);
            for skipped in &report.skipped {
                eprintln!(
                    "{} {} has no real counterpart",
                    "Skipped".yellow(),
                    skipped.display()
                );
            }
        }
        let failures = report.errors.len();
        combined.merge(report);
        Ok(failures)
    });

    if json {
        print_json(&combined)?;
    }
    result
}
