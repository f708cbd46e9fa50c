//! Command implementations for cm-cli
//!
//! Every command takes one or more path arguments. A failure on one
//! argument is printed and the rest still run; the command as a whole then
//! fails so the exit status reflects it.

pub mod add;
pub mod diff;
pub mod list;
pub mod rm;
pub mod sync;

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use cm_core::SyncReport;

use crate::error::{CliError, Result};

pub use add::run_add;
pub use diff::{run_diff, run_status};
pub use list::run_list;
pub use rm::run_rm;
pub use sync::{run_pull, run_push};

/// Run `action` for every path, reporting failures as `Error (<op>): ...`.
///
/// `action` returns how many files under its path failed without aborting
/// it; those count toward the final result as well.
pub(crate) fn for_each_path(
    op: &str,
    paths: &[PathBuf],
    mut action: impl FnMut(&Path) -> Result<usize>,
) -> Result<()> {
    let mut failures = 0;
    for path in paths {
        match action(path) {
            Ok(count) => failures += count,
            Err(e) => {
                eprintln!("{} ({}): {}", "Error".red().bold(), op, e);
                failures += 1;
            }
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} failed for {} item(s)",
            op.to_lowercase(),
            failures
        )))
    }
}

/// Print the transfers and per-file failures of a report.
pub(crate) fn print_report(report: &SyncReport, done: &str) {
    for transfer in &report.transfers {
        println!("{}", transfer);
        if let Some(backup) = &transfer.backup {
            println!("   {} {}", "backup".dimmed(), backup.display());
        }
    }
    for failure in &report.errors {
        eprintln!(
            "{} could not be {} to {}: {}",
            failure.source.display().to_string().red(),
            done,
            failure.path.display(),
            failure.message
        );
    }
}

/// Print a JSON document on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
