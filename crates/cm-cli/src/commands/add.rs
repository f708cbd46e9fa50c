//! Add command implementation

use std::path::PathBuf;

use colored::Colorize;

use cm_core::{SyncDirection, SyncReport};

use super::{for_each_path, print_json, print_report};
use crate::context::Context;
use crate::error::Result;

/// Run the add command
///
/// Copies each path, or every file below it, into the overlay.
pub fn run_add(context: &Context, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut combined = SyncReport::new(SyncDirection::ToOverlay);

    let result = for_each_path("Add", paths, |path| {
        let report = context.engine.add(path)?;
        if !json {
            print_report(&report, "added");
            for skipped in &report.skipped {
                // Existing skipped paths lie inside the overlay root.
                let reason = if skipped.exists() {
                    "Path is inside the overlay:"
                } else {
                    "Requested file not found:"
                };
                eprintln!("{} {}", reason.yellow(), skipped.display());
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
