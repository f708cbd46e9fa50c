//! Rm command implementation

use std::path::PathBuf;

use colored::Colorize;

use super::for_each_path;
use crate::context::Context;
use crate::error::Result;

/// Run the rm command
///
/// Deletes the overlay copy of each path. Real files are never touched.
pub fn run_rm(context: &Context, paths: &[PathBuf]) -> Result<()> {
    for_each_path("Rm", paths, |path| {
        context.engine.remove(path)?;
        println!("{} {}", "Removed".green(), context.engine.resolve(path).display());
        Ok(0)
    })
}
