//! List command implementation

use std::path::PathBuf;

use super::{for_each_path, print_json};
use crate::context::Context;
use crate::error::Result;

/// Run the list command
///
/// Prints the real path of every tracked file under each argument. A path
/// with nothing tracked below it prints nothing.
pub fn run_list(context: &Context, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut listed = Vec::new();

    let result = for_each_path("List", paths, |path| {
        let files = context.engine.list(path)?;
        if !json {
            for file in &files {
                println!("{}", file.display());
            }
        }
        listed.extend(files);
        Ok(0)
    });

    if json {
        print_json(&listed)?;
    }
    result
}
