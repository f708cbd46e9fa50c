//! Overlay root bootstrap

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Make sure the overlay root exists and is writable.
///
/// A missing root is created with mode 0755. An existing root must be a
/// directory or a symlink to one; writability is probed with a temporary
/// file that is removed again.
///
/// # Errors
///
/// Returns [`Error::Setup`] when the root cannot be created, is not a
/// directory, or is not writable.
pub fn ensure_overlay_root(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let setup_error = |message: String| Error::Setup {
        path: path.to_path_buf(),
        message,
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(setup_error("must be a directory or a symlink to one".into())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Creating overlay root");
            cm_fs::io::create_dirs(path).map_err(|e| setup_error(e.to_string()))?;
            return Ok(());
        }
        Err(e) => return Err(setup_error(e.to_string())),
    }

    match tempfile::Builder::new().prefix(".cm-probe").tempfile_in(path) {
        Ok(_probe) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(setup_error("must be writable".into()))
        }
        Err(e) => Err(setup_error(e.to_string())),
    }
}
