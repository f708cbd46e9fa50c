//! File copying, linking and removal between the two trees

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Mode for directories created on the destination side.
pub const DIR_MODE: u32 = 0o755;

/// Suffix appended to a file name to form its backup name.
pub const BACKUP_SUFFIX: &str = "~";

/// Copy the file `src` to `dest`, creating any directories necessary.
///
/// The destination gets the source's permission bits, and both its access
/// and modification times are set to the source's modification time, so a
/// later quick diff of the pair compares equal.
///
/// A failure part way leaves `dest` truncated and partially written.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `src` does not exist, [`Error::NotAFile`]
/// if it is not a regular file, and [`Error::Io`] for any other failure.
pub fn copy_file(dest: impl AsRef<Path>, src: impl AsRef<Path>) -> Result<()> {
    let dest = dest.as_ref();
    let src = src.as_ref();

    let src_meta = match fs::metadata(src) {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => {
            return Err(Error::NotAFile {
                path: src.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(src, e)),
    };

    if same_file(dest, &src_meta) {
        debug!(src = %src.display(), dest = %dest.display(), "Source and destination are the same file");
        return Ok(());
    }

    let mut reader = File::open(src).map_err(|e| Error::io(src, e))?;

    if let Some(parent) = dest.parent() {
        create_dirs(parent)?;
    }

    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .map_err(|e| Error::io(dest, e))?;

    io::copy(&mut reader, &mut writer).map_err(|e| Error::io(dest, e))?;

    fs::set_permissions(dest, src_meta.permissions()).map_err(|e| Error::io(dest, e))?;

    let mtime = src_meta.modified().map_err(|e| Error::io(src, e))?;
    writer
        .set_times(FileTimes::new().set_accessed(mtime).set_modified(mtime))
        .map_err(|e| Error::io(dest, e))?;

    Ok(())
}

#[cfg(unix)]
fn same_file(dest: &Path, src_meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    fs::metadata(dest)
        .map(|d| d.dev() == src_meta.dev() && d.ino() == src_meta.ino())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn same_file(_dest: &Path, _src_meta: &fs::Metadata) -> bool {
    false
}

/// Create `path` and all missing parents with [`DIR_MODE`].
pub fn create_dirs(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path).map_err(|e| Error::io(path, e))
}

/// Backup name for `path`: the same path with [`BACKUP_SUFFIX`] appended.
pub fn backup_path(path: impl AsRef<Path>) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy an existing regular file to its backup name before it is overwritten.
///
/// Returns the backup path, or `None` when there was nothing to back up
/// (missing file or a symlink).
pub fn backup_file(path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => {
            let backup = backup_path(path);
            copy_file(&backup, path)?;
            Ok(Some(backup))
        }
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Replace `dest` with a symbolic link to `src`.
#[cfg(unix)]
pub fn link_file(dest: impl AsRef<Path>, src: impl AsRef<Path>) -> Result<()> {
    let dest = dest.as_ref();
    let src = src.as_ref();

    if !src.is_file() {
        return Err(Error::NotAFile {
            path: src.to_path_buf(),
        });
    }

    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => {
            return Err(Error::NotAFile {
                path: dest.to_path_buf(),
            });
        }
        Ok(_) => fs::remove_file(dest).map_err(|e| Error::io(dest, e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(dest, e)),
    }

    if let Some(parent) = dest.parent() {
        create_dirs(parent)?;
    }
    std::os::unix::fs::symlink(src, dest).map_err(|e| Error::io(dest, e))
}

/// Platforms without symlinks get a plain copy.
#[cfg(not(unix))]
pub fn link_file(dest: impl AsRef<Path>, src: impl AsRef<Path>) -> Result<()> {
    copy_file(dest, src)
}

/// Remove a file or a whole directory tree.
///
/// A missing path counts as removed.
pub fn remove_tree(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    result.map_err(|e| Error::io(path, e))
}
