//! Mapping between the real tree and the overlay tree

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Translates paths between the real root and the overlay root.
///
/// The overlay mirrors the real tree below its own root, so the real
/// `/etc/hosts` lives at `<overlay>/etc/hosts` when the real root is `/`.
/// Prefix checks are component-wise: `/srv/app` is not a prefix of
/// `/srv/apple`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    real_root: PathBuf,
    overlay_root: PathBuf,
}

impl PathMapper {
    /// Create a mapper for the given roots.
    ///
    /// Both roots must be absolute. They are lexically cleaned so that
    /// `/opt/cm/` and `/opt/cm` behave the same.
    pub fn new(real_root: impl AsRef<Path>, overlay_root: impl AsRef<Path>) -> Result<Self> {
        let real_root = real_root.as_ref();
        let overlay_root = overlay_root.as_ref();

        for root in [real_root, overlay_root] {
            if !root.is_absolute() {
                return Err(Error::RelativeRoot {
                    path: root.to_path_buf(),
                });
            }
        }

        Ok(Self {
            real_root: clean(real_root),
            overlay_root: clean(overlay_root),
        })
    }

    /// The live tree being tracked.
    pub fn real_root(&self) -> &Path {
        &self.real_root
    }

    /// The shadow tree holding managed copies.
    pub fn overlay_root(&self) -> &Path {
        &self.overlay_root
    }

    /// Remove the real root prefix from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotUnderRoot`] if `path` is not below the real root.
    /// Relative paths are never under the root.
    pub fn strip_root<'a>(&self, path: &'a Path) -> Result<&'a Path> {
        path.strip_prefix(&self.real_root)
            .map_err(|_| Error::NotUnderRoot {
                path: path.to_path_buf(),
                root: self.real_root.clone(),
            })
    }

    /// Overlay counterpart of a real path.
    pub fn to_overlay(&self, path: &Path) -> Result<PathBuf> {
        let relative = self.strip_root(path)?;
        Ok(join_relative(&self.overlay_root, relative))
    }

    /// Real counterpart of an overlay path.
    ///
    /// Paths outside the overlay root are returned unchanged; they are
    /// taken to be real paths already.
    pub fn to_real(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.overlay_root) {
            Ok(relative) => join_relative(&self.real_root, relative),
            Err(_) => path.to_path_buf(),
        }
    }

    /// True if `path` lies inside the overlay root (or is the root itself).
    pub fn in_overlay(&self, path: &Path) -> bool {
        path.starts_with(&self.overlay_root)
    }
}

// `Path::join("")` appends a trailing separator, which leaks into output.
fn join_relative(root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// Make `path` absolute against `cwd` without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous component; `..`
/// at the root stays at the root. Symlinks are not resolved. `cwd` is
/// expected to be absolute.
pub fn absolutize(path: impl AsRef<Path>, cwd: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        clean(path)
    } else {
        clean(&cwd.as_ref().join(path))
    }
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.has_root() {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}
