//! SyncEngine implementation
//!
//! Every operation resolves its argument to an absolute path, maps it into
//! the overlay, expands it on its source side and applies a per-file action.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use cm_fs::{ChangeDetector, Enumerator, PathMapper, absolutize, io};

use super::report::{FileFailure, SyncDirection, SyncReport, Transfer};
use crate::config::Config;
use crate::Result;

/// An overlay file and its real counterpart that quick diff says differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPair {
    pub overlay: PathBuf,
    pub real: PathBuf,
}

impl PendingPair {
    /// (source, destination) for `direction`.
    pub fn oriented(&self, direction: SyncDirection) -> (&Path, &Path) {
        direction.orient(&self.overlay, &self.real)
    }
}

/// Overlay files under one argument that differ from the real side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    /// Overlay path the argument mapped to
    pub target: PathBuf,
    /// The overlay path does not exist
    pub missing: bool,
    /// Number of overlay files examined
    pub compared: usize,
    pub pairs: Vec<PendingPair>,
}

/// Engine for synchronizing the real tree and the overlay.
pub struct SyncEngine {
    config: Config,
    mapper: PathMapper,
    detector: ChangeDetector,
    enumerator: Enumerator,
    cwd: PathBuf,
}

impl SyncEngine {
    /// Create an engine resolving relative arguments against the process
    /// working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either configured root is relative or the
    /// working directory cannot be read.
    pub fn new(config: Config) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::with_cwd(config, cwd)
    }

    /// Create an engine resolving relative arguments against `cwd`.
    pub fn with_cwd(config: Config, cwd: impl Into<PathBuf>) -> Result<Self> {
        let mapper = config.mapper()?;
        let detector = config.detector();
        let enumerator = config.enumerator();
        Ok(Self {
            config,
            mapper,
            detector,
            enumerator,
            cwd: cwd.into(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Absolute form of a command argument.
    pub fn resolve(&self, arg: impl AsRef<Path>) -> PathBuf {
        absolutize(arg, &self.cwd)
    }

    fn overlay_target(&self, arg: &Path) -> Result<PathBuf> {
        let real = self.resolve(arg);
        Ok(self.mapper.to_overlay(&real)?)
    }

    fn expand_overlay(&self, overlay: &Path) -> Result<Option<Vec<PathBuf>>> {
        match self.enumerator.expand(overlay) {
            Ok(files) => Ok(Some(files)),
            Err(e) if e.is_not_found() => {
                debug!(path = %overlay.display(), "Nothing in overlay");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Copy real files into the overlay unconditionally.
    ///
    /// The first copy failure stops the call; it is recorded in the report
    /// next to the files already copied. Files inside the overlay root are
    /// never added; an argument inside it, or a missing one, is reported as
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument is not under the real root or
    /// cannot be read.
    pub fn add(&self, arg: impl AsRef<Path>) -> Result<SyncReport> {
        let real = self.resolve(arg);
        self.mapper.strip_root(&real)?;

        let mut report = SyncReport::new(SyncDirection::ToOverlay);
        if self.mapper.in_overlay(&real) {
            debug!(path = %real.display(), "Path is inside the overlay root");
            report.skipped.push(real);
            return Ok(report);
        }

        let enumerator = self.enumerator.clone().exclude(self.mapper.overlay_root());
        let files = match enumerator.expand(&real) {
            Ok(files) => files,
            Err(e) if e.is_not_found() => {
                debug!(path = %real.display(), "Nothing to add");
                report.skipped.push(real);
                return Ok(report);
            }
            Err(e) => return Err(e.into()),
        };

        for file in files {
            let dest = self.mapper.to_overlay(&file)?;
            if let Err(e) = io::copy_file(&dest, &file) {
                warn!(src = %file.display(), dest = %dest.display(), error = %e, "Add failed");
                report.errors.push(FileFailure::new(&file, &dest, &e));
                break;
            }
            info!(src = %file.display(), dest = %dest.display(), "Added");
            report.transfers.push(Transfer::copied(file, dest));
        }

        Ok(report)
    }

    /// Delete the overlay subtree for an argument.
    ///
    /// The real side is never touched. Returns the overlay path removed;
    /// removing something that is not there succeeds.
    pub fn remove(&self, arg: impl AsRef<Path>) -> Result<PathBuf> {
        let overlay = self.overlay_target(arg.as_ref())?;
        io::remove_tree(&overlay)?;
        info!(path = %overlay.display(), "Removed from overlay");
        Ok(overlay)
    }

    /// Real-side paths of every overlay file under an argument.
    pub fn list(&self, arg: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let overlay = self.overlay_target(arg.as_ref())?;
        let files = self.expand_overlay(&overlay)?.unwrap_or_default();
        Ok(files.iter().map(|f| self.mapper.to_real(f)).collect())
    }

    /// Overlay files under an argument whose real counterpart fails quick
    /// diff.
    ///
    /// The filter is symmetric, so the same set drives pull, push, diff
    /// and status.
    pub fn pending(&self, arg: impl AsRef<Path>) -> Result<Pending> {
        let target = self.overlay_target(arg.as_ref())?;
        let Some(files) = self.expand_overlay(&target)? else {
            return Ok(Pending {
                target,
                missing: true,
                ..Pending::default()
            });
        };

        let compared = files.len();
        let pairs = files
            .into_iter()
            .filter_map(|overlay| {
                let real = self.mapper.to_real(&overlay);
                if self.detector.quick_diff(&overlay, &real) {
                    debug!(path = %real.display(), "Unchanged");
                    None
                } else {
                    Some(PendingPair { overlay, real })
                }
            })
            .collect();

        Ok(Pending {
            target,
            missing: false,
            compared,
            pairs,
        })
    }

    /// Copy differing overlay files onto the real tree.
    ///
    /// Never deletes real files. Existing real files are backed up first
    /// unless backups are disabled.
    pub fn pull(&self, arg: impl AsRef<Path>) -> Result<SyncReport> {
        self.sync(arg, SyncDirection::ToReal)
    }

    /// Copy differing real files into the overlay.
    ///
    /// Only files already in the overlay are considered; overlay files
    /// without a real counterpart are skipped.
    pub fn push(&self, arg: impl AsRef<Path>) -> Result<SyncReport> {
        self.sync(arg, SyncDirection::ToOverlay)
    }

    /// Shared pull/push pipeline. Per-file failures are recorded and the
    /// remaining files are still processed.
    pub fn sync(&self, arg: impl AsRef<Path>, direction: SyncDirection) -> Result<SyncReport> {
        let pending = self.pending(arg)?;
        let mut report = SyncReport::new(direction);

        for pair in &pending.pairs {
            let (src, dest) = pair.oriented(direction);

            if direction == SyncDirection::ToOverlay && !pair.real.exists() {
                debug!(path = %pair.overlay.display(), "No real counterpart, leaving overlay file");
                report.skipped.push(pair.overlay.clone());
                continue;
            }

            match self.transfer(direction, src, dest) {
                Ok(transfer) => {
                    info!(%direction, src = %src.display(), dest = %dest.display(), "Synced");
                    report.transfers.push(transfer);
                }
                Err(e) => {
                    warn!(%direction, src = %src.display(), dest = %dest.display(), error = %e, "Sync failed");
                    report.errors.push(FileFailure::new(src, dest, &e));
                }
            }
        }

        Ok(report)
    }

    fn transfer(
        &self,
        direction: SyncDirection,
        src: &Path,
        dest: &Path,
    ) -> cm_fs::Result<Transfer> {
        let mut transfer = Transfer::copied(src, dest);

        if direction == SyncDirection::ToOverlay {
            io::copy_file(dest, src)?;
            return Ok(transfer);
        }

        if !self.config.no_backup {
            transfer.backup = io::backup_file(dest)?;
        }

        if self.config.symlink {
            io::link_file(dest, src)?;
            transfer.linked = true;
        } else {
            io::copy_file(dest, src)?;
        }

        Ok(transfer)
    }
}
