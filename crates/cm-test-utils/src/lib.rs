//! Shared test utilities for the cm workspace.
//!
//! Provides [`TestRoots`], a throwaway real tree and overlay tree side by
//! side in one temporary directory. Dev-dependency only, never published.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use cm_core::{Config, SyncEngine};
use tempfile::TempDir;

/// A temporary `real/` and `overlay/` pair.
///
/// Both roots are canonicalized so paths reported by the engine compare
/// equal to the ones built here, even where the temp dir sits behind a
/// symlink.
///
/// # Example
///
/// ```rust,no_run
/// use cm_test_utils::TestRoots;
///
/// let roots = TestRoots::new();
/// roots.write_real("etc/app.conf", "port = 80\n");
/// let engine = roots.engine();
/// engine.add(roots.real("etc")).unwrap();
/// roots.assert_overlay_contains("etc/app.conf", "port = 80");
/// ```
pub struct TestRoots {
    _temp_dir: TempDir,
    real_root: PathBuf,
    overlay_root: PathBuf,
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    /// Create both roots, empty.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base = dunce::canonicalize(temp_dir.path()).unwrap();
        let real_root = base.join("real");
        let overlay_root = base.join("overlay");
        fs::create_dir(&real_root).unwrap();
        fs::create_dir(&overlay_root).unwrap();
        Self {
            _temp_dir: temp_dir,
            real_root,
            overlay_root,
        }
    }

    pub fn real_root(&self) -> &Path {
        &self.real_root
    }

    pub fn overlay_root(&self) -> &Path {
        &self.overlay_root
    }

    /// Absolute path of `rel` under the real root.
    pub fn real(&self, rel: &str) -> PathBuf {
        self.real_root.join(rel)
    }

    /// Absolute path of `rel` under the overlay root.
    pub fn overlay(&self, rel: &str) -> PathBuf {
        self.overlay_root.join(rel)
    }

    /// Write `content` to `rel` under the real root, creating parents.
    pub fn write_real(&self, rel: &str, content: &str) -> PathBuf {
        write(self.real(rel), content)
    }

    /// Write `content` to `rel` under the overlay root, creating parents.
    pub fn write_overlay(&self, rel: &str, content: &str) -> PathBuf {
        write(self.overlay(rel), content)
    }

    /// Write the same content to both sides with an identical mtime, so
    /// quick diff sees the pair as unchanged.
    pub fn write_both(&self, rel: &str, content: &str) {
        let real = self.write_real(rel, content);
        let overlay = self.write_overlay(rel, content);
        let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        set_mtime(&real, when);
        set_mtime(&overlay, when);
    }

    /// Config pointing at these roots, everything else default.
    pub fn config(&self) -> Config {
        Config {
            overlay_root: self.overlay_root.clone(),
            real_root: self.real_root.clone(),
            ..Config::default()
        }
    }

    /// Engine over [`TestRoots::config`], resolving relative arguments
    /// against the real root.
    pub fn engine(&self) -> SyncEngine {
        self.engine_with(self.config())
    }

    /// Engine over a custom config, resolving relative arguments against
    /// the real root.
    pub fn engine_with(&self, config: Config) -> SyncEngine {
        SyncEngine::with_cwd(config, &self.real_root).unwrap()
    }

    /// Read a file under the real root.
    pub fn read_real(&self, rel: &str) -> String {
        read(&self.real(rel))
    }

    /// Read a file under the overlay root.
    pub fn read_overlay(&self, rel: &str) -> String {
        read(&self.overlay(rel))
    }

    /// Assert that `rel` exists under the overlay root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_in_overlay(&self, rel: &str) {
        let path = self.overlay(rel);
        assert!(path.exists(), "Expected overlay file: {}", path.display());
    }

    /// Assert that `rel` does **not** exist under the overlay root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_not_in_overlay(&self, rel: &str) {
        let path = self.overlay(rel);
        assert!(
            !path.exists(),
            "Expected no overlay file: {}",
            path.display()
        );
    }

    /// Assert that the overlay copy of `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_overlay_contains(&self, rel: &str, content: &str) {
        let actual = self.read_overlay(rel);
        assert!(
            actual.contains(content),
            "Overlay {} does not contain {:?}:\n{}",
            rel,
            content,
            actual
        );
    }

    /// Assert that the real copy of `rel` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_real_contains(&self, rel: &str, content: &str) {
        let actual = self.read_real(rel);
        assert!(
            actual.contains(content),
            "Real {} does not contain {:?}:\n{}",
            rel,
            content,
            actual
        );
    }
}

/// Set both access and modification time of `path`.
pub fn set_mtime(path: impl AsRef<Path>, when: SystemTime) {
    let file = File::options().write(true).open(path.as_ref()).unwrap();
    file.set_times(FileTimes::new().set_accessed(when).set_modified(when))
        .unwrap();
}

/// Move the mtime of `path` forward by `secs` seconds.
pub fn touch_forward(path: impl AsRef<Path>, secs: u64) {
    let path = path.as_ref();
    let modified = fs::metadata(path).unwrap().modified().unwrap();
    set_mtime(path, modified + Duration::from_secs(secs));
}

/// True when `tool` is on `PATH`.
///
/// Tests that spawn diff or diffstat return early when this is false.
pub fn has_tool(tool: &str) -> bool {
    which::which(tool).is_ok()
}

fn write(path: PathBuf, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
}
